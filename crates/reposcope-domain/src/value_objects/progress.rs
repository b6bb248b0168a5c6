//! Job progress records pushed from the worker through the job queue.

use serde::{Deserialize, Serialize};

/// Opaque progress snapshot for one job attempt.
///
/// `percentage` is monotonic non-decreasing within a single attempt; it may
/// reset to a lower value when the job is retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    /// Human-readable label for the step currently running.
    pub current_step: String,
    /// Overall completion, 0..=100.
    pub percentage: u8,
    /// Labels of steps already completed, in order.
    pub steps_completed: Vec<String>,
    /// Total number of named steps in the pipeline.
    pub steps_total: u32,
}

impl JobProgress {
    /// Progress record for a job that has not started its pipeline yet.
    #[must_use]
    pub fn queued(steps_total: u32) -> Self {
        Self {
            current_step: "Queued".to_owned(),
            percentage: 0,
            steps_completed: Vec::new(),
            steps_total,
        }
    }

    /// Advance to a named step, appending the previous step to the
    /// completed list if one was running.
    #[must_use]
    pub fn advance(&self, step: impl Into<String>, percentage: u8) -> Self {
        let mut steps_completed = self.steps_completed.clone();
        if self.percentage > 0 && !self.current_step.is_empty() {
            steps_completed.push(self.current_step.clone());
        }
        Self {
            current_step: step.into(),
            percentage,
            steps_completed,
            steps_total: self.steps_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_starts_at_zero() {
        let p = JobProgress::queued(6);
        assert_eq!(p.percentage, 0);
        assert!(p.steps_completed.is_empty());
        assert_eq!(p.steps_total, 6);
    }

    #[test]
    fn advance_accumulates_completed_steps() {
        let p = JobProgress::queued(6);
        let p = p.advance("Fetching repository metadata", 10);
        let p = p.advance("Cloning repository", 20);
        assert_eq!(p.percentage, 20);
        assert_eq!(p.steps_completed, vec!["Fetching repository metadata"]);
    }

    #[test]
    fn percentage_monotonic_across_advances() {
        let p = JobProgress::queued(6)
            .advance("a", 10)
            .advance("b", 20)
            .advance("c", 40);
        assert!(p.percentage >= 20);
    }
}
