//! Cross-cutting constants that don't belong to a single port or entity.

/// Worker pipeline step names and their progress percentage on entry, in
/// pipeline order. Authoritative per the spec's six-step form (see
/// `DESIGN.md`'s Open Question log).
pub const PIPELINE_STEPS: &[(&str, u8)] = &[
    ("Fetching repository metadata", 10),
    ("Cloning repository", 20),
    ("Building file tree", 40),
    ("Calculating metrics", 50),
    ("Parsing files", 65),
    ("Saving parsed data", 85),
];

/// Percentage reported on successful completion.
pub const PIPELINE_COMPLETE_PERCENTAGE: u8 = 100;

/// Default overall job timeout, in milliseconds.
pub const DEFAULT_JOB_TIMEOUT_MS: u64 = 600_000;

/// Default per-request timeout for remote API calls, in milliseconds.
pub const DEFAULT_REMOTE_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default graceful-shutdown drain deadline, in seconds.
pub const GRACEFUL_SHUTDOWN_DEADLINE_SECS: u64 = 30;

/// Minimum accepted `limit` query parameter.
pub const MIN_LIST_LIMIT: u32 = 1;

/// Maximum accepted `limit` query parameter.
pub const MAX_LIST_LIMIT: u32 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_has_six_named_steps() {
        assert_eq!(PIPELINE_STEPS.len(), 6);
        assert_eq!(PIPELINE_STEPS[0], ("Fetching repository metadata", 10));
        assert_eq!(PIPELINE_STEPS[5], ("Saving parsed data", 85));
    }
}
