//! Tracing subscriber bootstrap, grounded on the teacher's bin-crate
//! `tracing_subscriber::fmt().with_env_filter(...).init()` convention
//! (e.g. `docs-generator/src/main.rs`). `RUST_LOG` is recognized per
//! `SPEC_FULL.md` §6's ambient-logging supplement.

use reposcope_domain::value_objects::AnalysisId;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Call once at process start.
///
/// Falls back to `info` when `RUST_LOG` is unset; emits JSON in
/// production (`node_env == Production`), human-readable text otherwise.
pub fn init(node_env: crate::config::NodeEnv) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if matches!(node_env, crate::config::NodeEnv::Production) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Short hex tag for correlating log lines with an analysis id without
/// repeating the full UUID on every line.
#[must_use]
pub fn short_tag(id: AnalysisId) -> String {
    id.as_str().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tag_truncates_to_eight_chars() {
        let id = AnalysisId::new();
        assert_eq!(short_tag(id).len(), 8);
    }
}
