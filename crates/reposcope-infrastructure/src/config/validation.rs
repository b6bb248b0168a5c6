//! Fail-fast validation of a loaded [`AppConfig`], mirroring the teacher's
//! `validate_*`-per-section decomposition in
//! `mcb-infrastructure/src/config/loader.rs`.

use reposcope_domain::{Error, Result};

use super::data::AppConfig;

/// Run every section validator. Called once by [`super::loader::ConfigLoader::load`].
///
/// # Errors
/// Returns [`Error::ConfigInvalid`] on the first section that fails.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_database(config)?;
    validate_queue(config)?;
    validate_limits(config)?;
    validate_rate_limit(config)?;
    Ok(())
}

fn validate_database(config: &AppConfig) -> Result<()> {
    if config.database_url.trim().is_empty() {
        return Err(Error::ConfigInvalid {
            key: "DATABASE_URL".to_owned(),
            message: "must be set".to_owned(),
        });
    }
    Ok(())
}

fn validate_queue(config: &AppConfig) -> Result<()> {
    if config.queue_concurrency == 0 {
        return Err(Error::ConfigInvalid {
            key: "QUEUE_CONCURRENCY".to_owned(),
            message: "must be at least 1".to_owned(),
        });
    }
    if config.job_timeout_ms == 0 {
        return Err(Error::ConfigInvalid {
            key: "JOB_TIMEOUT_MS".to_owned(),
            message: "must be greater than 0".to_owned(),
        });
    }
    Ok(())
}

fn validate_limits(config: &AppConfig) -> Result<()> {
    if config.max_repo_size_mb == 0 {
        return Err(Error::ConfigInvalid {
            key: "MAX_REPO_SIZE_MB".to_owned(),
            message: "must be greater than 0".to_owned(),
        });
    }
    if !(reposcope_domain::value_objects::MIN_MAX_FILE_SIZE_KB
        ..=reposcope_domain::value_objects::MAX_MAX_FILE_SIZE_KB)
        .contains(&config.max_file_size_kb)
    {
        return Err(Error::ConfigInvalid {
            key: "MAX_FILE_SIZE_KB".to_owned(),
            message: format!(
                "must be between {} and {}",
                reposcope_domain::value_objects::MIN_MAX_FILE_SIZE_KB,
                reposcope_domain::value_objects::MAX_MAX_FILE_SIZE_KB
            ),
        });
    }
    Ok(())
}

fn validate_rate_limit(config: &AppConfig) -> Result<()> {
    if config.max_requests == 0 {
        return Err(Error::ConfigInvalid {
            key: "MAX_REQUESTS".to_owned(),
            message: "must be at least 1".to_owned(),
        });
    }
    if config.rate_limit_window_ms == 0 {
        return Err(Error::ConfigInvalid {
            key: "RATE_LIMIT_WINDOW_MS".to_owned(),
            message: "must be greater than 0".to_owned(),
        });
    }
    Ok(())
}
