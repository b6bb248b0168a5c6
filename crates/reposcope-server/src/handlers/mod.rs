//! One module per route handler, each a thin wrapper over an
//! application-layer use case.

pub mod analyze;
pub mod delete;
pub mod health;
pub mod list;
pub mod ping;
pub mod status;
pub mod tree;

use reposcope_domain::value_objects::AnalysisId;
use reposcope_domain::Error;

/// Parse a path segment into an [`AnalysisId`], mapping a malformed id to
/// [`Error::Validation`] rather than a raw UUID parse error.
pub(crate) fn parse_id(raw: &str) -> Result<AnalysisId, Error> {
    raw.parse()
        .map_err(|_| Error::validation(format!("'{raw}' is not a valid analysis id")))
}
