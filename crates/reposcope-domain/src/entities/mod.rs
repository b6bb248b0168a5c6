//! Entities carrying identity and lifecycle, built atop value objects.

mod analysis;
mod parsed_file;

pub use analysis::{AnalysisRecord, AnalysisStatus, RepositoryCoordinates};
pub use parsed_file::{
    Class, Export, ExportKind, Function, Import, ImportSpecifier, Parameter, ParsedFile,
    Property, SourceLocation,
};
