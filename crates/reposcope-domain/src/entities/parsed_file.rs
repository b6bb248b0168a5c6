//! Structural extraction output for one parseable source file.

use serde::{Deserialize, Serialize};

/// A named binding imported from a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpecifier {
    /// Imported name, or `"default"`/`"*"` for default/namespace imports.
    pub name: String,
    /// Local alias, if the binding was renamed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// One `import` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Import {
    /// Module path, quote-stripped.
    pub source: String,
    /// Specifiers bound by this import.
    pub specifiers: Vec<ImportSpecifier>,
    /// True for `import type`/`import { type X }` forms.
    pub is_type_only: bool,
}

/// What kind of binding an [`Export`] makes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// A named export, e.g. `export { foo }` or `export function foo() {}`.
    Named,
    /// The module's default export.
    Default,
    /// A re-export-all, e.g. `export * from "./x"`.
    All,
}

/// One exported binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    /// Exported name (`"default"` or `"*"` for those kinds).
    pub name: String,
    /// Export kind.
    pub kind: ExportKind,
    /// Source module for re-exports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Rendered type annotation, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
}

/// Byte/line location of an extracted declaration within its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    /// Byte offset of the declaration's start.
    pub start_offset: usize,
    /// Byte offset of the declaration's end.
    pub end_offset: usize,
    /// 1-based line number, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column number, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    /// Function name, or `"anonymous"` for unnamed expressions.
    pub name: String,
    /// Ordered parameter list.
    pub parameters: Vec<Parameter>,
    /// Rendered return type annotation, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Declared `async`.
    pub is_async: bool,
    /// Declared generator (`function*`).
    pub is_generator: bool,
    /// Location of the declaration.
    pub location: SourceLocation,
    /// Leading docstring/doc-comment, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// Modifiers such as `static`, `private`, `protected`, `readonly`,
    /// `abstract`, `async`.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub modifiers: Vec<String>,
}

/// A class property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Rendered type annotation, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    /// Class name.
    pub name: String,
    /// Methods, in source order.
    pub methods: Vec<Function>,
    /// Declared properties.
    pub properties: Vec<Property>,
    /// Superclass name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_class: Option<String>,
    /// Decorator names applied to the class.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub decorators: Vec<String>,
    /// Location of the declaration.
    pub location: SourceLocation,
    /// Leading docstring/doc-comment, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

/// Structural extraction for one parseable file, keyed by
/// `(analysisId, relativePath)` at the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    /// Path relative to the working-copy root.
    pub path: String,
    /// Lowercase language tag.
    pub language: String,
    /// Recognized imports, in source order.
    pub imports: Vec<Import>,
    /// Recognized exports, in source order.
    pub exports: Vec<Export>,
    /// Top-level (or method, for classes) function declarations.
    pub functions: Vec<Function>,
    /// Top-level class declarations.
    pub classes: Vec<Class>,
}

impl ParsedFile {
    /// An empty parse result for `path`/`language`, used when a file is
    /// recognized but yields no structural content.
    #[must_use]
    pub fn empty(path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            imports: Vec::new(),
            exports: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }
}
