//! Language identification and registry.

use std::collections::HashMap;

/// Every language the registry can classify a file as. Only
/// [`LanguageId::TypeScript`], [`LanguageId::JavaScript`] and
/// [`LanguageId::Python`] are fully parseable; the rest are
/// metadata-only, per the spec's parseable-set rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    /// TypeScript (and TSX).
    TypeScript,
    /// JavaScript (and JSX).
    JavaScript,
    /// Python.
    Python,
    /// Java.
    Java,
    /// Kotlin.
    Kotlin,
    /// C.
    C,
    /// C++.
    Cpp,
    /// C#.
    CSharp,
    /// Go.
    Go,
    /// Rust.
    Rust,
    /// Ruby.
    Ruby,
    /// PHP.
    Php,
    /// Swift.
    Swift,
    /// Dart.
    Dart,
    /// Scala.
    Scala,
    /// Shell (sh/bash/zsh).
    Shell,
    /// SQL.
    Sql,
    /// R.
    R,
    /// Objective-C.
    ObjectiveC,
    /// Undetected.
    Unknown,
}

impl LanguageId {
    /// Every variant, in the declaration order used to break ties during
    /// content-heuristic detection.
    #[must_use]
    pub fn all() -> &'static [LanguageId] {
        &[
            LanguageId::TypeScript,
            LanguageId::JavaScript,
            LanguageId::Python,
            LanguageId::Java,
            LanguageId::Kotlin,
            LanguageId::C,
            LanguageId::Cpp,
            LanguageId::CSharp,
            LanguageId::Go,
            LanguageId::Rust,
            LanguageId::Ruby,
            LanguageId::Php,
            LanguageId::Swift,
            LanguageId::Dart,
            LanguageId::Scala,
            LanguageId::Shell,
            LanguageId::Sql,
            LanguageId::R,
            LanguageId::ObjectiveC,
        ]
    }

    /// Lowercase canonical tag, as persisted in `Metadata::language`.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Swift => "swift",
            Self::Dart => "dart",
            Self::Scala => "scala",
            Self::Shell => "shell",
            Self::Sql => "sql",
            Self::R => "r",
            Self::ObjectiveC => "objective-c",
            Self::Unknown => "unknown",
        }
    }

    /// Extensions (without leading dot) recognized for this language.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::TypeScript => &["ts", "tsx"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Self::Python => &["py", "pyw", "pyx"],
            Self::Java => &["java"],
            Self::Kotlin => &["kt", "kts"],
            Self::C => &["c", "h"],
            Self::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
            Self::CSharp => &["cs"],
            Self::Go => &["go"],
            Self::Rust => &["rs"],
            Self::Ruby => &["rb", "rake"],
            Self::Php => &["php"],
            Self::Swift => &["swift"],
            Self::Dart => &["dart"],
            Self::Scala => &["scala"],
            Self::Shell => &["sh", "bash", "zsh"],
            Self::Sql => &["sql"],
            Self::R => &["r", "R"],
            Self::ObjectiveC => &["m", "mm"],
            Self::Unknown => &[],
        }
    }

    /// True if this language is in the fully-parseable set.
    #[must_use]
    pub fn is_parseable(&self) -> bool {
        matches!(self, Self::TypeScript | Self::JavaScript | Self::Python)
    }

    /// Parse a lowercase tag back into a [`LanguageId`]. Used for the
    /// `options.languages` allowlist filter.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.tag() == tag)
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Extension/shebang-keyword registry backing extension-map detection.
pub struct LanguageRegistry {
    extension_map: HashMap<&'static str, LanguageId>,
}

impl LanguageRegistry {
    /// Build a registry covering every [`LanguageId::all`] extension.
    #[must_use]
    pub fn new() -> Self {
        let mut extension_map = HashMap::new();
        for &lang in LanguageId::all() {
            for ext in lang.extensions() {
                extension_map.insert(*ext, lang);
            }
        }
        Self { extension_map }
    }

    /// Look up a language by extension (with or without leading dot, any
    /// case).
    #[must_use]
    pub fn by_extension(&self, ext: &str) -> Option<LanguageId> {
        let cleaned = ext.trim_start_matches('.').to_lowercase();
        self.extension_map.get(cleaned.as_str()).copied()
    }

    /// Resolve a shebang interpreter name, per the spec's shebang rule.
    #[must_use]
    pub fn by_shebang_interpreter(&self, interpreter: &str) -> Option<LanguageId> {
        match interpreter {
            "python" | "python2" | "python3" => Some(LanguageId::Python),
            "node" => Some(LanguageId::JavaScript),
            "ruby" => Some(LanguageId::Ruby),
            "perl" => None,
            "php" => Some(LanguageId::Php),
            "bash" | "sh" | "zsh" => Some(LanguageId::Shell),
            _ => None,
        }
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
