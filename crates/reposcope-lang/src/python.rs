//! Regex-scan structural extraction for Python.
//!
//! Line-based, not a real parser: acceptable for v1 per the spec's own
//! design notes, but the primary source of parser fragility (nested defs,
//! multi-line signatures, decorators are not modeled).

use std::sync::OnceLock;

use regex::Regex;
use reposcope_domain::entities::{
    Class, Export, ExportKind, Function, Import, ImportSpecifier, Parameter, ParsedFile,
    Property, SourceLocation,
};

struct Patterns {
    import_simple: Regex,
    import_from: Regex,
    def_line: Regex,
    class_line: Regex,
    indent: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        import_simple: Regex::new(r"^import\s+([\w.]+)(?:\s+as\s+(\w+))?").unwrap(),
        import_from: Regex::new(r"^from\s+([\w.]+)\s+import\s+(.+)$").unwrap(),
        def_line: Regex::new(r"^(async\s+)?def\s+(\w+)\s*\(([^)]*)\)\s*(?:->\s*([^:]+))?:").unwrap(),
        class_line: Regex::new(r"^class\s+(\w+)\s*(?:\(([^)]*)\))?\s*:").unwrap(),
        indent: Regex::new(r"^(\s*)").unwrap(),
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn indent_of(line: &str) -> usize {
    patterns()
        .indent
        .find(line)
        .map_or(0, |m| m.as_str().len())
}

fn parse_parameters(raw: &str) -> Vec<Parameter> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|param| {
            let (name_part, param_type) = match param.split_once(':') {
                Some((name, ty)) => (name.trim(), Some(ty.split('=').next().unwrap_or(ty).trim())),
                None => (param.split('=').next().unwrap_or(param).trim(), None),
            };
            Parameter {
                name: name_part.to_owned(),
                param_type: param_type
                    .filter(|t| !t.is_empty())
                    .map(std::borrow::ToOwned::to_owned),
            }
        })
        .collect()
}

fn method_modifiers(name: &str) -> Vec<String> {
    if name.starts_with("__") && !name.ends_with("__") {
        vec!["private".to_owned()]
    } else if name.starts_with('_') {
        vec!["protected".to_owned()]
    } else {
        Vec::new()
    }
}

fn collect_docstring(lines: &[&str], after_index: usize) -> Option<String> {
    let next = lines.get(after_index + 1)?.trim();
    for quote in ["\"\"\"", "'''"] {
        if let Some(rest) = next.strip_prefix(quote) {
            if let Some(end) = rest.find(quote) {
                return Some(rest[..end].trim().to_owned());
            }
            let mut collected = vec![rest];
            for line in &lines[after_index + 2..] {
                if let Some(end) = line.find(quote) {
                    collected.push(&line[..end]);
                    return Some(collected.join("\n").trim().to_owned());
                }
                collected.push(line);
            }
            return Some(collected.join("\n").trim().to_owned());
        }
    }
    None
}

fn parse_imports(lines: &[&str]) -> Vec<Import> {
    let p = patterns();
    let mut imports = Vec::new();
    for line in lines {
        let stripped = strip_comment(line).trim();
        if let Some(caps) = p.import_simple.captures(stripped) {
            let source = caps[1].to_owned();
            let alias = caps.get(2).map(|m| m.as_str().to_owned());
            imports.push(Import {
                specifiers: vec![ImportSpecifier {
                    name: source.clone(),
                    alias,
                }],
                source,
                is_type_only: false,
            });
        } else if let Some(caps) = p.import_from.captures(stripped) {
            let source = caps[1].to_owned();
            let names_part = caps[2].trim().trim_start_matches('(').trim_end_matches(')');
            let specifiers = names_part
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|entry| {
                    if let Some((name, alias)) = entry.split_once(" as ") {
                        ImportSpecifier {
                            name: name.trim().to_owned(),
                            alias: Some(alias.trim().to_owned()),
                        }
                    } else {
                        ImportSpecifier {
                            name: entry.to_owned(),
                            alias: None,
                        }
                    }
                })
                .collect();
            imports.push(Import {
                source,
                specifiers,
                is_type_only: false,
            });
        }
    }
    imports
}

/// Extract structure from Python `content` already classified as such.
#[must_use]
pub fn extract(relative_path: &str, content: &str) -> ParsedFile {
    let lines: Vec<&str> = content.lines().collect();
    let p = patterns();

    let imports = parse_imports(&lines);
    let mut functions = Vec::new();
    let mut classes = Vec::new();
    let mut exports = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let raw = lines[i];
        let stripped = strip_comment(raw).trim_end();
        let indent = indent_of(raw);
        if indent != 0 || stripped.trim().is_empty() {
            i += 1;
            continue;
        }
        let trimmed = stripped.trim_start();

        if let Some(caps) = p.def_line.captures(trimmed) {
            let name = caps[2].to_owned();
            if !name.starts_with('_') {
                exports.push(Export {
                    name: name.clone(),
                    kind: ExportKind::Named,
                    source: None,
                });
            }
            functions.push(Function {
                parameters: parse_parameters(&caps[3]),
                return_type: caps.get(4).map(|m| m.as_str().trim().to_owned()),
                is_async: caps.get(1).is_some(),
                is_generator: false,
                location: SourceLocation {
                    start_offset: 0,
                    end_offset: 0,
                    line: Some(i as u32 + 1),
                    column: None,
                },
                docstring: collect_docstring(&lines, i),
                modifiers: Vec::new(),
                name,
            });
            i += 1;
            continue;
        }

        if let Some(caps) = p.class_line.captures(trimmed) {
            let name = caps[1].to_owned();
            let super_class = caps
                .get(2)
                .map(|m| m.as_str().trim().to_owned())
                .filter(|s| !s.is_empty());
            let docstring = collect_docstring(&lines, i);
            let mut methods = Vec::new();
            let mut j = i + 1;
            while j < lines.len() {
                let method_raw = lines[j];
                let method_indent = indent_of(method_raw);
                let method_stripped = strip_comment(method_raw).trim();
                if method_indent == 0 && !method_stripped.is_empty() {
                    break;
                }
                if method_indent > 0 {
                    if let Some(mcaps) = p.def_line.captures(method_stripped) {
                        let method_name = mcaps[2].to_owned();
                        methods.push(Function {
                            modifiers: method_modifiers(&method_name),
                            name: method_name,
                            parameters: parse_parameters(&mcaps[3]),
                            return_type: mcaps.get(4).map(|m| m.as_str().trim().to_owned()),
                            is_async: mcaps.get(1).is_some(),
                            is_generator: false,
                            location: SourceLocation {
                                start_offset: 0,
                                end_offset: 0,
                                line: Some(j as u32 + 1),
                                column: None,
                            },
                            docstring: collect_docstring(&lines, j),
                        });
                    }
                }
                j += 1;
            }

            if !name.starts_with('_') {
                exports.push(Export {
                    name: name.clone(),
                    kind: ExportKind::Named,
                    source: None,
                });
            }
            classes.push(Class {
                name,
                methods,
                properties: Vec::<Property>::new(),
                super_class,
                decorators: Vec::new(),
                location: SourceLocation {
                    start_offset: 0,
                    end_offset: 0,
                    line: Some(i as u32 + 1),
                    column: None,
                },
                docstring,
            });
            i = j;
            continue;
        }

        i += 1;
    }

    ParsedFile {
        path: relative_path.to_owned(),
        language: "python".to_owned(),
        imports,
        exports,
        functions,
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_and_from_imports() {
        let src = "import os\nfrom typing import List, Optional as Opt\n";
        let parsed = extract("a.py", src);
        assert_eq!(parsed.imports.len(), 2);
        assert_eq!(parsed.imports[0].source, "os");
        assert_eq!(parsed.imports[1].specifiers[1].alias.as_deref(), Some("Opt"));
    }

    #[test]
    fn extracts_top_level_function_with_types() {
        let src = "def add(a: int, b: int = 1) -> int:\n    return a + b\n";
        let parsed = extract("a.py", src);
        assert_eq!(parsed.functions.len(), 1);
        let f = &parsed.functions[0];
        assert_eq!(f.name, "add");
        assert_eq!(f.parameters[0].param_type.as_deref(), Some("int"));
        assert_eq!(f.return_type.as_deref(), Some("int"));
    }

    #[test]
    fn extracts_class_with_methods_and_modifiers() {
        let src = "class Widget(Base):\n    def __init__(self):\n        pass\n    def _helper(self):\n        pass\n";
        let parsed = extract("a.py", src);
        assert_eq!(parsed.classes.len(), 1);
        let c = &parsed.classes[0];
        assert_eq!(c.super_class.as_deref(), Some("Base"));
        assert_eq!(c.methods.len(), 2);
        assert_eq!(c.methods[1].modifiers, vec!["protected".to_owned()]);
    }

    #[test]
    fn underscored_top_level_names_are_not_exported() {
        let src = "def _private():\n    pass\ndef public():\n    pass\n";
        let parsed = extract("a.py", src);
        assert_eq!(parsed.exports.len(), 1);
        assert_eq!(parsed.exports[0].name, "public");
    }

    #[test]
    fn collects_single_line_docstring() {
        let src = "def foo():\n    \"\"\"Does a thing.\"\"\"\n    return 1\n";
        let parsed = extract("a.py", src);
        assert_eq!(parsed.functions[0].docstring.as_deref(), Some("Does a thing."));
    }
}
