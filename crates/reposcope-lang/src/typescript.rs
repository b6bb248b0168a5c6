//! AST-based structural extraction for TypeScript and JavaScript.
//!
//! Dispatches on a small tagged sum type over the grammar's node kinds
//! rather than matching raw `node.kind()` strings at every call site -
//! unrecognized kinds fall into [`TsNodeKind::Other`] and are skipped,
//! never panicked on.

use reposcope_domain::entities::{
    Class, Export, ExportKind, Function, Import, ImportSpecifier, Parameter, ParsedFile,
    Property, SourceLocation,
};
use tree_sitter::{Node, Parser};

/// Tagged view over the subset of grammar node kinds this extractor
/// recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TsNodeKind {
    ImportStatement,
    ExportStatement,
    FunctionDeclaration,
    LexicalDeclaration,
    VariableDeclaration,
    ClassDeclaration,
    Other,
}

fn classify(kind: &str) -> TsNodeKind {
    match kind {
        "import_statement" => TsNodeKind::ImportStatement,
        "export_statement" => TsNodeKind::ExportStatement,
        "function_declaration" | "generator_function_declaration" => {
            TsNodeKind::FunctionDeclaration
        }
        "lexical_declaration" => TsNodeKind::LexicalDeclaration,
        "variable_declaration" => TsNodeKind::VariableDeclaration,
        "class_declaration" => TsNodeKind::ClassDeclaration,
        _ => TsNodeKind::Other,
    }
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn strip_quotes(raw: &str) -> String {
    raw.trim_matches(|c| c == '"' || c == '\'' || c == '`').to_owned()
}

fn location_of(node: Node) -> SourceLocation {
    let start = node.start_position();
    SourceLocation {
        start_offset: node.start_byte(),
        end_offset: node.end_byte(),
        line: Some(start.row as u32 + 1),
        column: Some(start.column as u32 + 1),
    }
}

/// Render a TS type-annotation node as the spec's string-rendering rule:
/// primitive keywords verbatim, arrays as `T[]`, references by name,
/// unions/intersections joined with ` | ` / ` & `, otherwise `any`.
fn render_type(node: Node, source: &str) -> String {
    match node.kind() {
        "type_annotation" => node
            .child(1)
            .map(|n| render_type(n, source))
            .unwrap_or_else(|| "any".to_owned()),
        "predefined_type" | "type_identifier" | "literal_type" => text(node, source).to_owned(),
        "array_type" => {
            let inner = node
                .child(0)
                .map(|n| render_type(n, source))
                .unwrap_or_else(|| "any".to_owned());
            format!("{inner}[]")
        }
        "union_type" => join_type_children(node, source, " | "),
        "intersection_type" => join_type_children(node, source, " & "),
        "generic_type" | "nested_type_identifier" | "qualified_name" => text(node, source).to_owned(),
        _ => "any".to_owned(),
    }
}

fn join_type_children(node: Node, source: &str, sep: &str) -> String {
    let mut parts = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        parts.push(render_type(child, source));
    }
    if parts.is_empty() {
        "any".to_owned()
    } else {
        parts.join(sep)
    }
}

fn parse_parameters(params_node: Node, source: &str) -> Vec<Parameter> {
    let mut out = Vec::new();
    let mut cursor = params_node.walk();
    for child in params_node.named_children(&mut cursor) {
        let (name_node, type_node) = match child.kind() {
            "required_parameter" | "optional_parameter" => (
                child.child_by_field_name("pattern"),
                child.child_by_field_name("type"),
            ),
            "identifier" | "rest_pattern" => (Some(child), None),
            _ => (child.child_by_field_name("pattern").or(Some(child)), None),
        };
        let Some(name_node) = name_node else { continue };
        let name = text(name_node, source).to_owned();
        let param_type = type_node.map(|t| render_type(t, source));
        out.push(Parameter { name, param_type });
    }
    out
}

fn modifiers_of(node: Node, source: &str) -> Vec<String> {
    let mut mods = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match text(child, source) {
            "static" | "private" | "protected" | "readonly" | "abstract" | "async" => {
                mods.push(text(child, source).to_owned());
            }
            _ => {}
        }
    }
    mods
}

fn extract_function(node: Node, source: &str, fallback_name: &str) -> Function {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, source).to_owned())
        .unwrap_or_else(|| fallback_name.to_owned());
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| parse_parameters(p, source))
        .unwrap_or_default();
    let return_type = node
        .child_by_field_name("return_type")
        .map(|t| render_type(t, source));
    let raw = text(node, source);
    Function {
        name,
        parameters,
        return_type,
        is_async: raw.trim_start().starts_with("async"),
        is_generator: raw.contains('*') && !raw.contains("**"),
        location: location_of(node),
        docstring: leading_doc_comment(node, source),
        modifiers: modifiers_of(node, source),
    }
}

fn leading_doc_comment(node: Node, source: &str) -> Option<String> {
    let prev = node.prev_sibling()?;
    if prev.kind() != "comment" {
        return None;
    }
    let raw = text(prev, source);
    if !raw.starts_with("/**") {
        return None;
    }
    Some(
        raw.trim_start_matches("/**")
            .trim_end_matches("*/")
            .lines()
            .map(|l| l.trim().trim_start_matches('*').trim())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_owned(),
    )
}

fn extract_imports(node: Node, source: &str, imports: &mut Vec<Import>) {
    let Some(source_node) = node.child_by_field_name("source") else {
        return;
    };
    let module_source = strip_quotes(text(source_node, source));
    let is_type_only = node
        .children(&mut node.walk())
        .any(|c| c.kind() == "type" || text(c, source) == "type");

    let mut specifiers = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_clause" => {
                let mut clause_cursor = child.walk();
                for clause_child in child.children(&mut clause_cursor) {
                    match clause_child.kind() {
                        "identifier" => specifiers.push(ImportSpecifier {
                            name: "default".to_owned(),
                            alias: Some(text(clause_child, source).to_owned()),
                        }),
                        "namespace_import" => {
                            let alias = clause_child
                                .named_child(0)
                                .map(|n| text(n, source).to_owned());
                            specifiers.push(ImportSpecifier {
                                name: "*".to_owned(),
                                alias,
                            });
                        }
                        "named_imports" => {
                            let mut named_cursor = clause_child.walk();
                            for spec in clause_child.named_children(&mut named_cursor) {
                                if spec.kind() != "import_specifier" {
                                    continue;
                                }
                                let imported = spec
                                    .child_by_field_name("name")
                                    .map(|n| text(n, source).to_owned())
                                    .unwrap_or_default();
                                let local = spec
                                    .child_by_field_name("alias")
                                    .map(|n| text(n, source).to_owned());
                                let alias = local.filter(|l| l != &imported);
                                specifiers.push(ImportSpecifier {
                                    name: imported,
                                    alias,
                                });
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    imports.push(Import {
        source: module_source,
        specifiers,
        is_type_only,
    });
}

fn bound_identifiers(declaration: Node, source: &str) -> Vec<String> {
    match declaration.kind() {
        "function_declaration" | "class_declaration" | "generator_function_declaration" => {
            declaration
                .child_by_field_name("name")
                .map(|n| vec![text(n, source).to_owned()])
                .unwrap_or_default()
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut names = Vec::new();
            let mut cursor = declaration.walk();
            for child in declaration.named_children(&mut cursor) {
                if child.kind() == "variable_declarator" {
                    if let Some(name_node) = child.child_by_field_name("name") {
                        names.push(text(name_node, source).to_owned());
                    }
                }
            }
            names
        }
        _ => Vec::new(),
    }
}

fn extract_exports(node: Node, source: &str, exports: &mut Vec<Export>) {
    let is_default = node.children(&mut node.walk()).any(|c| c.kind() == "default");
    let has_star = node.children(&mut node.walk()).any(|c| c.kind() == "*");

    if has_star {
        let source_module = node
            .child_by_field_name("source")
            .map(|n| strip_quotes(text(n, source)));
        exports.push(Export {
            name: "*".to_owned(),
            kind: ExportKind::All,
            source: source_module,
        });
        return;
    }

    if is_default {
        let decl = node.child_by_field_name("declaration").or_else(|| node.child_by_field_name("value"));
        let name = decl
            .and_then(|d| d.child_by_field_name("name"))
            .map(|n| text(n, source).to_owned())
            .unwrap_or_else(|| "default".to_owned());
        exports.push(Export {
            name,
            kind: ExportKind::Default,
            source: None,
        });
        return;
    }

    if let Some(decl) = node.child_by_field_name("declaration") {
        for name in bound_identifiers(decl, source) {
            exports.push(Export {
                name,
                kind: ExportKind::Named,
                source: None,
            });
        }
        return;
    }

    let source_module = node
        .child_by_field_name("source")
        .map(|n| strip_quotes(text(n, source)));
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "export_clause" {
            continue;
        }
        let mut clause_cursor = child.walk();
        for spec in child.named_children(&mut clause_cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let name = spec
                .child_by_field_name("name")
                .map(|n| text(n, source).to_owned())
                .unwrap_or_default();
            exports.push(Export {
                name,
                kind: ExportKind::Named,
                source: source_module.clone(),
            });
        }
    }
}

fn extract_class(node: Node, source: &str) -> Class {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, source).to_owned())
        .unwrap_or_else(|| "anonymous".to_owned());
    let super_class = node
        .child_by_field_name("heritage")
        .and_then(|h| h.named_child(0))
        .and_then(|h| h.named_child(0))
        .map(|n| text(n, source).to_owned());

    let mut methods = Vec::new();
    let mut properties = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_definition" => {
                    methods.push(extract_function(member, source, "anonymous"));
                }
                "public_field_definition" => {
                    if let Some(name_node) = member.child_by_field_name("property") {
                        let property_type = member
                            .child_by_field_name("type")
                            .map(|t| render_type(t, source));
                        properties.push(Property {
                            name: text(name_node, source).to_owned(),
                            property_type,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    let decorators = node
        .prev_sibling()
        .filter(|s| s.kind() == "decorator")
        .map(|d| vec![text(d, source).trim_start_matches('@').to_owned()])
        .unwrap_or_default();

    Class {
        name,
        methods,
        properties,
        super_class,
        decorators,
        location: location_of(node),
        docstring: leading_doc_comment(node, source),
    }
}

fn walk(node: Node, source: &str, out: &mut ParsedFile) {
    match classify(node.kind()) {
        TsNodeKind::ImportStatement => extract_imports(node, source, &mut out.imports),
        TsNodeKind::ExportStatement => extract_exports(node, source, &mut out.exports),
        TsNodeKind::FunctionDeclaration => {
            out.functions.push(extract_function(node, source, "anonymous"));
        }
        TsNodeKind::LexicalDeclaration | TsNodeKind::VariableDeclaration => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let Some(value) = declarator.child_by_field_name("value") else {
                    continue;
                };
                if matches!(value.kind(), "arrow_function" | "function") {
                    let name = declarator
                        .child_by_field_name("name")
                        .map(|n| text(n, source).to_owned())
                        .unwrap_or_else(|| "anonymous".to_owned());
                    out.functions.push(extract_function(value, source, &name));
                }
            }
        }
        TsNodeKind::ClassDeclaration => out.classes.push(extract_class(node, source)),
        TsNodeKind::Other => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, out);
            }
        }
    }
}

/// Parse `content` (already classified as `language`, "typescript" or
/// "javascript") and extract its structure. Returns `None` if the grammar
/// fails to load or the source cannot be parsed at all.
#[must_use]
pub fn extract(relative_path: &str, language: &str, content: &str) -> Option<ParsedFile> {
    let mut parser = Parser::new();
    let grammar = if language == "typescript" {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    } else {
        tree_sitter_javascript::LANGUAGE.into()
    };
    parser.set_language(&grammar).ok()?;
    let tree = parser.parse(content, None)?;

    let mut parsed = ParsedFile::empty(relative_path, language);
    walk(tree.root_node(), content, &mut parsed);
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_default_and_named_imports() {
        let src = r#"import React from "react";
import { useState, useEffect as fx } from "react";
"#;
        let parsed = extract("a.tsx", "typescript", src).unwrap();
        assert_eq!(parsed.imports.len(), 2);
        assert_eq!(parsed.imports[0].specifiers[0].name, "default");
        assert_eq!(parsed.imports[1].specifiers[1].alias.as_deref(), Some("fx"));
    }

    #[test]
    fn extracts_function_declaration_with_types() {
        let src = "function add(a: number, b: number): number { return a + b; }";
        let parsed = extract("a.ts", "typescript", src).unwrap();
        assert_eq!(parsed.functions.len(), 1);
        assert_eq!(parsed.functions[0].name, "add");
        assert_eq!(parsed.functions[0].return_type.as_deref(), Some("number"));
    }

    #[test]
    fn extracts_arrow_function_assigned_to_const() {
        let src = "const double = (x: number) => x * 2;";
        let parsed = extract("a.ts", "typescript", src).unwrap();
        assert_eq!(parsed.functions.len(), 1);
        assert_eq!(parsed.functions[0].name, "double");
    }

    #[test]
    fn extracts_class_with_superclass() {
        let src = "class Dog extends Animal { bark() { return 1; } }";
        let parsed = extract("a.ts", "typescript", src).unwrap();
        assert_eq!(parsed.classes.len(), 1);
        assert_eq!(parsed.classes[0].super_class.as_deref(), Some("Animal"));
        assert_eq!(parsed.classes[0].methods.len(), 1);
    }

    #[test]
    fn extracts_named_export_of_function() {
        let src = "export function greet() { return 'hi'; }";
        let parsed = extract("a.ts", "typescript", src).unwrap();
        assert_eq!(parsed.exports.len(), 1);
        assert_eq!(parsed.exports[0].name, "greet");
    }

    #[test]
    fn javascript_grammar_parses_plain_js() {
        let src = "const x = require('fs');";
        let parsed = extract("a.js", "javascript", src).unwrap();
        assert_eq!(parsed.language, "javascript");
    }
}
