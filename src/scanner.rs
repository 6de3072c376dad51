//! Swift declaration scanner using native tree-sitter
//!
//! Parses source with the tree-sitter Swift grammar and reports every function
//! declaration with its modifiers, selector, parameter types and the byte
//! offset of its `func` keyword. Subtrees the grammar could not parse are
//! still walked, so one broken declaration does not hide the rest of the file.

use tree_sitter::{Node, Parser};

use crate::declaration::{Attribute, DeclarationKind, DeclarationRecord, ParameterRecord};

const FUNCTION_NODES: &[&str] = &["function_declaration", "protocol_function_declaration"];

/// Nodes whose direct children are type members
const TYPE_BODIES: &[&str] = &["class_body", "enum_class_body", "protocol_body"];

/// Scan Swift source and return every function declaration in source order
pub fn scan_declarations(source: &str) -> Vec<DeclarationRecord> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&tree_sitter_swift::LANGUAGE.into()) {
        log::error!("failed to load Swift grammar: {}", e);
        return Vec::new();
    }

    let Some(tree) = parser.parse(source, None) else {
        log::error!("tree-sitter returned no tree");
        return Vec::new();
    };

    let root = tree.root_node();
    if root.has_error() {
        log::debug!("source contains syntax errors; scanning recovered nodes");
    }

    let mut records = Vec::new();
    collect_functions(root, source, &mut records);
    records
}

fn collect_functions(node: Node, source: &str, records: &mut Vec<DeclarationRecord>) {
    if FUNCTION_NODES.contains(&node.kind()) {
        if let Some(record) = function_record(node, source) {
            records.push(record);
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_functions(child, source, records);
    }
}

fn function_record(node: Node, source: &str) -> Option<DeclarationRecord> {
    let name = text(node.child_by_field_name("name")?, source)?;

    let mut keyword_offset = None;
    let mut modifiers: Vec<&str> = Vec::new();
    let mut parameters = Vec::new();
    let mut labels = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "func" => keyword_offset = Some(child.start_byte()),
            "modifiers" => collect_modifiers(child, source, &mut modifiers),
            "attribute" => modifiers.extend(modifier_keyword(child, source)),
            // `class func` may sit outside the modifiers node
            "class" | "static" if keyword_offset.is_none() => modifiers.push(child.kind()),
            "type_parameters" => generic_parameters(child, source, &mut parameters),
            "parameter" => {
                if let Some((label, type_text)) = parameter(child, source) {
                    labels.push(label);
                    parameters.push(ParameterRecord::value(type_text));
                }
            }
            _ => {}
        }
    }

    let selector = format!(
        "{}({})",
        name,
        labels.iter().map(|l| format!("{}:", l)).collect::<String>()
    );

    Some(DeclarationRecord {
        kind: function_kind(node, &modifiers),
        name: selector,
        attributes: modifiers.iter().map(|m| Attribute::from_keyword(m)).collect(),
        parameters,
        offset: keyword_offset,
    })
}

fn function_kind(node: Node, modifiers: &[&str]) -> DeclarationKind {
    let in_type_body = node
        .parent()
        .is_some_and(|parent| TYPE_BODIES.contains(&parent.kind()));

    match in_type_body {
        true if modifiers.contains(&"static") => DeclarationKind::StaticMethod,
        true if modifiers.contains(&"class") => DeclarationKind::ClassMethod,
        true => DeclarationKind::InstanceMethod,
        false => DeclarationKind::FreeFunction,
    }
}

fn collect_modifiers<'a>(node: Node, source: &'a str, modifiers: &mut Vec<&'a str>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        modifiers.extend(modifier_keyword(child, source));
    }
}

/// `@objc(doIt:)` -> `@objc`, `private(set)` -> `private`
fn modifier_keyword<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    let raw = text(node, source)?;
    let keyword = raw
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or(raw);
    (!keyword.is_empty()).then_some(keyword)
}

fn generic_parameters(node: Node, source: &str, parameters: &mut Vec<ParameterRecord>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "type_parameter" {
            continue;
        }
        if let Some(raw) = text(child, source) {
            let name = raw.split(':').next().unwrap_or(raw).trim();
            if !name.is_empty() {
                parameters.push(ParameterRecord::generic(name));
            }
        }
    }
}

/// Selector label and type text of one value parameter
///
/// Default values are siblings of the `parameter` node, so the type text runs
/// from the colon to the end of the node.
fn parameter<'a>(node: Node, source: &'a str) -> Option<(&'a str, &'a str)> {
    let mut cursor = node.walk();
    let colon = node.children(&mut cursor).find(|c| c.kind() == ":")?;

    let names = source.get(node.start_byte()..colon.start_byte())?;
    let label = names.split_whitespace().next()?;
    let type_text = source.get(colon.end_byte()..node.end_byte())?.trim();

    (!type_text.is_empty()).then_some((label, type_text))
}

fn text<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    node.utf8_text(source.as_bytes()).ok()
}
