//! Declaration records handed to rules
//!
//! The scanner produces one `DeclarationRecord` per declaration. Rules only
//! read records; `DeclarationFacts` is the normalized view most rules need.

use std::collections::BTreeSet;

/// What sort of declaration a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    InstanceMethod,
    ClassMethod,
    StaticMethod,
    FreeFunction,
    Other,
}

/// Modifier or `@attribute` attached to a declaration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Override,
    Objc,
    Final,
    Required,
    Convenience,
    Mutating,
    Dynamic,
    Open,
    Public,
    Internal,
    Fileprivate,
    Private,
    Other(String),
}

impl Attribute {
    /// Map a modifier keyword or `@attribute` spelling to an attribute
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "override" => Attribute::Override,
            "@objc" => Attribute::Objc,
            "final" => Attribute::Final,
            "required" => Attribute::Required,
            "convenience" => Attribute::Convenience,
            "mutating" => Attribute::Mutating,
            "dynamic" => Attribute::Dynamic,
            "open" => Attribute::Open,
            "public" => Attribute::Public,
            "internal" => Attribute::Internal,
            "fileprivate" => Attribute::Fileprivate,
            "private" => Attribute::Private,
            other => Attribute::Other(other.to_string()),
        }
    }
}

/// Entries that can appear in a declaration's parameter listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// An ordinary value parameter
    Value,
    /// A generic type parameter such as `T` in `func f<T>(x: T)`
    GenericTypeParameter,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    pub kind: ParameterKind,
    /// Type as spelled in source; may contain incidental whitespace
    pub type_text: String,
}

impl ParameterRecord {
    pub fn value(type_text: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::Value,
            type_text: type_text.into(),
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::GenericTypeParameter,
            type_text: name.into(),
        }
    }
}

/// A single syntactic declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRecord {
    pub kind: DeclarationKind,
    /// Full selector, e.g. `observeValue(forKeyPath:of:change:context:)`
    pub name: String,
    pub attributes: BTreeSet<Attribute>,
    pub parameters: Vec<ParameterRecord>,
    /// Byte offset of the declaration keyword; `None` when unlocatable
    pub offset: Option<usize>,
}

impl DeclarationRecord {
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            attributes: BTreeSet::new(),
            parameters: Vec::new(),
            offset: None,
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterRecord) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Normalized facts extracted from a `DeclarationRecord`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationFacts<'a> {
    pub is_instance_method: bool,
    pub has_override: bool,
    pub name: &'a str,
    /// Value parameter types in source order, whitespace removed
    pub param_types: Vec<String>,
    pub offset: Option<usize>,
}

impl<'a> DeclarationFacts<'a> {
    pub fn extract(record: &'a DeclarationRecord) -> Self {
        let param_types = record
            .parameters
            .iter()
            .filter(|p| p.kind == ParameterKind::Value)
            .map(|p| normalize_type_name(&p.type_text))
            .collect();

        Self {
            is_instance_method: record.kind == DeclarationKind::InstanceMethod,
            has_override: record.attributes.contains(&Attribute::Override),
            name: record.name.as_str(),
            param_types,
            offset: record.offset,
        }
    }
}

/// Remove every whitespace character from a type spelling
pub fn normalize_type_name(type_text: &str) -> String {
    type_text.chars().filter(|c| !c.is_whitespace()).collect()
}
