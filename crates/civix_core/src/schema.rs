//! Per-service attribute schema — what a citizen may (or must) submit with
//! a request for a given service code. Loaded through `ServiceStore`.

// `from_str() -> Option<Self>` rather than `FromStr` — unknown labels are
// None, not an error.
#![allow(clippy::should_implement_trait)]

use serde::{Deserialize, Serialize};

/// Value kind of a submittable attribute. Closed set: validation dispatches
/// statically on the variant (see `validation`), never on a runtime label.
/// Serialized with the Open311 datatype names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Single-line string, accepted verbatim.
    String,
    /// Free text, possibly multi-line, accepted verbatim.
    Text,
    /// Decimal number.
    Number,
    /// ISO-8601 timestamp.
    Datetime,
    SingleValueList,
    MultiValueList,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Number => "number",
            Self::Datetime => "datetime",
            Self::SingleValueList => "singlevaluelist",
            Self::MultiValueList => "multivaluelist",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "datetime" => Some(Self::Datetime),
            "singlevaluelist" => Some(Self::SingleValueList),
            "multivaluelist" => Some(Self::MultiValueList),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One permitted value of a select-kind attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOption {
    /// Stable key submitted by clients (case-sensitive match).
    pub key: String,
    /// Human-readable label.
    pub name: String,
}

/// Schema element describing one submittable field of a service.
/// Attribute codes are unique within a (jurisdiction, service) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinitionAttribute {
    /// Stable attribute key, e.g. `SDWLK`.
    pub code: String,
    /// Human label shown to submitters.
    pub description: String,
    pub kind: AttributeKind,
    pub required: bool,
    /// Permitted values; only meaningful for the select kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AttributeOption>,
    /// Catalog-declared position — drives documentation output and
    /// validation-error ordering.
    pub order: i32,
}

impl ServiceDefinitionAttribute {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        kind: AttributeKind,
        required: bool,
        order: i32,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            kind,
            required,
            options: Vec::new(),
            order,
        }
    }

    /// Set the permitted values (builder pattern, select kinds only).
    pub fn with_options<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = keys
            .into_iter()
            .map(|k| {
                let key = k.into();
                AttributeOption {
                    name: key.clone(),
                    key,
                }
            })
            .collect();
        self
    }

    /// Case-sensitive membership test against the permitted value list.
    pub fn permits(&self, key: &str) -> bool {
        self.options.iter().any(|o| o.key == key)
    }
}

/// Ordered attribute schema for one service. The order is the catalog's
/// declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub service_code: String,
    pub attributes: Vec<ServiceDefinitionAttribute>,
}

impl ServiceDefinition {
    pub fn new(service_code: impl Into<String>, attributes: Vec<ServiceDefinitionAttribute>) -> Self {
        Self {
            service_code: service_code.into(),
            attributes,
        }
    }
}
