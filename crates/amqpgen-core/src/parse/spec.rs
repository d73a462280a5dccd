use serde::{Deserialize, Serialize};

/// Top-level protocol specification (the `amqp-*.json` document).
///
/// Keys the generator does not use (`constants`, `label`, `default-value`,
/// content `properties`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        rename = "major-version",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub major_version: Option<u8>,

    #[serde(
        rename = "minor-version",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub minor_version: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// `[alias, primitive type]` pairs in declaration order.
    pub domains: Vec<(String, String)>,

    pub classes: Vec<ClassDef>,
}

impl ProtocolSpec {
    /// `(major, minor, revision)` when all three are declared.
    pub fn version(&self) -> Option<(u8, u8, u8)> {
        Some((self.major_version?, self.minor_version?, self.revision?))
    }
}

/// A protocol class: a namespace of methods sharing one class id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub id: u16,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synchronous: Option<bool>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDef>,
}

/// A method argument. Exactly one of `type` and `domain` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// How an argument names its wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType<'a> {
    Direct(&'a str),
    Domain(&'a str),
}

impl ArgumentDef {
    /// The argument's type reference, or `None` when both or neither of
    /// `type` and `domain` are present.
    pub fn type_ref(&self) -> Option<ArgumentType<'_>> {
        match (&self.type_name, &self.domain) {
            (Some(t), None) => Some(ArgumentType::Direct(t)),
            (None, Some(d)) => Some(ArgumentType::Domain(d)),
            _ => None,
        }
    }
}
