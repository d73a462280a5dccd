use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::ResolveError;

use super::methods::IrMethod;

/// Name of the dispatch entry returned for undeclared `(class, method)` pairs.
pub const UNKNOWN_METHOD: &str = "UNKNOWN";

/// A fully resolved, generator-ready intermediate representation of a protocol spec.
#[derive(Debug, Clone)]
pub struct IrProtocol {
    pub info: IrInfo,
    /// Every declared domain, pre-resolved to its primitive type.
    pub domains: IndexMap<String, PrimitiveType>,
    pub classes: Vec<IrClass>,
}

impl IrProtocol {
    /// Find the method declared for `(class_id, method_id)`.
    pub fn find_method(&self, class_id: u16, method_id: u16) -> Option<&IrMethod> {
        self.classes
            .iter()
            .find(|c| c.id == class_id)?
            .methods
            .iter()
            .find(|m| m.id == method_id)
    }

    /// Resolve a `(class_id, method_id)` pair to its `"class.method"` display
    /// name, or [`UNKNOWN_METHOD`].
    pub fn method_name(&self, class_id: u16, method_id: u16) -> &str {
        self.find_method(class_id, method_id)
            .map(|m| m.display_name.as_str())
            .unwrap_or(UNKNOWN_METHOD)
    }

    /// All dispatch entries in declaration order.
    pub fn dispatch_entries(&self) -> impl Iterator<Item = (u16, u16, &str)> {
        self.classes.iter().flat_map(|c| {
            c.methods
                .iter()
                .map(move |m| (c.id, m.id, m.display_name.as_str()))
        })
    }

    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }
}

/// Protocol metadata.
#[derive(Debug, Clone, Default)]
pub struct IrInfo {
    pub name: Option<String>,
    /// `(major, minor, revision)` when the spec declares all three.
    pub version: Option<(u8, u8, u8)>,
    pub port: Option<u16>,
}

/// A protocol class grouping its methods.
#[derive(Debug, Clone)]
pub struct IrClass {
    pub id: u16,
    pub name: NormalizedName,
    pub methods: Vec<IrMethod>,
}

impl IrClass {
    /// Whether any method of this class carries an argument of type `ty`.
    pub fn uses_type(&self, ty: PrimitiveType) -> bool {
        self.methods.iter().any(|m| m.uses_type(ty))
    }
}

/// A name with every target casing pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    /// Field / module identifier: `frame-max` -> `frame_max`, `type` -> `_type`.
    pub snake_case: String,
    /// Type identifier: `start-ok` -> `StartOk`.
    pub pascal_case: String,
    /// Constant identifier: `start-ok` -> `START_OK`.
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// The closed set of wire-level value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Octet,
    Short,
    Long,
    LongLong,
    Bit,
    ShortString,
    LongString,
    Table,
    Timestamp,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Octet,
        PrimitiveType::Short,
        PrimitiveType::Long,
        PrimitiveType::LongLong,
        PrimitiveType::Bit,
        PrimitiveType::ShortString,
        PrimitiveType::LongString,
        PrimitiveType::Table,
        PrimitiveType::Timestamp,
    ];

    /// The spelling used in protocol spec documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Octet => "octet",
            PrimitiveType::Short => "short",
            PrimitiveType::Long => "long",
            PrimitiveType::LongLong => "longlong",
            PrimitiveType::Bit => "bit",
            PrimitiveType::ShortString => "shortstr",
            PrimitiveType::LongString => "longstr",
            PrimitiveType::Table => "table",
            PrimitiveType::Timestamp => "timestamp",
        }
    }

    pub fn is_bit(&self) -> bool {
        matches!(self, PrimitiveType::Bit)
    }

    /// Encoded width in bytes for fixed-size types.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            PrimitiveType::Octet => Some(1),
            PrimitiveType::Short => Some(2),
            PrimitiveType::Long => Some(4),
            PrimitiveType::LongLong | PrimitiveType::Timestamp => Some(8),
            PrimitiveType::Bit
            | PrimitiveType::ShortString
            | PrimitiveType::LongString
            | PrimitiveType::Table => None,
        }
    }
}

impl FromStr for PrimitiveType {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ResolveError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
