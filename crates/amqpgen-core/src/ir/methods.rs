use super::layout::{DecodeStep, EncodeStep, LayoutNode};
use super::types::{NormalizedName, PrimitiveType};
use crate::transform::bit_packer;

/// A method with resolved argument types and its wire layout.
#[derive(Debug, Clone)]
pub struct IrMethod {
    pub id: u16,
    pub class_id: u16,
    pub name: NormalizedName,
    /// `"<class>.<method>"` as reported by the dispatch table.
    pub display_name: String,
    pub synchronous: bool,
    /// One field per argument, in wire order.
    pub fields: Vec<IrField>,
    /// `fields` partitioned into plain fields and packed bit groups.
    pub layout: Vec<LayoutNode>,
}

impl IrMethod {
    pub fn uses_type(&self, ty: PrimitiveType) -> bool {
        self.fields.iter().any(|f| f.field_type == ty)
    }

    pub fn decode_plan(&self) -> Vec<DecodeStep> {
        bit_packer::decode_plan(&self.layout)
    }

    pub fn encode_plan(&self) -> Vec<EncodeStep> {
        bit_packer::encode_plan(&self.layout)
    }
}

/// A single method argument.
#[derive(Debug, Clone, PartialEq)]
pub struct IrField {
    pub name: NormalizedName,
    pub field_type: PrimitiveType,
    /// The domain alias the type was resolved through, if any.
    pub domain: Option<String>,
}
