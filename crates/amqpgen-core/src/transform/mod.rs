pub mod bit_packer;
pub mod domain_resolver;
pub mod identifier_check;
pub mod name_normalizer;
pub mod spec_to_ir;

pub use spec_to_ir::transform;
