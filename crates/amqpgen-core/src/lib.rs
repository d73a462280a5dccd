pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;
pub mod wire;

pub use error::GeneratorError;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from the protocol IR.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        ir: &ir::IrProtocol,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
