use amqpgen_core::config::RustConfig;
use amqpgen_core::ir::IrProtocol;
use amqpgen_core::transform::identifier_check::check_type_name_free;
use amqpgen_core::{CodeGenerator, GeneratedFile, GeneratorError};
use log::info;

use crate::emitters;

/// Default name of the generated source file.
pub const OUTPUT_FILE: &str = "protocol.rs";

/// Rust method codec generator.
pub struct RustGenerator;

impl CodeGenerator for RustGenerator {
    type Config = RustConfig;
    type Error = GeneratorError;

    fn generate(
        &self,
        ir: &IrProtocol,
        config: &RustConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        check_type_name_free(ir, &config.table_type)?;
        let content = emitters::emit_protocol(ir, config)?;
        info!(
            "generated {} classes, {} methods ({} bytes)",
            ir.classes.len(),
            ir.method_count(),
            content.len()
        );

        Ok(vec![GeneratedFile {
            path: OUTPUT_FILE.to_string(),
            content,
        }])
    }
}
