pub mod classes;
pub mod contract;
pub mod dispatch;
pub mod methods;

use amqpgen_core::GeneratorError;
use amqpgen_core::config::RustConfig;
use amqpgen_core::ir::IrProtocol;
use minijinja::Environment;

/// Build the template environment shared by all emitters.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    for (name, source) in [
        ("contract.rs.j2", include_str!("../../templates/contract.rs.j2")),
        ("dispatch.rs.j2", include_str!("../../templates/dispatch.rs.j2")),
        ("class.rs.j2", include_str!("../../templates/class.rs.j2")),
    ] {
        env.add_template(name, source).map_err(template_error)?;
    }
    Ok(env)
}

pub(crate) fn template_error(err: minijinja::Error) -> GeneratorError {
    GeneratorError::Other(format!("template error: {err}"))
}

/// Emit `protocol.rs`: the shared contract, the dispatch table, then one
/// module per class in declaration order.
pub fn emit_protocol(ir: &IrProtocol, config: &RustConfig) -> Result<String, GeneratorError> {
    let env = environment()?;

    let mut sections = vec![
        contract::emit_contract(&env, ir, config)?,
        dispatch::emit_dispatch(&env, ir)?,
    ];
    for class in &ir.classes {
        sections.push(classes::emit_class(&env, class, config)?);
    }

    let mut out = sections
        .iter()
        .map(|s| s.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    Ok(out)
}
