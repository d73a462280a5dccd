use amqpgen_core::GeneratorError;
use amqpgen_core::ir::{IrProtocol, UNKNOWN_METHOD};
use minijinja::{Environment, context};

use super::template_error;

/// Emit `method_name(class_id, method_id)`, one match arm per declared method
/// plus the `UNKNOWN` fallback.
pub fn emit_dispatch(env: &Environment<'_>, ir: &IrProtocol) -> Result<String, GeneratorError> {
    let tmpl = env.get_template("dispatch.rs.j2").map_err(template_error)?;
    tmpl.render(context! { arms => dispatch_arms(ir) })
        .map_err(template_error)
}

/// Match arms in declaration order, ending with the wildcard arm.
pub fn dispatch_arms(ir: &IrProtocol) -> Vec<String> {
    ir.dispatch_entries()
        .map(|(class_id, method_id, name)| format!("({class_id}, {method_id}) => {name:?}"))
        .chain(std::iter::once(format!("(_, _) => {UNKNOWN_METHOD:?}")))
        .collect()
}
