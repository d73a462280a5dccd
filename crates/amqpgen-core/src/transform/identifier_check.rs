//! Rejects protocols whose normalized names would collide in generated code.

use std::collections::HashMap;

use crate::error::TransformError;
use crate::ir::{IrClass, IrMethod, IrProtocol};

/// Type names every class module imports from the shared contract.
pub const CONTRACT_TYPES: &[&str] = &["Method", "MethodFrame"];

/// Modules emitted next to the class modules.
pub const SHARED_MODULES: &[&str] = &["wire"];

/// Constant emitted in every class module alongside the method id constants.
pub const CLASS_ID_CONST: &str = "CLASS_ID";

/// Check every identifier the generator derives from the protocol.
pub fn check_identifiers(ir: &IrProtocol) -> Result<(), TransformError> {
    let mut modules: HashMap<&str, &str> = HashMap::new();
    for class in &ir.classes {
        let module = class.name.snake_case.as_str();
        if SHARED_MODULES.contains(&module) {
            return Err(malformed(format!(
                "class `{}` normalizes to the reserved module name `{module}`",
                class.name
            )));
        }
        if let Some(previous) = modules.insert(module, &class.name.original) {
            return Err(malformed(format!(
                "classes `{previous}` and `{}` both normalize to module `{module}`",
                class.name
            )));
        }

        check_class(class)?;
        for method in &class.methods {
            check_fields(class, method)?;
        }
    }
    Ok(())
}

/// Reject a method struct named `type_name`, for names the target imports
/// into every class module (e.g. the configured table type).
pub fn check_type_name_free(ir: &IrProtocol, type_name: &str) -> Result<(), TransformError> {
    for class in &ir.classes {
        if let Some(method) = class
            .methods
            .iter()
            .find(|m| m.name.pascal_case == type_name)
        {
            return Err(malformed(format!(
                "method `{}` normalizes to `{type_name}`, which is already imported",
                method.display_name
            )));
        }
    }
    Ok(())
}

fn check_class(class: &IrClass) -> Result<(), TransformError> {
    let mut structs: HashMap<&str, &str> = HashMap::new();
    let mut consts: HashMap<&str, &str> = HashMap::new();
    consts.insert(CLASS_ID_CONST, "the class id");

    for method in &class.methods {
        let type_name = method.name.pascal_case.as_str();
        if CONTRACT_TYPES.contains(&type_name) {
            return Err(malformed(format!(
                "method `{}` normalizes to `{type_name}`, which is reserved",
                method.display_name
            )));
        }
        if let Some(previous) = structs.insert(type_name, &method.display_name) {
            return Err(malformed(format!(
                "methods `{previous}` and `{}` both normalize to struct `{type_name}`",
                method.display_name
            )));
        }

        let constant = method.name.screaming_snake.as_str();
        if let Some(previous) = consts.insert(constant, &method.display_name) {
            return Err(malformed(format!(
                "`{}` and {previous} both normalize to constant `{}::{constant}`",
                method.display_name, class.name.snake_case
            )));
        }
    }

    // Unit structs share the value namespace with the constants.
    for method in class.methods.iter().filter(|m| m.fields.is_empty()) {
        let type_name = method.name.pascal_case.as_str();
        if consts.contains_key(type_name) {
            return Err(malformed(format!(
                "unit struct `{type_name}` of `{}` clashes with a constant of the same name",
                method.display_name
            )));
        }
    }
    Ok(())
}

fn check_fields(class: &IrClass, method: &IrMethod) -> Result<(), TransformError> {
    let mut fields: HashMap<&str, &str> = HashMap::new();
    for field in &method.fields {
        let ident = field.name.snake_case.as_str();
        if let Some(previous) = fields.insert(ident, &field.name.original) {
            return Err(malformed(format!(
                "arguments `{previous}` and `{}` of `{}.{}` both normalize to field `{ident}`",
                field.name, class.name, method.name
            )));
        }
    }
    Ok(())
}

fn malformed(message: String) -> TransformError {
    TransformError::Malformed(message)
}
