pub mod spec;

use std::collections::HashSet;

use crate::error::ParseError;
use spec::ProtocolSpec;

/// Parse a protocol spec from JSON.
pub fn from_json(input: &str) -> Result<ProtocolSpec, ParseError> {
    let spec: ProtocolSpec = serde_json::from_str(input)?;
    validate_structure(&spec)?;
    Ok(spec)
}

/// Parse a protocol spec from YAML.
pub fn from_yaml(input: &str) -> Result<ProtocolSpec, ParseError> {
    let spec: ProtocolSpec = serde_yaml_ng::from_str(input)?;
    validate_structure(&spec)?;
    Ok(spec)
}

/// Check the structural invariants serde cannot express: unique domain
/// aliases, unique class ids, unique method ids per class, and exactly one
/// of `type`/`domain` per argument.
pub fn validate_structure(spec: &ProtocolSpec) -> Result<(), ParseError> {
    let mut aliases = HashSet::new();
    for (alias, _) in &spec.domains {
        if !aliases.insert(alias.as_str()) {
            return Err(ParseError::Malformed(format!(
                "domain `{alias}` is declared twice"
            )));
        }
    }

    let mut class_ids = HashSet::new();
    for class in &spec.classes {
        if !class_ids.insert(class.id) {
            return Err(ParseError::Malformed(format!(
                "duplicate class id {} (`{}`)",
                class.id, class.name
            )));
        }

        let mut method_ids = HashSet::new();
        for method in &class.methods {
            if !method_ids.insert(method.id) {
                return Err(ParseError::Malformed(format!(
                    "duplicate method id {} in class `{}`",
                    method.id, class.name
                )));
            }

            for arg in &method.arguments {
                if arg.type_ref().is_none() {
                    return Err(ParseError::Malformed(format!(
                        "argument `{}` of `{}.{}` must have exactly one of `type` or `domain`",
                        arg.name, class.name, method.name
                    )));
                }
            }
        }
    }

    Ok(())
}
