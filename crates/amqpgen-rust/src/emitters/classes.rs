use amqpgen_core::GeneratorError;
use amqpgen_core::config::RustConfig;
use amqpgen_core::ir::{IrClass, PrimitiveType};
use log::debug;
use minijinja::{Environment, context};

use super::methods::method_to_ctx;
use super::template_error;

/// Emit `pub mod <class>` with its id constants, method structs and `Method` impls.
pub fn emit_class(
    env: &Environment<'_>,
    class: &IrClass,
    config: &RustConfig,
) -> Result<String, GeneratorError> {
    debug!(
        "emitting class {} ({} methods)",
        class.name.original,
        class.methods.len()
    );
    let tmpl = env.get_template("class.rs.j2").map_err(template_error)?;

    let methods: Vec<minijinja::Value> = class
        .methods
        .iter()
        .map(|m| method_to_ctx(m, config))
        .collect();

    tmpl.render(context! {
        class => context! {
            module => class.name.snake_case.clone(),
            id => class.id,
            imports => class_imports(class, config),
            methods => methods,
        },
        derives => config.derives.join(", "),
    })
    .map_err(template_error)
}

/// The `use` lines a class module needs, and no others.
pub fn class_imports(class: &IrClass, config: &RustConfig) -> Vec<String> {
    let mut imports = Vec::new();

    let needs_wire = class.methods.iter().any(|m| {
        m.fields
            .iter()
            .any(|f| f.field_type != PrimitiveType::Table)
    });
    if needs_wire {
        imports.push("use super::wire;".to_string());
    }
    imports.push("use super::{Method, MethodFrame};".to_string());
    if class.uses_type(PrimitiveType::Table) {
        imports.push(format!(
            "use {}::{{{}, decode_table, encode_table}};",
            config.table_module, config.table_type
        ));
    }

    imports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::environment;
    use amqpgen_core::ir::IrProtocol;
    use amqpgen_core::{parse, transform};

    const SPEC: &str = r#"{
        "domains": [["peer-properties", "table"]],
        "classes": [
            {"id": 10, "name": "connection", "methods": [
                {"id": 10, "name": "start", "synchronous": true, "arguments": [
                    {"name": "version-major", "type": "octet"},
                    {"name": "version-minor", "type": "octet"}
                ]},
                {"id": 11, "name": "start-ok", "arguments": [
                    {"name": "client-properties", "domain": "peer-properties"}
                ]},
                {"id": 51, "name": "close-ok", "arguments": []}
            ]},
            {"id": 90, "name": "tx", "methods": [
                {"id": 10, "name": "select", "arguments": []}
            ]},
            {"id": 95, "name": "props", "methods": [
                {"id": 10, "name": "set", "arguments": [
                    {"name": "values", "type": "table"}
                ]}
            ]}
        ]
    }"#;

    fn ir() -> IrProtocol {
        transform::transform(&parse::from_json(SPEC).unwrap()).unwrap()
    }

    #[test]
    fn test_imports_follow_usage() {
        let ir = ir();
        let config = RustConfig::default();

        assert_eq!(
            class_imports(&ir.classes[0], &config),
            [
                "use super::wire;",
                "use super::{Method, MethodFrame};",
                "use crate::table::{Table, decode_table, encode_table};",
            ]
        );
        // No arguments: contract only.
        assert_eq!(
            class_imports(&ir.classes[1], &config),
            ["use super::{Method, MethodFrame};"]
        );
        // Table arguments only: no byte helpers.
        assert_eq!(
            class_imports(&ir.classes[2], &config),
            [
                "use super::{Method, MethodFrame};",
                "use crate::table::{Table, decode_table, encode_table};",
            ]
        );
    }

    #[test]
    fn test_emit_connection_class() {
        let ir = ir();
        let out = emit_class(&environment().unwrap(), &ir.classes[0], &RustConfig::default()).unwrap();

        assert!(out.starts_with("pub mod connection {\n"));
        assert!(out.contains("    pub const CLASS_ID: u16 = 10;\n"));
        assert!(out.contains("    pub const START_OK: u16 = 11;\n"));
        assert!(out.contains("    /// Method 10:start (synchronous)\n"));
        assert!(out.contains("    #[derive(Debug, Clone, PartialEq)]\n    pub struct Start {\n"));
        assert!(out.contains("        pub version_major: u8,\n        pub version_minor: u8,\n"));
        assert!(out.contains(
            "            if method_frame.class_id != 10 || method_frame.method_id != 10 {\n"
        ));
        assert!(out.contains(
            "            let version_major = wire::read_u8(&mut reader)?;\n            let version_minor = wire::read_u8(&mut reader)?;\n"
        ));
        assert!(out.contains("            \"connection.start\"\n"));
        assert!(out.contains("        pub client_properties: Table,\n"));
        assert!(out.trim_end().ends_with('}'));
    }

    #[test]
    fn test_emit_unit_struct() {
        let ir = ir();
        let out = emit_class(&environment().unwrap(), &ir.classes[0], &RustConfig::default()).unwrap();

        assert!(out.contains("    pub struct CloseOk;\n"));
        assert!(out.contains("            Some(Self)\n"));
        assert!(out.contains("            Vec::new()\n"));
    }

    #[test]
    fn test_no_derives() {
        let ir = ir();
        let config = RustConfig {
            derives: vec![],
            ..RustConfig::default()
        };
        let out = emit_class(&environment().unwrap(), &ir.classes[1], &config).unwrap();
        assert!(!out.contains("#[derive"));
        assert!(out.contains("    pub struct Select;\n"));
    }
}
