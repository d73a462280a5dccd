use amqpgen_core::GeneratorError;
use amqpgen_core::config::RustConfig;
use amqpgen_core::ir::{IrInfo, IrProtocol};
use minijinja::{Environment, context};

use super::template_error;

/// Emit the header, the `Method` trait, `MethodFrame` and the `wire` helpers.
pub fn emit_contract(
    env: &Environment<'_>,
    ir: &IrProtocol,
    config: &RustConfig,
) -> Result<String, GeneratorError> {
    let tmpl = env.get_template("contract.rs.j2").map_err(template_error)?;
    tmpl.render(context! {
        header => config.header,
        protocol => protocol_label(&ir.info),
    })
    .map_err(template_error)
}

/// `AMQP 0-9-1`, or whatever part of it the spec declares.
fn protocol_label(info: &IrInfo) -> Option<String> {
    let version = info
        .version
        .map(|(major, minor, revision)| format!("{major}-{minor}-{revision}"));
    match (&info.name, version) {
        (Some(name), Some(version)) => Some(format!("{name} {version}")),
        (Some(name), None) => Some(name.clone()),
        (None, Some(version)) => Some(version),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::environment;

    fn protocol(info: IrInfo) -> IrProtocol {
        IrProtocol {
            info,
            domains: Default::default(),
            classes: vec![],
        }
    }

    #[test]
    fn test_protocol_label() {
        let info = IrInfo {
            name: Some("AMQP".into()),
            version: Some((0, 9, 1)),
            port: None,
        };
        assert_eq!(protocol_label(&info).as_deref(), Some("AMQP 0-9-1"));
        assert_eq!(protocol_label(&IrInfo::default()), None);
    }

    #[test]
    fn test_contract_with_header() {
        let env = environment().unwrap();
        let ir = protocol(IrInfo {
            name: Some("AMQP".into()),
            version: Some((0, 9, 1)),
            port: Some(5672),
        });
        let out = emit_contract(&env, &ir, &RustConfig::default()).unwrap();

        assert!(out.starts_with("// This file is autogenerated by amqpgen. Do not edit.\n"));
        assert!(out.contains("// Protocol: AMQP 0-9-1\n"));
        assert!(out.contains("pub trait Method: Sized {"));
        assert!(out.contains("fn decode(method_frame: MethodFrame) -> Option<Self>;"));
        assert!(out.contains("pub struct MethodFrame {"));
        assert!(out.contains("method_name(self.class_id, self.method_id)"));
        assert!(out.contains("pub mod wire {"));
        assert!(out.contains("pub fn pack_bits(bits: &[bool]) -> Vec<u8> {"));
    }

    #[test]
    fn test_contract_without_header() {
        let env = environment().unwrap();
        let config = RustConfig {
            header: false,
            ..RustConfig::default()
        };
        let out = emit_contract(&env, &protocol(IrInfo::default()), &config).unwrap();
        assert!(!out.contains("autogenerated"));
        assert!(out.starts_with("/// A protocol method"));
    }
}
