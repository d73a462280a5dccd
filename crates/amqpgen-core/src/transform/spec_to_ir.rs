use log::{debug, info, warn};

use crate::error::{ResolveError, TransformError};
use crate::ir::*;
use crate::parse::spec::{ClassDef, MethodDef, ProtocolSpec};
use crate::parse::validate_structure;

use super::bit_packer::partition;
use super::domain_resolver::DomainResolver;
use super::identifier_check::check_identifiers;
use super::name_normalizer::normalize_name;

/// Transform a parsed protocol spec into the fully resolved IR.
pub fn transform(spec: &ProtocolSpec) -> Result<IrProtocol, TransformError> {
    // Phase 1: Structural invariants (specs built in code skip `parse::from_*`)
    validate_structure(spec)?;

    // Phase 2: Pre-resolve every domain alias
    let resolver = DomainResolver::new(&spec.domains)?;

    // Phase 3: Resolve classes and methods in declaration order
    let classes = spec
        .classes
        .iter()
        .map(|class| build_class(class, &resolver))
        .collect::<Result<Vec<_>, _>>()?;

    let info = IrInfo {
        name: spec.name.clone(),
        version: spec.version(),
        port: spec.port,
    };

    let ir = IrProtocol {
        info,
        domains: resolver.into_domains(),
        classes,
    };

    // Phase 4: Generated identifiers must not collide
    check_identifiers(&ir)?;

    info!(
        "resolved {} domains, {} classes, {} methods",
        ir.domains.len(),
        ir.classes.len(),
        ir.method_count()
    );

    Ok(ir)
}

fn build_class(class: &ClassDef, resolver: &DomainResolver) -> Result<IrClass, TransformError> {
    debug!("class {} ({})", class.name, class.id);
    if class.methods.is_empty() {
        warn!("class `{}` declares no methods", class.name);
    }

    let methods = class
        .methods
        .iter()
        .map(|method| build_method(class, method, resolver))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IrClass {
        id: class.id,
        name: normalize_name(&class.name),
        methods,
    })
}

fn build_method(
    class: &ClassDef,
    method: &MethodDef,
    resolver: &DomainResolver,
) -> Result<IrMethod, TransformError> {
    let mut fields = Vec::with_capacity(method.arguments.len());

    for arg in &method.arguments {
        let type_ref = arg.type_ref().ok_or_else(|| {
            TransformError::Malformed(format!(
                "argument `{}` of `{}.{}` must have exactly one of `type` or `domain`",
                arg.name, class.name, method.name
            ))
        })?;
        let field_type = resolver.resolve_type(type_ref).map_err(|e| match e {
            ResolveError::UnknownDomain(d) => ResolveError::UnknownDomain(format!(
                "{d} (argument `{}` of `{}.{}`)",
                arg.name, class.name, method.name
            )),
            other => other,
        })?;
        fields.push(IrField {
            name: normalize_name(&arg.name),
            field_type,
            domain: arg.domain.clone(),
        });
    }

    let layout = partition(&fields);
    debug!(
        "method {}.{} ({}): {} fields, {} layout nodes",
        class.name,
        method.name,
        method.id,
        fields.len(),
        layout.len()
    );

    Ok(IrMethod {
        id: method.id,
        class_id: class.id,
        name: normalize_name(&method.name),
        display_name: format!("{}.{}", class.name, method.name),
        synchronous: method.synchronous.unwrap_or(false),
        fields,
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parse;

    const CONNECTION_START: &str = r#"{
        "domains": [],
        "classes": [{"id": 10, "name": "connection", "methods": [
            {"id": 10, "name": "start", "arguments": [
                {"name": "version-major", "type": "octet"},
                {"name": "version-minor", "type": "octet"}
            ]}
        ]}]
    }"#;

    #[test]
    fn test_connection_start() {
        let spec = parse::from_json(CONNECTION_START).unwrap();
        let ir = transform(&spec).unwrap();

        let method = ir.find_method(10, 10).unwrap();
        assert_eq!(method.display_name, "connection.start");
        assert_eq!(method.name.pascal_case, "Start");
        let names: Vec<_> = method.fields.iter().map(|f| f.name.snake_case.as_str()).collect();
        assert_eq!(names, ["version_major", "version_minor"]);
        assert!(
            method
                .fields
                .iter()
                .all(|f| f.field_type == PrimitiveType::Octet)
        );
        assert_eq!(
            method.decode_plan(),
            vec![DecodeStep::Read { field: 0 }, DecodeStep::Read { field: 1 }]
        );
    }

    #[test]
    fn test_unknown_domain_in_argument() {
        let json = r#"{
            "domains": [],
            "classes": [{"id": 60, "name": "basic", "methods": [
                {"id": 20, "name": "consume", "arguments": [
                    {"name": "no-local", "domain": "no-local"}
                ]}
            ]}]
        }"#;
        let spec = parse::from_json(json).unwrap();
        let err = transform(&spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownDomain);
        assert!(err.to_string().contains("basic.consume"));
    }

    #[test]
    fn test_unknown_direct_type() {
        let json = r#"{
            "domains": [],
            "classes": [{"id": 60, "name": "basic", "methods": [
                {"id": 20, "name": "consume", "arguments": [
                    {"name": "priority", "type": "float"}
                ]}
            ]}]
        }"#;
        let spec = parse::from_json(json).unwrap();
        assert_eq!(transform(&spec).unwrap_err().kind(), ErrorKind::UnknownType);
    }

    #[test]
    fn test_version_requires_all_parts() {
        let json = r#"{"major-version": 0, "minor-version": 9, "domains": [], "classes": []}"#;
        let ir = transform(&parse::from_json(json).unwrap()).unwrap();
        assert_eq!(ir.info.version, None);

        let json = r#"{"major-version": 0, "minor-version": 9, "revision": 1, "domains": [], "classes": []}"#;
        let ir = transform(&parse::from_json(json).unwrap()).unwrap();
        assert_eq!(ir.info.version, Some((0, 9, 1)));
    }
}
