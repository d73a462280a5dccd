use amqpgen_core::error::ErrorKind;
use amqpgen_core::ir::{BitGroup, DecodeStep, EncodeStep, LayoutNode, PrimitiveType};
use amqpgen_core::parse;
use amqpgen_core::transform;

const AMQP: &str = include_str!("fixtures/amqp-subset.json");

#[test]
fn transform_amqp_subset() {
    let spec = parse::from_json(AMQP).unwrap();
    let ir = transform::transform(&spec).unwrap();

    assert_eq!(ir.info.name.as_deref(), Some("AMQP"));
    assert_eq!(ir.info.version, Some((0, 9, 1)));
    assert_eq!(ir.info.port, Some(5672));
    assert_eq!(ir.domains.len(), 24);
    assert_eq!(ir.domains["peer-properties"], PrimitiveType::Table);

    let class_names: Vec<_> = ir.classes.iter().map(|c| c.name.original.as_str()).collect();
    assert_eq!(
        class_names,
        ["connection", "channel", "exchange", "queue", "basic", "tx"]
    );
    assert_eq!(ir.method_count(), 20);
}

#[test]
fn methods_keep_declaration_order() {
    let ir = transform::transform(&parse::from_json(AMQP).unwrap()).unwrap();
    let entries: Vec<_> = ir.dispatch_entries().take(4).collect();
    assert_eq!(
        entries,
        [
            (10, 10, "connection.start"),
            (10, 11, "connection.start-ok"),
            (10, 30, "connection.tune"),
            (10, 40, "connection.open"),
        ]
    );
}

#[test]
fn domain_arguments_resolve() {
    let ir = transform::transform(&parse::from_json(AMQP).unwrap()).unwrap();
    let consume = ir.find_method(60, 20).unwrap();

    let types: Vec<_> = consume.fields.iter().map(|f| f.field_type).collect();
    assert_eq!(
        types,
        [
            PrimitiveType::Short,
            PrimitiveType::ShortString,
            PrimitiveType::ShortString,
            PrimitiveType::Bit,
            PrimitiveType::Bit,
            PrimitiveType::Bit,
            PrimitiveType::Bit,
            PrimitiveType::Table,
        ]
    );
    assert_eq!(consume.fields[3].domain.as_deref(), Some("no-local"));
    assert_eq!(consume.fields[5].domain, None);
}

#[test]
fn exchange_declare_layout() {
    let ir = transform::transform(&parse::from_json(AMQP).unwrap()).unwrap();
    let declare = ir.find_method(40, 10).unwrap();

    assert_eq!(declare.fields[2].name.snake_case, "_type");
    assert_eq!(declare.fields[5].name.snake_case, "auto_delete");
    assert_eq!(
        declare.layout,
        vec![
            LayoutNode::Field(0),
            LayoutNode::Field(1),
            LayoutNode::Field(2),
            LayoutNode::Bits(BitGroup {
                fields: vec![3, 4, 5, 6, 7]
            }),
            LayoutNode::Field(8),
        ]
    );
    assert_eq!(
        declare.encode_plan()[3],
        EncodeStep::WriteBits {
            fields: vec![3, 4, 5, 6, 7]
        }
    );

    let decode = declare.decode_plan();
    let byte_reads = decode
        .iter()
        .filter(|s| **s == DecodeStep::ReadBitByte)
        .count();
    assert_eq!(byte_reads, 1);
}

#[test]
fn class_import_needs() {
    let ir = transform::transform(&parse::from_json(AMQP).unwrap()).unwrap();
    let by_name = |name: &str| ir.classes.iter().find(|c| c.name.original == name).unwrap();

    assert!(by_name("connection").uses_type(PrimitiveType::Table));
    assert!(!by_name("channel").uses_type(PrimitiveType::Table));
}

#[test]
fn unsupported_domain_type_aborts() {
    let json = r#"{"domains": [["ratio", "double"]], "classes": []}"#;
    let err = transform::transform(&parse::from_json(json).unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownType);
    assert_eq!(err.to_string(), "resolve error: unknown type: double");
}

#[test]
fn synchronous_flag_defaults_to_false() {
    let ir = transform::transform(&parse::from_json(AMQP).unwrap()).unwrap();
    assert!(ir.find_method(10, 10).unwrap().synchronous);
    assert!(!ir.find_method(10, 11).unwrap().synchronous);
}
