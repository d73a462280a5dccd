use amqpgen_core::config::RustConfig;
use amqpgen_core::error::ResolveError;
use amqpgen_core::ir::PrimitiveType;

/// Map a `PrimitiveType` to the Rust type of its struct field.
pub fn primitive_to_rust(ty: PrimitiveType, config: &RustConfig) -> String {
    match ty {
        PrimitiveType::Octet => "u8".to_string(),
        PrimitiveType::Short => "u16".to_string(),
        PrimitiveType::Long => "u32".to_string(),
        PrimitiveType::LongLong => "u64".to_string(),
        PrimitiveType::Bit => "bool".to_string(),
        PrimitiveType::ShortString | PrimitiveType::LongString => "String".to_string(),
        PrimitiveType::Table => config.table_type.clone(),
        PrimitiveType::Timestamp => "u64".to_string(),
    }
}

/// Map a spec type name (`octet`, `shortstr`, ...) to its Rust type.
pub fn map_type(type_name: &str, config: &RustConfig) -> Result<String, ResolveError> {
    let ty: PrimitiveType = type_name.parse()?;
    Ok(primitive_to_rust(ty, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        let config = RustConfig::default();
        assert_eq!(map_type("octet", &config).unwrap(), "u8");
        assert_eq!(map_type("short", &config).unwrap(), "u16");
        assert_eq!(map_type("long", &config).unwrap(), "u32");
        assert_eq!(map_type("longlong", &config).unwrap(), "u64");
        assert_eq!(map_type("bit", &config).unwrap(), "bool");
        assert_eq!(map_type("shortstr", &config).unwrap(), "String");
        assert_eq!(map_type("longstr", &config).unwrap(), "String");
        assert_eq!(map_type("table", &config).unwrap(), "Table");
        assert_eq!(map_type("timestamp", &config).unwrap(), "u64");
    }

    #[test]
    fn test_every_primitive_maps() {
        let config = RustConfig::default();
        for ty in PrimitiveType::ALL {
            assert!(!primitive_to_rust(ty, &config).is_empty());
        }
    }

    #[test]
    fn test_custom_table_type() {
        let config = RustConfig {
            table_type: "FieldTable".to_string(),
            ..RustConfig::default()
        };
        assert_eq!(
            primitive_to_rust(PrimitiveType::Table, &config),
            "FieldTable"
        );
    }

    #[test]
    fn test_unknown_type() {
        let config = RustConfig::default();
        let err = map_type("decimal", &config).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownType(ref t) if t == "decimal"));
    }
}
