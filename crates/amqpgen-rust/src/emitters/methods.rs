//! Render one method: its struct fields and the statements of its
//! `decode`/`encode` bodies.

use amqpgen_core::config::RustConfig;
use amqpgen_core::ir::{DecodeStep, EncodeStep, IrField, IrMethod, PrimitiveType};
use minijinja::context;

use crate::type_mapper::primitive_to_rust;

/// Local names used by a generated `decode` body, chosen so they cannot
/// shadow an argument of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeLocals {
    pub reader: String,
    pub bits: String,
}

impl DecodeLocals {
    pub fn for_method(method: &IrMethod) -> Self {
        Self {
            reader: fresh_local("reader", &method.fields),
            bits: fresh_local("bits", &method.fields),
        }
    }
}

fn fresh_local(base: &str, fields: &[IrField]) -> String {
    let mut name = base.to_string();
    while fields.iter().any(|f| f.name.snake_case == name) {
        name.push('_');
    }
    name
}

pub fn method_to_ctx(method: &IrMethod, config: &RustConfig) -> minijinja::Value {
    let locals = DecodeLocals::for_method(method);
    let fields: Vec<minijinja::Value> = method
        .fields
        .iter()
        .map(|f| {
            context! {
                name => f.name.snake_case.clone(),
                type => primitive_to_rust(f.field_type, config),
            }
        })
        .collect();

    context! {
        id => method.id,
        type_name => method.name.pascal_case.clone(),
        const_name => method.name.screaming_snake.clone(),
        name_literal => format!("{:?}", method.display_name),
        doc => method_doc(method),
        fields => fields,
        reader => locals.reader.clone(),
        decode => decode_lines(method, &locals),
        encode => encode_lines(method),
    }
}

fn method_doc(method: &IrMethod) -> String {
    let mut doc = format!("Method {}:{}", method.id, method.name.original);
    if method.synchronous {
        doc.push_str(" (synchronous)");
    }
    doc
}

/// Statements reading every argument into a local of the field's name.
pub fn decode_lines(method: &IrMethod, locals: &DecodeLocals) -> Vec<String> {
    let reader = &locals.reader;
    method
        .decode_plan()
        .into_iter()
        .map(|step| match step {
            DecodeStep::Read { field } => {
                let field = &method.fields[field];
                format!(
                    "let {} = {}?;",
                    field.name.snake_case,
                    read_expr(field.field_type, reader)
                )
            }
            DecodeStep::ReadBitByte => format!(
                "let {} = wire::unpack_bits(wire::read_u8(&mut {reader})?);",
                locals.bits
            ),
            DecodeStep::TakeBit { field, bit } => format!(
                "let {} = {}[{bit}];",
                method.fields[field].name.snake_case, locals.bits
            ),
        })
        .collect()
}

/// Statements appending every argument to `buf`.
pub fn encode_lines(method: &IrMethod) -> Vec<String> {
    method
        .encode_plan()
        .into_iter()
        .map(|step| match step {
            EncodeStep::Write { field } => write_stmt(&method.fields[field]),
            EncodeStep::WriteBits { fields } => {
                let flags: Vec<String> = fields
                    .iter()
                    .map(|&i| format!("self.{}", method.fields[i].name.snake_case))
                    .collect();
                format!("buf.extend(wire::pack_bits(&[{}]));", flags.join(", "))
            }
        })
        .collect()
}

/// An `Option`-valued expression reading one non-bit value from `reader`.
fn read_expr(ty: PrimitiveType, reader: &str) -> String {
    match ty {
        PrimitiveType::Octet => format!("wire::read_u8(&mut {reader})"),
        PrimitiveType::Short => format!("wire::read_u16(&mut {reader})"),
        PrimitiveType::Long => format!("wire::read_u32(&mut {reader})"),
        PrimitiveType::LongLong | PrimitiveType::Timestamp => {
            format!("wire::read_u64(&mut {reader})")
        }
        PrimitiveType::ShortString => format!("wire::read_short_str(&mut {reader})"),
        PrimitiveType::LongString => format!("wire::read_long_str(&mut {reader})"),
        PrimitiveType::Table => format!("decode_table(&mut {reader})"),
        PrimitiveType::Bit => unreachable!("bit fields are read through their bit group"),
    }
}

fn write_stmt(field: &IrField) -> String {
    let name = &field.name.snake_case;
    match field.field_type {
        PrimitiveType::Octet => format!("buf.push(self.{name});"),
        PrimitiveType::Short
        | PrimitiveType::Long
        | PrimitiveType::LongLong
        | PrimitiveType::Timestamp => format!("buf.extend_from_slice(&self.{name}.to_be_bytes());"),
        PrimitiveType::ShortString => format!("wire::write_short_str(&mut buf, &self.{name});"),
        PrimitiveType::LongString => format!("wire::write_long_str(&mut buf, &self.{name});"),
        PrimitiveType::Table => format!("encode_table(&mut buf, &self.{name});"),
        PrimitiveType::Bit => unreachable!("bit fields are written through their bit group"),
    }
}
