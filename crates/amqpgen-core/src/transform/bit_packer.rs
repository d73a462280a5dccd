use crate::ir::{BitGroup, DecodeStep, EncodeStep, IrField, LayoutNode};

/// Flags carried by one packed byte.
pub const BITS_PER_BYTE: usize = 8;

/// Partition a method's fields into plain fields and maximal runs of bit fields.
///
/// Any non-bit field closes the current run; the next bit starts a fresh,
/// byte-aligned group.
pub fn partition(fields: &[IrField]) -> Vec<LayoutNode> {
    let mut layout = Vec::new();
    let mut run: Vec<usize> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        if field.field_type.is_bit() {
            run.push(index);
            continue;
        }
        if !run.is_empty() {
            layout.push(LayoutNode::Bits(BitGroup {
                fields: std::mem::take(&mut run),
            }));
        }
        layout.push(LayoutNode::Field(index));
    }

    if !run.is_empty() {
        layout.push(LayoutNode::Bits(BitGroup { fields: run }));
    }

    layout
}

/// Decode statements for a layout.
///
/// Each bit group reads a byte before its first flag and again before every
/// ninth flag, restarting the flag position at zero.
pub fn decode_plan(layout: &[LayoutNode]) -> Vec<DecodeStep> {
    let mut steps = Vec::new();
    for node in layout {
        match node {
            LayoutNode::Field(field) => steps.push(DecodeStep::Read { field: *field }),
            LayoutNode::Bits(group) => {
                for chunk in group.fields.chunks(BITS_PER_BYTE) {
                    steps.push(DecodeStep::ReadBitByte);
                    steps.extend(chunk.iter().zip(0u8..).map(|(&field, bit)| {
                        DecodeStep::TakeBit { field, bit }
                    }));
                }
            }
        }
    }
    steps
}

/// Encode statements for a layout. A bit group is flushed as a single write
/// of `ceil(n / 8)` bytes.
pub fn encode_plan(layout: &[LayoutNode]) -> Vec<EncodeStep> {
    layout
        .iter()
        .map(|node| match node {
            LayoutNode::Field(field) => EncodeStep::Write { field: *field },
            LayoutNode::Bits(group) => EncodeStep::WriteBits {
                fields: group.fields.clone(),
            },
        })
        .collect()
}

/// Pack flags into bytes, least-significant bit first, zero-padding the last byte.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(BITS_PER_BYTE)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &set)| if set { byte | (1 << i) } else { byte })
        })
        .collect()
}

/// Unpack one byte into eight flags, least-significant bit first.
pub fn unpack_bits(byte: u8) -> [bool; BITS_PER_BYTE] {
    std::array::from_fn(|i| byte & (1 << i) != 0)
}
