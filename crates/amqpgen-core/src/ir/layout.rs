//! Wire layout of a method's arguments.
//!
//! A method's fields are partitioned once into [`LayoutNode`]s; the decode and
//! encode plans are both derived from that partition, so the two directions
//! cannot disagree on where a bit group starts or ends.

/// One unit of a method's wire layout. Indices refer to `IrMethod::fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutNode {
    /// A non-bit field, encoded on its own.
    Field(usize),
    /// A maximal run of consecutive bit fields.
    Bits(BitGroup),
}

/// A run of consecutive bit fields packed into whole bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGroup {
    pub fields: Vec<usize>,
}

impl BitGroup {
    /// Bytes occupied on the wire: one per started run of eight flags.
    pub fn byte_len(&self) -> usize {
        self.fields.len().div_ceil(8)
    }
}

/// A statement of a decode routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// Read a non-bit field according to its type.
    Read { field: usize },
    /// Read one byte and unpack it into eight flags.
    ReadBitByte,
    /// Take flag `bit` from the most recently unpacked byte.
    TakeBit { field: usize, bit: u8 },
}

/// A statement of an encode routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeStep {
    /// Write a non-bit field according to its type.
    Write { field: usize },
    /// Pack the given flags into `ceil(n / 8)` bytes and write them.
    WriteBits { fields: Vec<usize> },
}
