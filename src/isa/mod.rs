//! The Ark bytecode instruction set.
//!
//! This module describes every opcode of the dynamic (ECMAScript) Ark instruction set:
//! its numeric encoding, its operand [`Format`] and a small set of static
//! [`InstructionFlags`]. It contains no decoding logic; the cursor in
//! [`crate::bytecode`] uses these tables to walk encoded instruction streams.
//!
//! # Encoding
//!
//! Most instructions start with a single opcode byte. Four bytes are reserved as prefixes,
//! each followed by a sub-opcode byte:
//!
//! | Prefix | Group |
//! |--------|-------|
//! | `0xfb` | call-runtime |
//! | `0xfc` | deprecated |
//! | `0xfd` | wide |
//! | `0xfe` | throw |
//!
//! The numeric value of a prefixed [`Opcode`] is `(sub_opcode << 8) | prefix`, so it can be
//! recovered from the first two bytes of an instruction read as a little-endian `u16`.

mod format;
mod opcodes;

pub use format::{Format, OperandClass, OperandKind, OperandSlot};
pub use opcodes::Opcode;

use bitflags::bitflags;

/// Prefix byte of the call-runtime group
pub const CALLRUNTIME_PREFIX: u8 = 0xfb;
/// Prefix byte of the deprecated group
pub const DEPRECATED_PREFIX: u8 = 0xfc;
/// Prefix byte of the wide group
pub const WIDE_PREFIX: u8 = 0xfd;
/// Prefix byte of the throw group
pub const THROW_PREFIX: u8 = 0xfe;

/// Returns `true` if `byte` starts a prefixed instruction.
#[must_use]
pub const fn is_prefix(byte: u8) -> bool {
    matches!(
        byte,
        CALLRUNTIME_PREFIX | DEPRECATED_PREFIX | WIDE_PREFIX | THROW_PREFIX
    )
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Static properties of an opcode's operands
    pub struct InstructionFlags: u8 {
        /// The first id operand is a string id
        const STRING_ID = 0x01;
        /// The first id operand is a method id
        const METHOD_ID = 0x02;
        /// An id operand references a literal array
        const LITERALARRAY_ID = 0x04;
    }
}
