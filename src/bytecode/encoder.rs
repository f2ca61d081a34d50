//! Instruction stream builder.
//!
//! [`BytecodeEncoder`] turns `(Opcode, operands)` pairs into the encoded form the cursor
//! reads, checking every operand against its slot in the opcode's format. Operands are given
//! in encoding order as `i64`; immediates accept both their signed and unsigned range,
//! registers and ids must be unsigned.
//!
//! # Example
//!
//! ```rust
//! use abcscope::bytecode::BytecodeEncoder;
//! use abcscope::isa::Opcode;
//!
//! let mut encoder = BytecodeEncoder::new();
//! encoder
//!     .emit(Opcode::LdaStrId16, &[1])?
//!     .emit(Opcode::Return, &[])?;
//!
//! assert_eq!(encoder.offsets(), &[0, 3]);
//! assert_eq!(encoder.finish(), vec![0x3e, 0x01, 0x00, 0x64]);
//! # Ok::<(), abcscope::Error>(())
//! ```

use crate::{
    file::io::write_le_at,
    isa::{Opcode, OperandKind},
    Result,
};

/// Builds an encoded instruction stream.
#[derive(Debug, Default, Clone)]
pub struct BytecodeEncoder {
    code: Vec<u8>,
    offsets: Vec<usize>,
}

impl BytecodeEncoder {
    /// Create an empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction.
    ///
    /// On error the stream is left unchanged.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the operand count does not match the format of
    /// `opcode`, or an operand does not fit its slot.
    pub fn emit(&mut self, opcode: Opcode, operands: &[i64]) -> Result<&mut Self> {
        let kinds = opcode.format().operands();
        if kinds.len() != operands.len() {
            return Err(malformed_error!(
                "{} takes {} operands, {} given",
                opcode,
                kinds.len(),
                operands.len()
            ));
        }

        let mut bytes = opcode.encoding();
        let mut pending_nibble: Option<u8> = None;

        for (kind, value) in kinds.iter().zip(operands) {
            check_operand(opcode, *kind, *value)?;

            if kind.bits() == 4 {
                let nibble = (*value as u8) & 0x0f;
                match pending_nibble.take() {
                    Some(low) => bytes.push(low | (nibble << 4)),
                    None => pending_nibble = Some(nibble),
                }
                continue;
            }

            match kind.bits() {
                8 => bytes.push(*value as u8),
                16 => write_le_at(&mut bytes, *value as u16),
                32 => write_le_at(&mut bytes, *value as u32),
                _ => write_le_at(&mut bytes, *value as u64),
            }
        }

        if let Some(low) = pending_nibble {
            bytes.push(low);
        }

        self.offsets.push(self.code.len());
        self.code.extend_from_slice(&bytes);
        Ok(self)
    }

    /// Byte offsets of the emitted instructions, in order.
    #[must_use]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Current size of the stream in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Returns `true` if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Consume the encoder and return the stream.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.code
    }
}

fn check_operand(opcode: Opcode, kind: OperandKind, value: i64) -> Result<()> {
    let bits = kind.bits() as u32;
    if bits == 64 {
        return Ok(());
    }

    let unsigned_max = (1_i64 << bits) - 1;
    let signed_min = -(1_i64 << (bits - 1));
    let min = if kind.is_imm() { signed_min } else { 0 };

    if value < min || value > unsigned_max {
        return Err(malformed_error!(
            "Operand {} does not fit {:?} of {}",
            value,
            kind,
            opcode
        ));
    }

    Ok(())
}
