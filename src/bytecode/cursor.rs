//! Read-only cursor over an encoded instruction stream.
//!
//! A [`BytecodeInstruction`] is a position inside a method's code block. It never owns or
//! mutates the buffer; [`BytecodeInstruction::next`] returns a new cursor positioned at the
//! following instruction, so cursors are cheap to copy and can be kept as end markers.
//!
//! # Example
//!
//! ```rust
//! use abcscope::bytecode::BytecodeInstruction;
//! use abcscope::isa::Opcode;
//!
//! // lda.str 0x1; return
//! let code = [0x3e, 0x01, 0x00, 0x64];
//! let first = BytecodeInstruction::begin(&code);
//! let end = first.jump_to(code.len());
//!
//! assert_eq!(first.opcode()?, Opcode::LdaStrId16);
//! assert_eq!(first.id(0)?, 1);
//!
//! let second = first.next()?;
//! assert_eq!(second.address(), 3);
//! assert_eq!(second.opcode()?, Opcode::Return);
//! assert_eq!(second.next()?.address(), end.address());
//! # Ok::<(), abcscope::Error>(())
//! ```

use crate::{
    bytecode::metadata::{BytecodeMetaData, Bytecodes},
    file::parser::Parser,
    isa::{is_prefix, Format, InstructionFlags, Opcode, OperandClass, OperandKind, OperandSlot},
    Error, Result,
};

/// A cursor positioned at one instruction of a code block.
///
/// The opcode is decoded once, when the cursor is positioned, and every accessor reads the
/// cached metadata entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytecodeInstruction<'a> {
    code: &'a [u8],
    offset: usize,
    meta: Option<&'static BytecodeMetaData>,
}

impl<'a> BytecodeInstruction<'a> {
    /// Position a cursor at the first instruction of `code`.
    #[must_use]
    pub fn begin(code: &'a [u8]) -> Self {
        Self::at(code, 0)
    }

    /// A cursor over the same code block positioned at `offset`.
    ///
    /// The position is not validated; a cursor at `code.len()` is the end marker of a
    /// method and must not be decoded.
    #[must_use]
    pub fn jump_to(&self, offset: usize) -> Self {
        Self::at(self.code, offset)
    }

    fn at(code: &'a [u8], offset: usize) -> Self {
        let meta = decode(code, offset)
            .ok()
            .and_then(|opcode| Bytecodes::global().get(opcode).ok());

        BytecodeInstruction { code, offset, meta }
    }

    /// Byte offset of the instruction inside its code block.
    #[must_use]
    pub fn address(&self) -> usize {
        self.offset
    }

    /// The whole code block this cursor walks.
    #[must_use]
    pub fn code(&self) -> &'a [u8] {
        self.code
    }

    /// Decode the opcode of the current instruction.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if the cursor is past the code block, and
    /// [`Error::UnknownOpcode`] if the byte (or prefix/sub-opcode pair) is not an instruction.
    pub fn opcode(&self) -> Result<Opcode> {
        match self.meta {
            Some(meta) => Ok(meta.opcode()),
            None => decode(self.code, self.offset),
        }
    }

    /// Operand layout of the current instruction.
    ///
    /// # Errors
    /// Fails like [`BytecodeInstruction::opcode`].
    pub fn format(&self) -> Result<Format> {
        Ok(self.opcode()?.format())
    }

    /// Encoded size of the current instruction in bytes.
    ///
    /// # Errors
    /// Fails like [`BytecodeInstruction::opcode`].
    pub fn size(&self) -> Result<usize> {
        Ok(self.metadata()?.size())
    }

    /// Static operand flags of the current instruction.
    ///
    /// # Errors
    /// Fails like [`BytecodeInstruction::opcode`].
    pub fn flags(&self) -> Result<InstructionFlags> {
        Ok(self.opcode()?.flags())
    }

    /// Returns `true` if the current instruction has `flag`.
    ///
    /// # Errors
    /// Fails like [`BytecodeInstruction::opcode`].
    pub fn has_flag(&self, flag: InstructionFlags) -> Result<bool> {
        Ok(self.flags()?.contains(flag))
    }

    /// Static metadata of the current opcode.
    ///
    /// # Errors
    /// Fails like [`BytecodeInstruction::opcode`], or with [`Error::Malformed`] if the
    /// metadata table has no entry for the opcode.
    pub fn metadata(&self) -> Result<&'static BytecodeMetaData> {
        match self.meta {
            Some(meta) => Ok(meta),
            None => Bytecodes::global().get(self.opcode()?),
        }
    }

    /// A cursor positioned at the instruction following this one.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if the current instruction is truncated by the end of
    /// the code block, or fails like [`BytecodeInstruction::opcode`].
    pub fn next(&self) -> Result<Self> {
        let Some(end) = self.offset.checked_add(self.size()?) else {
            return Err(Error::OutOfBounds);
        };

        if end > self.code.len() {
            return Err(Error::OutOfBounds);
        }

        Ok(self.jump_to(end))
    }

    /// Returns `true` if the format has an id operand at `index`.
    ///
    /// # Errors
    /// Fails like [`BytecodeInstruction::opcode`].
    pub fn has_id(&self, index: usize) -> Result<bool> {
        Ok(self.format()?.has_id(index))
    }

    /// The `index`-th entity id operand.
    ///
    /// 16-bit ids are method-relative indices that still need to be resolved through the
    /// file; 32-bit ids are entity offsets.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the instruction has no such operand.
    pub fn id(&self, index: usize) -> Result<u32> {
        let slot = self.slot(OperandClass::Id, index)?;
        Ok(self.read_operand(slot)? as u32)
    }

    /// The `index`-th immediate operand, sign-extended from its encoded width.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the instruction has no such operand.
    pub fn imm(&self, index: usize) -> Result<i64> {
        let slot = self.slot(OperandClass::Imm, index)?;
        let raw = self.read_operand(slot)?;

        Ok(match slot.kind {
            OperandKind::Imm4 => (((raw as u8) << 4) as i8 >> 4) as i64,
            OperandKind::Imm8 => raw as u8 as i8 as i64,
            OperandKind::Imm16 => raw as u16 as i16 as i64,
            OperandKind::Imm32 => raw as u32 as i32 as i64,
            _ => raw as i64,
        })
    }

    /// The `index`-th immediate operand as its raw unsigned value.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the instruction has no such operand.
    pub fn imm_data(&self, index: usize) -> Result<u64> {
        let slot = self.slot(OperandClass::Imm, index)?;
        self.read_operand(slot)
    }

    /// The `index`-th virtual register operand.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the instruction has no such operand.
    pub fn vreg(&self, index: usize) -> Result<u16> {
        let slot = self.slot(OperandClass::VReg, index)?;
        Ok(self.read_operand(slot)? as u16)
    }

    /// Number of virtual register operands of the current instruction.
    ///
    /// # Errors
    /// Fails like [`BytecodeInstruction::opcode`].
    pub fn vreg_count(&self) -> Result<usize> {
        Ok(self.metadata()?.vreg_count())
    }

    fn slot(&self, class: OperandClass, index: usize) -> Result<OperandSlot> {
        let opcode = self.opcode()?;
        opcode.format().slot(class, index).ok_or_else(|| {
            malformed_error!(
                "{} at offset {} has no {:?} operand {}",
                opcode,
                self.offset,
                class,
                index
            )
        })
    }

    fn read_operand(&self, slot: OperandSlot) -> Result<u64> {
        let Some(start) = self.offset.checked_add(slot.bit_offset / 8) else {
            return Err(Error::OutOfBounds);
        };

        let mut parser = Parser::new(self.code);
        parser.seek(start)?;

        Ok(match slot.kind.bits() {
            4 => {
                let byte = parser.read_le::<u8>()?;
                if slot.bit_offset % 8 == 0 {
                    u64::from(byte & 0x0f)
                } else {
                    u64::from(byte >> 4)
                }
            }
            8 => u64::from(parser.read_le::<u8>()?),
            16 => u64::from(parser.read_le::<u16>()?),
            32 => u64::from(parser.read_le::<u32>()?),
            _ => parser.read_le::<u64>()?,
        })
    }
}

fn decode(code: &[u8], offset: usize) -> Result<Opcode> {
    let mut parser = Parser::new(code);
    parser.seek(offset)?;

    let first = parser.read_le::<u8>()?;
    if is_prefix(first) {
        let sub = parser.read_le::<u8>()?;
        return Opcode::decode(first, Some(sub)).ok_or(Error::UnknownOpcode {
            prefix: Some(first),
            opcode: sub,
            offset,
        });
    }

    Opcode::decode(first, None).ok_or(Error::UnknownOpcode {
        prefix: None,
        opcode: first,
        offset,
    })
}

/// Iterator over the instructions of a code block, in program order.
///
/// Stops after the first decoding error, which it yields.
pub struct Instructions<'a> {
    current: Option<BytecodeInstruction<'a>>,
}

impl<'a> Instructions<'a> {
    /// Iterate over every instruction of `code`.
    #[must_use]
    pub fn new(code: &'a [u8]) -> Self {
        Instructions {
            current: Some(BytecodeInstruction::begin(code)),
        }
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<BytecodeInstruction<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let inst = self.current.take()?;
        if inst.address() >= inst.code().len() {
            return None;
        }

        match inst.next() {
            Ok(next) => {
                self.current = Some(next);
                Some(Ok(inst))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
