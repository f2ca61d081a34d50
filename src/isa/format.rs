//! Operand layouts of Ark instructions.
//!
//! Every opcode is bound to exactly one [`Format`], which lists its operands in encoding
//! order. Operands are packed directly after the opcode byte(s): 4-bit operands share a byte
//! (first operand in the low nibble), wider operands are little-endian.

use strum::EnumIter;

/// A single operand slot of an instruction format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum OperandKind {
    /// 4-bit virtual register
    V4,
    /// 8-bit virtual register
    V8,
    /// 16-bit virtual register
    V16,
    /// 4-bit immediate
    Imm4,
    /// 8-bit immediate
    Imm8,
    /// 16-bit immediate
    Imm16,
    /// 32-bit immediate
    Imm32,
    /// 64-bit immediate
    Imm64,
    /// 16-bit entity index, resolved relative to the containing method
    Id16,
    /// 32-bit entity id
    Id32,
}

impl OperandKind {
    /// Width of the operand in bits.
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            OperandKind::V4 | OperandKind::Imm4 => 4,
            OperandKind::V8 | OperandKind::Imm8 => 8,
            OperandKind::V16 | OperandKind::Imm16 | OperandKind::Id16 => 16,
            OperandKind::Imm32 | OperandKind::Id32 => 32,
            OperandKind::Imm64 => 64,
        }
    }

    /// `true` for virtual register operands
    #[must_use]
    pub const fn is_vreg(self) -> bool {
        matches!(self, OperandKind::V4 | OperandKind::V8 | OperandKind::V16)
    }

    /// `true` for immediate operands
    #[must_use]
    pub const fn is_imm(self) -> bool {
        matches!(
            self,
            OperandKind::Imm4
                | OperandKind::Imm8
                | OperandKind::Imm16
                | OperandKind::Imm32
                | OperandKind::Imm64
        )
    }

    /// `true` for entity id operands
    #[must_use]
    pub const fn is_id(self) -> bool {
        matches!(self, OperandKind::Id16 | OperandKind::Id32)
    }
}

/// Operand class used to address the n-th register, immediate or id of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandClass {
    /// Virtual registers
    VReg,
    /// Immediates
    Imm,
    /// Entity ids
    Id,
}

impl OperandClass {
    const fn contains(self, kind: OperandKind) -> bool {
        match self {
            OperandClass::VReg => kind.is_vreg(),
            OperandClass::Imm => kind.is_imm(),
            OperandClass::Id => kind.is_id(),
        }
    }
}

/// Location of one operand inside an encoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandSlot {
    /// The operand type
    pub kind: OperandKind,
    /// Bit offset from the start of the instruction (opcode bytes included)
    pub bit_offset: usize,
}

macro_rules! formats {
    ($($(#[$doc:meta])* $name:ident => $prefixed:expr, [$($op:ident),*];)*) => {
        /// Operand layout of an instruction.
        ///
        /// `Pref*` formats belong to prefixed opcodes, whose operands start after the
        /// two-byte prefix/sub-opcode pair.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
        pub enum Format {
            $($(#[$doc])* $name,)*
        }

        impl Format {
            /// The operands of this format, in encoding order.
            #[must_use]
            pub const fn operands(self) -> &'static [OperandKind] {
                match self {
                    $(Format::$name => &[$(OperandKind::$op),*],)*
                }
            }

            /// `true` if the opcode is a prefix byte followed by a sub-opcode byte.
            #[must_use]
            pub const fn is_prefixed(self) -> bool {
                match self {
                    $(Format::$name => $prefixed,)*
                }
            }
        }
    };
}

formats! {
    /// No operands
    None => false, [];
    /// `imm8`
    Imm8 => false, [Imm8];
    /// `imm16`
    Imm16 => false, [Imm16];
    /// `imm32`
    Imm32 => false, [Imm32];
    /// `imm64`
    Imm64 => false, [Imm64];
    /// `id16`
    Id16 => false, [Id16];
    /// `v8`
    V8 => false, [V8];
    /// `v4, v4`
    V4V4 => false, [V4, V4];
    /// `v8, v8`
    V8V8 => false, [V8, V8];
    /// `v16, v16`
    V16V16 => false, [V16, V16];
    /// `v8, v8, v8`
    V8V8V8 => false, [V8, V8, V8];
    /// `v8, v8, v8, v8`
    V8V8V8V8 => false, [V8, V8, V8, V8];
    /// `imm4, imm4`
    Imm4Imm4 => false, [Imm4, Imm4];
    /// `imm8, imm8`
    Imm8Imm8 => false, [Imm8, Imm8];
    /// `imm8, v8`
    Imm8V8 => false, [Imm8, V8];
    /// `imm16, v8`
    Imm16V8 => false, [Imm16, V8];
    /// `imm8, v8, v8`
    Imm8V8V8 => false, [Imm8, V8, V8];
    /// `imm16, v8, v8`
    Imm16V8V8 => false, [Imm16, V8, V8];
    /// `imm8, v8, v8, v8`
    Imm8V8V8V8 => false, [Imm8, V8, V8, V8];
    /// `imm8, v8, v8, v8, v8`
    Imm8V8V8V8V8 => false, [Imm8, V8, V8, V8, V8];
    /// `imm8, imm8, v8`
    Imm8Imm8V8 => false, [Imm8, Imm8, V8];
    /// `imm16, imm8, v8`
    Imm16Imm8V8 => false, [Imm16, Imm8, V8];
    /// `imm8, id16`
    Imm8Id16 => false, [Imm8, Id16];
    /// `imm16, id16`
    Imm16Id16 => false, [Imm16, Id16];
    /// `imm8, id16, v8`
    Imm8Id16V8 => false, [Imm8, Id16, V8];
    /// `imm16, id16, v8`
    Imm16Id16V8 => false, [Imm16, Id16, V8];
    /// `imm8, id16, imm8`
    Imm8Id16Imm8 => false, [Imm8, Id16, Imm8];
    /// `imm16, id16, imm8`
    Imm16Id16Imm8 => false, [Imm16, Id16, Imm8];
    /// `imm8, id16, id16, imm16, v8`
    Imm8Id16Id16Imm16V8 => false, [Imm8, Id16, Id16, Imm16, V8];
    /// `imm16, id16, id16, imm16, v8`
    Imm16Id16Id16Imm16V8 => false, [Imm16, Id16, Id16, Imm16, V8];
    /// `imm8, imm16`
    Imm8Imm16 => false, [Imm8, Imm16];
    /// `imm16, imm16`
    Imm16Imm16 => false, [Imm16, Imm16];
    /// `imm8, v8, imm16`
    Imm8V8Imm16 => false, [Imm8, V8, Imm16];
    /// `imm16, v8, imm16`
    Imm16V8Imm16 => false, [Imm16, V8, Imm16];
    /// `v8, imm8`
    V8Imm8 => false, [V8, Imm8];
    /// `v8, imm16`
    V8Imm16 => false, [V8, Imm16];
    /// `imm8, imm16, imm16`
    Imm8Imm16Imm16 => false, [Imm8, Imm16, Imm16];
    /// `imm8, imm16, imm16, v8`
    Imm8Imm16Imm16V8 => false, [Imm8, Imm16, Imm16, V8];
    /// prefix, no operands
    PrefNone => true, [];
    /// prefix, `v8`
    PrefV8 => true, [V8];
    /// prefix, `v8, v8`
    PrefV8V8 => true, [V8, V8];
    /// prefix, `v8, v8, v8`
    PrefV8V8V8 => true, [V8, V8, V8];
    /// prefix, `v8, v8, v8, v8`
    PrefV8V8V8V8 => true, [V8, V8, V8, V8];
    /// prefix, `imm8`
    PrefImm8 => true, [Imm8];
    /// prefix, `imm16`
    PrefImm16 => true, [Imm16];
    /// prefix, `imm32`
    PrefImm32 => true, [Imm32];
    /// prefix, `id16`
    PrefId16 => true, [Id16];
    /// prefix, `id32`
    PrefId32 => true, [Id32];
    /// prefix, `id32, v8`
    PrefId32V8 => true, [Id32, V8];
    /// prefix, `id32, imm8`
    PrefId32Imm8 => true, [Id32, Imm8];
    /// prefix, `imm16, v8`
    PrefImm16V8 => true, [Imm16, V8];
    /// prefix, `imm16, v8, v8`
    PrefImm16V8V8 => true, [Imm16, V8, V8];
    /// prefix, `imm16, id16`
    PrefImm16Id16 => true, [Imm16, Id16];
    /// prefix, `v8, imm32`
    PrefV8Imm32 => true, [V8, Imm32];
    /// prefix, `imm4, imm4`
    PrefImm4Imm4 => true, [Imm4, Imm4];
    /// prefix, `imm8, imm8`
    PrefImm8Imm8 => true, [Imm8, Imm8];
    /// prefix, `imm16, imm16`
    PrefImm16Imm16 => true, [Imm16, Imm16];
    /// prefix, `imm4, imm4, v8`
    PrefImm4Imm4V8 => true, [Imm4, Imm4, V8];
    /// prefix, `imm8, imm8, v8`
    PrefImm8Imm8V8 => true, [Imm8, Imm8, V8];
    /// prefix, `imm16, imm16, v8`
    PrefImm16Imm16V8 => true, [Imm16, Imm16, V8];
    /// prefix, `imm8, v8`
    PrefImm8V8 => true, [Imm8, V8];
    /// prefix, `imm8, v8, v8`
    PrefImm8V8V8 => true, [Imm8, V8, V8];
    /// prefix, `imm8, imm32, v8`
    PrefImm8Imm32V8 => true, [Imm8, Imm32, V8];
    /// prefix, `imm8, imm16, imm16, v8`
    PrefImm8Imm16Imm16V8 => true, [Imm8, Imm16, Imm16, V8];
    /// prefix, `imm16, id16, id16, imm16, v8`
    PrefImm16Id16Id16Imm16V8 => true, [Imm16, Id16, Id16, Imm16, V8];
    /// prefix, `id16, imm16, imm16, v8, v8`
    PrefId16Imm16Imm16V8V8 => true, [Id16, Imm16, Imm16, V8, V8];
}

impl Format {
    /// Width of the opcode part (one byte, or prefix + sub-opcode).
    #[must_use]
    pub const fn opcode_size(self) -> usize {
        if self.is_prefixed() {
            2
        } else {
            1
        }
    }

    /// Total encoded size of an instruction with this format, in bytes.
    #[must_use]
    pub fn size(self) -> usize {
        let bits: usize = self.operands().iter().map(|op| op.bits()).sum();
        self.opcode_size() + bits.div_ceil(8)
    }

    /// Number of operands of the given class.
    #[must_use]
    pub fn count(self, class: OperandClass) -> usize {
        self.operands()
            .iter()
            .filter(|op| class.contains(**op))
            .count()
    }

    /// Number of virtual register operands.
    #[must_use]
    pub fn vreg_count(self) -> usize {
        self.count(OperandClass::VReg)
    }

    /// `true` if the format has an id operand at `index`.
    #[must_use]
    pub fn has_id(self, index: usize) -> bool {
        self.slot(OperandClass::Id, index).is_some()
    }

    /// `true` if the format has a register operand at `index`.
    #[must_use]
    pub fn has_vreg(self, index: usize) -> bool {
        self.slot(OperandClass::VReg, index).is_some()
    }

    /// Locate the `index`-th operand of `class`.
    #[must_use]
    pub fn slot(self, class: OperandClass, index: usize) -> Option<OperandSlot> {
        let mut bit_offset = self.opcode_size() * 8;
        let mut seen = 0;

        for kind in self.operands() {
            if class.contains(*kind) {
                if seen == index {
                    return Some(OperandSlot {
                        kind: *kind,
                        bit_offset,
                    });
                }
                seen += 1;
            }
            bit_offset += kind.bits();
        }

        None
    }

    /// Locate the operand at `position` regardless of its class.
    #[must_use]
    pub fn slot_at(self, position: usize) -> Option<OperandSlot> {
        let operands = self.operands();
        let kind = *operands.get(position)?;
        let bit_offset = self.opcode_size() * 8
            + operands[..position]
                .iter()
                .map(|op| op.bits())
                .sum::<usize>();

        Some(OperandSlot { kind, bit_offset })
    }
}
