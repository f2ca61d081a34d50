//! Opcode classification used while scanning method bodies.
//!
//! For each opcode, [`classify`] answers two questions: does the instruction reference
//! further methods (directly, through a class definition or through a literal buffer), and
//! does it disqualify its method from fast calls or typed calls.

use crate::isa::Opcode;

/// How an instruction references other methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InnerReference {
    /// No method reference
    None,
    /// Id 0 is a method defined as a closure
    DefineFunction,
    /// Id 0 is a class constructor and id 1 the literal array of its members
    DefineClass,
    /// Id 0 is a literal array
    LiteralArray,
    /// Immediate 0 indexes the legacy literal-array table
    LegacyLiteralArray,
}

/// What the collector does with one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    /// Method references carried by the instruction
    pub reference: InnerReference,
    /// The instruction prevents fast-call dispatch of its method
    pub defeats_fast_call: bool,
    /// The instruction prevents typed calls of its method
    pub defeats_typed_call: bool,
}

impl Classification {
    const fn new(reference: InnerReference, fast: bool, typed: bool) -> Self {
        Classification {
            reference,
            defeats_fast_call: fast,
            defeats_typed_call: typed,
        }
    }
}

const NEUTRAL: Classification = Classification::new(InnerReference::None, false, false);

/// Classify `opcode`.
#[must_use]
pub const fn classify(opcode: Opcode) -> Classification {
    match opcode {
        Opcode::DefineFuncImm8Id16Imm8
        | Opcode::DefineFuncImm16Id16Imm8
        | Opcode::DefineMethodImm8Id16Imm8
        | Opcode::DefineMethodImm16Id16Imm8 => {
            Classification::new(InnerReference::DefineFunction, false, false)
        }

        Opcode::DefineClassWithBufferImm8Id16Id16Imm16V8
        | Opcode::DefineClassWithBufferImm16Id16Id16Imm16V8
        | Opcode::CallRuntimeDefineSendableClassPrefImm16Id16Id16Imm16V8 => {
            Classification::new(InnerReference::DefineClass, false, false)
        }

        Opcode::CreateArrayWithBufferImm8Id16
        | Opcode::CreateArrayWithBufferImm16Id16
        | Opcode::CreateObjectWithBufferImm8Id16
        | Opcode::CreateObjectWithBufferImm16Id16 => {
            Classification::new(InnerReference::LiteralArray, false, false)
        }

        Opcode::DeprecatedCreateArrayWithBufferPrefImm16
        | Opcode::DeprecatedCreateObjectWithBufferPrefImm16 => {
            Classification::new(InnerReference::LegacyLiteralArray, false, false)
        }

        Opcode::ResumeGenerator
        | Opcode::SuspendGeneratorV8
        | Opcode::SuperCallThisRangeImm8Imm8V8
        | Opcode::WideSuperCallThisRangePrefImm16V8
        | Opcode::SuperCallArrowRangeImm8Imm8V8
        | Opcode::WideSuperCallArrowRangePrefImm16V8 => {
            Classification::new(InnerReference::None, true, false)
        }

        Opcode::CallRuntimeSuperCallForwardAllArgsPrefV8
        | Opcode::SuperCallSpreadImm8V8
        | Opcode::GetUnmappedArgs
        | Opcode::CopyRestArgsImm8
        | Opcode::WideCopyRestArgsPrefImm16 => {
            Classification::new(InnerReference::None, true, true)
        }

        _ => NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{InstructionFlags, OperandClass};
    use strum::IntoEnumIterator;

    #[test]
    fn typed_call_defeaters_also_defeat_fast_call() {
        for opcode in Opcode::iter() {
            let class = classify(opcode);
            if class.defeats_typed_call {
                assert!(class.defeats_fast_call, "{} breaks the subset property", opcode);
            }
        }
    }

    #[test]
    fn defeater_sets() {
        let fast: Vec<Opcode> = Opcode::iter()
            .filter(|op| classify(*op).defeats_fast_call)
            .collect();
        let typed: Vec<Opcode> = Opcode::iter()
            .filter(|op| classify(*op).defeats_typed_call)
            .collect();

        assert_eq!(fast.len(), 11);
        assert_eq!(typed.len(), 5);
        assert!(fast.contains(&Opcode::SuperCallThisRangeImm8Imm8V8));
        assert!(!typed.contains(&Opcode::SuperCallThisRangeImm8Imm8V8));
        assert!(typed.contains(&Opcode::CopyRestArgsImm8));
    }

    #[test]
    fn references_match_operands() {
        for opcode in Opcode::iter() {
            let format = opcode.format();
            match classify(opcode).reference {
                InnerReference::None => {}
                InnerReference::DefineFunction => {
                    assert!(opcode.flags().contains(InstructionFlags::METHOD_ID));
                    assert!(format.has_id(0));
                }
                InnerReference::DefineClass => {
                    assert!(opcode.flags().contains(
                        InstructionFlags::METHOD_ID | InstructionFlags::LITERALARRAY_ID
                    ));
                    assert!(format.has_id(1));
                }
                InnerReference::LiteralArray => {
                    assert!(opcode.flags().contains(InstructionFlags::LITERALARRAY_ID));
                    assert!(format.has_id(0));
                }
                InnerReference::LegacyLiteralArray => {
                    assert_eq!(format.count(OperandClass::Imm), 1);
                }
            }
        }
    }

    #[test]
    fn string_loads_are_neutral() {
        assert_eq!(classify(Opcode::LdaStrId16), NEUTRAL);
        assert_eq!(classify(Opcode::Return), NEUTRAL);
    }
}
