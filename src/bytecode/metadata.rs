//! Static per-opcode metadata.
//!
//! The compiler backends ask the same questions about every instruction they see: can it
//! trigger a garbage collection, can it throw, does it read the closure environment, is it a
//! call. The answers depend only on the opcode, so they are computed once into the
//! process-wide [`Bytecodes`] table and shared read-only between threads.

use std::sync::OnceLock;

use bitflags::bitflags;
use strum::IntoEnumIterator;

use crate::{isa::Opcode, Result};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Static properties of an opcode, as seen by the compiler
    pub struct BytecodeFlags: u32 {
        /// Has no observable side effect
        const NO_SIDE_EFFECTS = 1 << 0;
        /// Never allocates or otherwise triggers a garbage collection
        const NO_GC = 1 << 1;
        /// Never throws
        const NO_THROW = 1 << 2;
        /// Reads the `this` object
        const READ_THIS_OBJECT = 1 << 3;
        /// Supports deoptimization
        const SUPPORT_DEOPT = 1 << 4;
        /// The `debugger` statement
        const DEBUGGER_STMT = 1 << 5;
        /// Reads the current function object
        const READ_FUNC = 1 << 6;
        /// Writes the lexical environment
        const WRITE_ENV = 1 << 7;
        /// Reads the lexical environment
        const READ_ENV = 1 << 8;
        /// Reads `new.target`
        const READ_NEWTARGET = 1 << 9;
        /// Reads the actual argument count
        const READ_ARGC = 1 << 10;
        /// Lowered through the general bytecode path
        const GENERAL_BC = 1 << 11;
    }
}

/// Coarse classification of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BytecodeKind {
    /// Anything without a dedicated kind
    General,
    /// Register/accumulator moves
    Mov,
    /// Loads of a constant into the accumulator
    SetConstant,
    /// Calls and constructor invocations
    CallBc,
    /// Returns
    ReturnBc,
    /// Generator suspension
    Suspend,
    /// Generator resumption
    Resume,
    /// No-ops the compiler drops
    Discarded,
    /// Explicit throws
    ThrowBc,
    /// Conditional branches on the accumulator
    ConditionalJump,
    /// Unconditional branches
    JumpImm,
    /// Async generator resolution
    GeneratorResolve,
    /// Named property accessors
    AccessorBc,
}

impl BytecodeKind {
    fn of(opcode: Opcode) -> Self {
        use Opcode::*;

        match opcode {
            MovV4V4 | MovV8V8 | MovV16V16 | StaV8 | LdaV8 => BytecodeKind::Mov,
            LdNan | LdInfinity | LdUndefined | LdNull | LdTrue | LdFalse | LdHole | LdaiImm32
            | FldaiImm64 | LdFunction => BytecodeKind::SetConstant,
            CallThis1Imm8V8V8
            | CallArg0Imm8
            | CallArg1Imm8V8
            | CallArgs2Imm8V8V8
            | CallArgs3Imm8V8V8V8
            | CallRangeImm8Imm8V8
            | CallThis0Imm8V8
            | CallThis2Imm8V8V8V8
            | CallThis3Imm8V8V8V8V8
            | CallThisRangeImm8Imm8V8
            | CallRuntimeCallInitPrefImm8V8
            | NewObjRangeImm8Imm8V8
            | NewObjRangeImm16Imm8V8
            | WideNewObjRangePrefImm16V8
            | SuperCallThisRangeImm8Imm8V8
            | WideSuperCallThisRangePrefImm16V8 => BytecodeKind::CallBc,
            Return | ReturnUndefined => BytecodeKind::ReturnBc,
            SuspendGeneratorV8 | DeprecatedSuspendGeneratorPrefV8V8 => BytecodeKind::Suspend,
            ResumeGenerator => BytecodeKind::Resume,
            Nop => BytecodeKind::Discarded,
            ThrowPrefNone
            | ThrowNotExistsPrefNone
            | ThrowPatternNonCoerciblePrefNone
            | ThrowDeleteSuperPropertyPrefNone
            | ThrowConstAssignmentPrefV8 => BytecodeKind::ThrowBc,
            JeqzImm8 | JeqzImm16 | JeqzImm32 | JnezImm8 | JnezImm16 | JnezImm32 => {
                BytecodeKind::ConditionalJump
            }
            JmpImm8 | JmpImm16 | JmpImm32 => BytecodeKind::JumpImm,
            AsyncGeneratorResolveV8V8V8 => BytecodeKind::GeneratorResolve,
            LdObjByNameImm8Id16
            | LdObjByNameImm16Id16
            | LdThisByNameImm8Id16
            | LdThisByNameImm16Id16
            | StObjByNameImm8Id16V8
            | StObjByNameImm16Id16V8
            | StThisByNameImm8Id16
            | StThisByNameImm16Id16
            | DefineFieldByNameImm8Id16V8
            | DefinePropertyByNameImm8Id16V8 => BytecodeKind::AccessorBc,
            _ => BytecodeKind::General,
        }
    }

    /// Kinds lowered through the general bytecode path.
    #[must_use]
    pub fn is_general(self) -> bool {
        matches!(
            self,
            BytecodeKind::General
                | BytecodeKind::ThrowBc
                | BytecodeKind::Resume
                | BytecodeKind::Suspend
                | BytecodeKind::GeneratorResolve
                | BytecodeKind::CallBc
                | BytecodeKind::AccessorBc
        )
    }
}

fn is_no_gc(opcode: Opcode) -> bool {
    use Opcode::*;

    matches!(
        opcode,
        MovV4V4
            | MovV8V8
            | MovV16V16
            | StaV8
            | LdaV8
            | LdHole
            | LdaiImm32
            | FldaiImm64
            | LdFunction
            | TypeOfImm8
            | TypeOfImm16
            | LdNan
            | LdInfinity
            | LdUndefined
            | LdNull
            | LdTrue
            | LdFalse
            | LdSymbol
            | LdGlobal
            | LdBigIntId16
            | LdLexVarImm4Imm4
            | LdLexVarImm8Imm8
            | WideLdLexVarPrefImm16Imm16
            | CallRuntimeLdSendableVarPrefImm4Imm4
            | CallRuntimeLdSendableVarPrefImm8Imm8
            | CallRuntimeWideLdSendableVarPrefImm16Imm16
            | WideLdPatchVarPrefImm16
            | LdaStrId16
            | CallRuntimeLdSendableClassPrefImm16
            | Return
            | ReturnUndefined
    )
}

fn is_no_side_effects(opcode: Opcode) -> bool {
    use Opcode::*;

    matches!(
        opcode,
        GetPropIterator
            | TypeOfImm8
            | TypeOfImm16
            | LdSymbol
            | LdGlobal
            | LdBigIntId16
            | LdExternalModuleVarImm8
            | WideLdExternalModuleVarPrefImm16
            | GetModuleNamespaceImm8
            | WideGetModuleNamespacePrefImm16
            | IsTrue
            | IsFalse
            | CallRuntimeIsTruePrefImm8
            | CallRuntimeIsFalsePrefImm8
            | LdGlobalVarImm16Id16
            | LdObjByIndexImm8Imm16
            | LdObjByIndexImm16Imm16
            | WideLdObjByIndexPrefImm32
            | LdLexVarImm4Imm4
            | LdLexVarImm8Imm8
            | WideLdLexVarPrefImm16Imm16
            | CallRuntimeLdSendableVarPrefImm4Imm4
            | CallRuntimeLdSendableVarPrefImm8Imm8
            | CallRuntimeWideLdSendableVarPrefImm16Imm16
            | WideLdPatchVarPrefImm16
            | LdLocalModuleVarImm8
            | WideLdLocalModuleVarPrefImm16
            | LdaStrId16
            | CallRuntimeLdSendableClassPrefImm16
            | MovV4V4
            | MovV8V8
            | MovV16V16
            | StaV8
            | LdaV8
            | LdNan
            | LdInfinity
            | LdUndefined
            | LdNull
            | LdTrue
            | LdFalse
            | LdHole
            | LdaiImm32
            | FldaiImm64
            | LdFunction
            | Return
            | ReturnUndefined
            | Nop
            | JeqzImm8
            | JeqzImm16
            | JeqzImm32
            | JnezImm8
            | JnezImm16
            | JnezImm32
            | JmpImm8
            | JmpImm16
            | JmpImm32
    )
}

fn is_no_throw(opcode: Opcode) -> bool {
    use Opcode::*;

    matches!(
        opcode,
        MovV4V4
            | MovV8V8
            | MovV16V16
            | StaV8
            | LdaV8
            | LdNan
            | LdInfinity
            | LdUndefined
            | LdNull
            | LdTrue
            | LdFalse
            | LdHole
            | LdaiImm32
            | FldaiImm64
            | LdFunction
            | LdaStrId16
            | TypeOfImm8
            | TypeOfImm16
            | IsTrue
            | IsFalse
            | CallRuntimeIsTruePrefImm8
            | CallRuntimeIsFalsePrefImm8
            | JeqzImm8
            | JeqzImm16
            | JeqzImm32
            | JnezImm8
            | JnezImm16
            | JnezImm32
            | JmpImm8
            | JmpImm16
            | JmpImm32
            | StModuleVarImm8
            | WideStModuleVarPrefImm16
            | LdExternalModuleVarImm8
            | WideLdExternalModuleVarPrefImm16
            | NewLexEnvImm8
            | WideNewLexEnvPrefImm16
            | CallRuntimeNewSendableEnvPrefImm8
            | CallRuntimeWideNewSendableEnvPrefImm16
            | PopLexEnv
            | NewLexEnvWithNameImm8Id16
            | WideNewLexEnvWithNamePrefImm16Id16
            | AsyncFunctionEnter
            | SetGeneratorStateImm8
            | GetResumeMode
            | ResumeGenerator
            | Return
            | ReturnUndefined
            | LdLexVarImm4Imm4
            | LdLexVarImm8Imm8
            | WideLdLexVarPrefImm16Imm16
            | CallRuntimeLdSendableVarPrefImm4Imm4
            | CallRuntimeLdSendableVarPrefImm8Imm8
            | CallRuntimeWideLdSendableVarPrefImm16Imm16
            | StLexVarImm4Imm4
            | StLexVarImm8Imm8
            | WideStLexVarPrefImm16Imm16
            | CallRuntimeStSendableVarPrefImm4Imm4
            | CallRuntimeStSendableVarPrefImm8Imm8
            | CallRuntimeWideStSendableVarPrefImm16Imm16
            | StrictNotEqImm8V8
            | StrictEqImm8V8
            | CreateEmptyArrayImm8
            | CreateEmptyArrayImm16
            | CreateEmptyObject
            | CreateArrayWithBufferImm8Id16
            | CreateArrayWithBufferImm16Id16
            | CreateIterResultObjV8V8
            | DefineFuncImm8Id16Imm8
            | DefineFuncImm16Id16Imm8
            | DefineMethodImm8Id16Imm8
            | DefineMethodImm16Id16Imm8
            | CallRuntimeLdSendableClassPrefImm16
            | Debugger
            | Nop
    )
}

fn reads_this_object(opcode: Opcode) -> bool {
    use Opcode::*;

    matches!(
        opcode,
        LdThisByValueImm8
            | LdThisByValueImm16
            | StThisByValueImm8V8
            | StThisByValueImm16V8
            | LdThisByNameImm8Id16
            | LdThisByNameImm16Id16
            | StThisByNameImm8Id16
            | StThisByNameImm16Id16
            | SuspendGeneratorV8
            | DeprecatedSuspendGeneratorPrefV8V8
            | AsyncGeneratorResolveV8V8V8
    )
}

fn supports_deopt(opcode: Opcode) -> bool {
    use Opcode::*;

    matches!(
        opcode,
        LdThisByNameImm8Id16
            | LdThisByNameImm16Id16
            | StThisByNameImm8Id16
            | StThisByNameImm16Id16
            | Add2Imm8V8
            | Sub2Imm8V8
            | Mul2Imm8V8
            | Div2Imm8V8
            | EqImm8V8
            | NotEqImm8V8
            | LessImm8V8
            | LessEqImm8V8
            | GreaterImm8V8
            | GreaterEqImm8V8
            | StrictEqImm8V8
            | StrictNotEqImm8V8
            | ToNumericImm8
            | IsTrue
            | IsFalse
            | CallRuntimeIsTruePrefImm8
            | CallRuntimeIsFalsePrefImm8
            | IncImm8
            | DecImm8
            | NegImm8
            | NotImm8
            | Mod2Imm8V8
            | Shl2Imm8V8
            | Shr2Imm8V8
            | Ashr2Imm8V8
            | And2Imm8V8
            | Or2Imm8V8
            | Xor2Imm8V8
            | LdObjByNameImm8Id16
            | LdObjByNameImm16Id16
            | StObjByNameImm8Id16V8
            | StObjByNameImm16Id16V8
            | LdObjByIndexImm8Imm16
            | LdObjByIndexImm16Imm16
            | WideLdObjByIndexPrefImm32
            | StObjByIndexImm8V8Imm16
            | StObjByIndexImm16V8Imm16
            | WideStObjByIndexPrefV8Imm32
            | LdObjByValueImm8V8
            | LdObjByValueImm16V8
            | StObjByValueImm8V8V8
            | StObjByValueImm16V8V8
            | SuperCallThisRangeImm8Imm8V8
            | WideSuperCallThisRangePrefImm16V8
            | LdPrivatePropertyImm8Imm16Imm16
            | StPrivatePropertyImm8Imm16Imm16V8
            | TestInImm8Imm16Imm16
            | DefineFieldByNameImm8Id16V8
            | DefinePropertyByNameImm8Id16V8
            | CallRuntimeDefineFieldByValuePrefImm8V8V8
            | CallRuntimeDefineFieldByIndexPrefImm8Imm32V8
            | CallRuntimeToPropertyKeyPrefNone
            | CallRuntimeCreatePrivatePropertyPrefImm16Id16
            | CallRuntimeDefinePrivatePropertyPrefImm8Imm16Imm16V8
            | CallThis1Imm8V8V8
            | CallArg0Imm8
            | CallArg1Imm8V8
            | CallArgs2Imm8V8V8
            | CallArgs3Imm8V8V8V8
            | CallRangeImm8Imm8V8
            | CallThis0Imm8V8
            | CallThis2Imm8V8V8V8
            | CallThis3Imm8V8V8V8V8
            | CallThisRangeImm8Imm8V8
            | CallRuntimeCallInitPrefImm8V8
            | NewObjRangeImm8Imm8V8
            | NewObjRangeImm16Imm8V8
            | WideNewObjRangePrefImm16V8
    )
}

fn reads_func(opcode: Opcode) -> bool {
    use Opcode::*;

    matches!(
        opcode,
        CallRuntimeNotifyConcurrentResultPrefNone
            | SuspendGeneratorV8
            | ResumeGenerator
            | TryLdGlobalByNameImm8Id16
            | TryLdGlobalByNameImm16Id16
            | StGlobalVarImm16Id16
            | ThrowUndefinedIfHoleWithNamePrefId16
            | DefineFuncImm8Id16Imm8
            | DefineFuncImm16Id16Imm8
            | DefineMethodImm8Id16Imm8
            | DefineMethodImm16Id16Imm8
            | DefineClassWithBufferImm8Id16Id16Imm16V8
            | DefineClassWithBufferImm16Id16Id16Imm16V8
            | InstanceOfImm8V8
            | CreateObjectWithBufferImm8Id16
            | CreateObjectWithBufferImm16Id16
            | CreateArrayWithBufferImm8Id16
            | CreateArrayWithBufferImm16Id16
            | StModuleVarImm8
            | WideStModuleVarPrefImm16
            | SetGeneratorStateImm8
            | DynamicImport
            | LdExternalModuleVarImm8
            | WideLdExternalModuleVarPrefImm16
            | GetModuleNamespaceImm8
            | WideGetModuleNamespacePrefImm16
            | NewLexEnvWithNameImm8Id16
            | WideNewLexEnvWithNamePrefImm16Id16
            | LdSuperByValueImm8V8
            | LdSuperByValueImm16V8
            | StSuperByValueImm8V8V8
            | StSuperByValueImm16V8V8
            | TryStGlobalByNameImm8Id16
            | TryStGlobalByNameImm16Id16
            | LdGlobalVarImm16Id16
            | LdObjByNameImm8Id16
            | LdObjByNameImm16Id16
            | StObjByNameImm8Id16V8
            | StObjByNameImm16Id16V8
            | LdObjByValueImm8V8
            | LdObjByValueImm16V8
            | LdThisByValueImm8
            | LdThisByValueImm16
            | StObjByValueImm8V8V8
            | StObjByValueImm16V8V8
            | StThisByValueImm8V8
            | StThisByValueImm16V8
            | LdSuperByNameImm8Id16
            | LdSuperByNameImm16Id16
            | StSuperByNameImm8Id16V8
            | StSuperByNameImm16Id16V8
            | LdLocalModuleVarImm8
            | WideLdLocalModuleVarPrefImm16
            | LdThisByNameImm8Id16
            | LdThisByNameImm16Id16
            | StThisByNameImm8Id16
            | StThisByNameImm16Id16
            | AsyncGeneratorResolveV8V8V8
            | CallArg0Imm8
            | CallArg1Imm8V8
            | CallArgs2Imm8V8V8
            | CallArgs3Imm8V8V8V8
            | CallRangeImm8Imm8V8
            | WideCallRangePrefImm16V8
            | CallThis0Imm8V8
            | CallThis1Imm8V8V8
            | CallThis2Imm8V8V8V8
            | CallThis3Imm8V8V8V8V8
            | CallThisRangeImm8Imm8V8
            | WideCallThisRangePrefImm16V8
            | LdaStrId16
            | StOwnByNameWithNameSetImm8Id16V8
            | StOwnByNameWithNameSetImm16Id16V8
            | StToGlobalRecordImm16Id16
            | StConstToGlobalRecordImm16Id16
            | StOwnByNameImm8Id16V8
            | StOwnByNameImm16Id16V8
            | CreateRegExpWithLiteralImm8Id16Imm8
            | CreateRegExpWithLiteralImm16Id16Imm8
            | LdBigIntId16
            | DefineFieldByNameImm8Id16V8
            | DefinePropertyByNameImm8Id16V8
            | CallRuntimeDefineFieldByValuePrefImm8V8V8
            | CallRuntimeDefineFieldByIndexPrefImm8Imm32V8
            | CallRuntimeCreatePrivatePropertyPrefImm16Id16
            | CallRuntimeDefinePrivatePropertyPrefImm8Imm16Imm16V8
            | CallRuntimeCallInitPrefImm8V8
            | CallRuntimeDefineSendableClassPrefImm16Id16Id16Imm16V8
            | CallRuntimeLdSendableExternalModuleVarPrefImm8
            | CallRuntimeWideLdSendableExternalModuleVarPrefImm16
            | CallRuntimeLdSendableLocalModuleVarPrefImm8
            | CallRuntimeWideLdSendableLocalModuleVarPrefImm16
            | CallRuntimeStSendableVarPrefImm4Imm4
            | CallRuntimeStSendableVarPrefImm8Imm8
            | CallRuntimeWideStSendableVarPrefImm16Imm16
            | CallRuntimeLdSendableVarPrefImm4Imm4
            | CallRuntimeLdSendableVarPrefImm8Imm8
            | CallRuntimeWideLdSendableVarPrefImm16Imm16
            | CallRuntimeNewSendableEnvPrefImm8
            | CallRuntimeWideNewSendableEnvPrefImm16
            | CallRuntimeLdLazyModuleVarPrefImm8
            | CallRuntimeWideLdLazyModuleVarPrefImm16
            | CallRuntimeLdLazySendableModuleVarPrefImm8
            | CallRuntimeWideLdLazySendableModuleVarPrefImm16
            | SuperCallThisRangeImm8Imm8V8
            | WideSuperCallThisRangePrefImm16V8
    )
}

fn writes_env(opcode: Opcode) -> bool {
    use Opcode::*;

    matches!(
        opcode,
        NewLexEnvImm8
            | WideNewLexEnvPrefImm16
            | NewLexEnvWithNameImm8Id16
            | WideNewLexEnvWithNamePrefImm16Id16
            | PopLexEnv
    )
}

fn reads_env(opcode: Opcode) -> bool {
    use Opcode::*;

    writes_env(opcode)
        || matches!(
            opcode,
            LdLexVarImm4Imm4
                | LdLexVarImm8Imm8
                | WideLdLexVarPrefImm16Imm16
                | CreateObjectWithBufferImm8Id16
                | CreateObjectWithBufferImm16Id16
                | DefineClassWithBufferImm8Id16Id16Imm16V8
                | DefineClassWithBufferImm16Id16Id16Imm16V8
                | DefineFuncImm8Id16Imm8
                | DefineFuncImm16Id16Imm8
                | DefineMethodImm8Id16Imm8
                | DefineMethodImm16Id16Imm8
                | LdPrivatePropertyImm8Imm16Imm16
                | StPrivatePropertyImm8Imm16Imm16V8
                | TestInImm8Imm16Imm16
                | CallRuntimeCreatePrivatePropertyPrefImm16Id16
                | CallRuntimeDefinePrivatePropertyPrefImm8Imm16Imm16V8
                | CallRuntimeLdSendableClassPrefImm16
        )
}

fn reads_new_target(opcode: Opcode) -> bool {
    use Opcode::*;

    matches!(
        opcode,
        SuperCallThisRangeImm8Imm8V8
            | WideSuperCallThisRangePrefImm16V8
            | SuperCallArrowRangeImm8Imm8V8
            | WideSuperCallArrowRangePrefImm16V8
            | SuperCallSpreadImm8V8
            | CallRuntimeSuperCallForwardAllArgsPrefV8
    )
}

fn reads_argc(opcode: Opcode) -> bool {
    matches!(
        opcode,
        Opcode::GetUnmappedArgs | Opcode::CopyRestArgsImm8 | Opcode::WideCopyRestArgsPrefImm16
    )
}

/// Static metadata of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytecodeMetaData {
    opcode: Opcode,
    flags: BytecodeFlags,
    kind: BytecodeKind,
    size: usize,
    vreg_count: usize,
}

impl BytecodeMetaData {
    /// Compute the metadata of `opcode`.
    #[must_use]
    pub fn create(opcode: Opcode) -> Self {
        let kind = BytecodeKind::of(opcode);

        let mut flags = BytecodeFlags::empty();
        for (applies, flag) in [
            (is_no_side_effects(opcode), BytecodeFlags::NO_SIDE_EFFECTS),
            (is_no_gc(opcode), BytecodeFlags::NO_GC),
            (is_no_throw(opcode), BytecodeFlags::NO_THROW),
            (reads_this_object(opcode), BytecodeFlags::READ_THIS_OBJECT),
            (supports_deopt(opcode), BytecodeFlags::SUPPORT_DEOPT),
            (opcode == Opcode::Debugger, BytecodeFlags::DEBUGGER_STMT),
            (reads_func(opcode), BytecodeFlags::READ_FUNC),
            (writes_env(opcode), BytecodeFlags::WRITE_ENV),
            (reads_env(opcode), BytecodeFlags::READ_ENV),
            (reads_new_target(opcode), BytecodeFlags::READ_NEWTARGET),
            (reads_argc(opcode), BytecodeFlags::READ_ARGC),
            (kind.is_general(), BytecodeFlags::GENERAL_BC),
        ] {
            flags.set(flag, applies);
        }

        BytecodeMetaData {
            opcode,
            flags,
            kind,
            size: opcode.size(),
            vreg_count: opcode.format().vreg_count(),
        }
    }

    /// The opcode described.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// All static flags.
    #[must_use]
    pub fn flags(&self) -> BytecodeFlags {
        self.flags
    }

    /// Coarse kind of the opcode.
    #[must_use]
    pub fn kind(&self) -> BytecodeKind {
        self.kind
    }

    /// Encoded instruction size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of virtual register operands.
    #[must_use]
    pub fn vreg_count(&self) -> usize {
        self.vreg_count
    }

    /// The instruction can never trigger a garbage collection.
    #[must_use]
    pub fn is_no_gc(&self) -> bool {
        self.flags.contains(BytecodeFlags::NO_GC)
    }

    /// The instruction is the `debugger` statement.
    #[must_use]
    pub fn has_debugger_stmt(&self) -> bool {
        self.flags.contains(BytecodeFlags::DEBUGGER_STMT)
    }

    /// The instruction has no observable side effect.
    #[must_use]
    pub fn is_no_side_effects(&self) -> bool {
        self.flags.contains(BytecodeFlags::NO_SIDE_EFFECTS)
    }

    /// The instruction never throws.
    #[must_use]
    pub fn is_no_throw(&self) -> bool {
        self.flags.contains(BytecodeFlags::NO_THROW)
    }

    /// The instruction is lowered through the general bytecode path.
    #[must_use]
    pub fn is_general(&self) -> bool {
        self.flags.contains(BytecodeFlags::GENERAL_BC)
    }

    /// The instruction reads `new.target`.
    #[must_use]
    pub fn reads_new_target(&self) -> bool {
        self.flags.contains(BytecodeFlags::READ_NEWTARGET)
    }
}

/// Lookup table holding the [`BytecodeMetaData`] of every opcode, sorted by opcode value.
pub struct Bytecodes {
    table: Vec<BytecodeMetaData>,
}

static BYTECODES: OnceLock<Bytecodes> = OnceLock::new();

impl Bytecodes {
    /// Build a fresh table.
    #[must_use]
    pub fn new() -> Self {
        let mut table: Vec<BytecodeMetaData> =
            Opcode::iter().map(BytecodeMetaData::create).collect();
        table.sort_unstable_by_key(|meta| meta.opcode.value());

        Bytecodes { table }
    }

    /// The process-wide table, built on first use.
    pub fn global() -> &'static Bytecodes {
        BYTECODES.get_or_init(Bytecodes::new)
    }

    /// Metadata of `opcode`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the table has no entry for the opcode.
    pub fn get(&self, opcode: Opcode) -> Result<&BytecodeMetaData> {
        self.table
            .binary_search_by_key(&opcode.value(), |meta| meta.opcode.value())
            .map(|index| &self.table[index])
            .map_err(|_| malformed_error!("No metadata for opcode {}", opcode))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for Bytecodes {
    fn default() -> Self {
        Self::new()
    }
}
