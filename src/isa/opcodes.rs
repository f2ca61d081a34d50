use strum::{EnumCount, EnumIter, FromRepr, IntoStaticStr};

use super::{
    is_prefix, Format, InstructionFlags, CALLRUNTIME_PREFIX, DEPRECATED_PREFIX, THROW_PREFIX,
    WIDE_PREFIX,
};

const fn callruntime(sub: u8) -> u16 {
    ((sub as u16) << 8) | CALLRUNTIME_PREFIX as u16
}

const fn deprecated(sub: u8) -> u16 {
    ((sub as u16) << 8) | DEPRECATED_PREFIX as u16
}

const fn wide(sub: u8) -> u16 {
    ((sub as u16) << 8) | WIDE_PREFIX as u16
}

const fn throw(sub: u8) -> u16 {
    ((sub as u16) << 8) | THROW_PREFIX as u16
}

macro_rules! opcodes {
    ($($name:ident = $value:expr, $format:ident $(, $flag:ident)*;)*) => {
        /// Every opcode of the instruction set.
        ///
        /// Variant names follow the instruction mnemonic followed by its operand format,
        /// e.g. `DefineFuncImm8Id16Imm8` is `definefunc` with `imm8, id16, imm8` operands.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            EnumIter,
            EnumCount,
            FromRepr,
            IntoStaticStr,
        )]
        #[repr(u16)]
        #[allow(missing_docs)]
        pub enum Opcode {
            $($name = $value,)*
        }

        impl Opcode {
            /// The operand layout of this opcode.
            #[must_use]
            pub const fn format(self) -> Format {
                match self {
                    $(Opcode::$name => Format::$format,)*
                }
            }

            /// Static operand flags of this opcode.
            #[must_use]
            pub const fn flags(self) -> InstructionFlags {
                match self {
                    $(Opcode::$name => InstructionFlags::from_bits_retain(
                        0 $(| InstructionFlags::$flag.bits())*
                    ),)*
                }
            }
        }
    };
}

opcodes! {
    LdUndefined = 0x00, None;
    LdNull = 0x01, None;
    LdTrue = 0x02, None;
    LdFalse = 0x03, None;
    CreateEmptyObject = 0x04, None;
    CreateEmptyArrayImm8 = 0x05, Imm8;
    CreateArrayWithBufferImm8Id16 = 0x06, Imm8Id16, LITERALARRAY_ID;
    CreateObjectWithBufferImm8Id16 = 0x07, Imm8Id16, LITERALARRAY_ID;
    NewObjRangeImm8Imm8V8 = 0x08, Imm8Imm8V8;
    NewLexEnvImm8 = 0x09, Imm8;
    Add2Imm8V8 = 0x0a, Imm8V8;
    Sub2Imm8V8 = 0x0b, Imm8V8;
    Mul2Imm8V8 = 0x0c, Imm8V8;
    Div2Imm8V8 = 0x0d, Imm8V8;
    Mod2Imm8V8 = 0x0e, Imm8V8;
    EqImm8V8 = 0x0f, Imm8V8;
    NotEqImm8V8 = 0x10, Imm8V8;
    LessImm8V8 = 0x11, Imm8V8;
    LessEqImm8V8 = 0x12, Imm8V8;
    GreaterImm8V8 = 0x13, Imm8V8;
    GreaterEqImm8V8 = 0x14, Imm8V8;
    Shl2Imm8V8 = 0x15, Imm8V8;
    Shr2Imm8V8 = 0x16, Imm8V8;
    Ashr2Imm8V8 = 0x17, Imm8V8;
    And2Imm8V8 = 0x18, Imm8V8;
    Or2Imm8V8 = 0x19, Imm8V8;
    Xor2Imm8V8 = 0x1a, Imm8V8;
    ExpImm8V8 = 0x1b, Imm8V8;
    TypeOfImm8 = 0x1c, Imm8;
    ToNumberImm8 = 0x1d, Imm8;
    ToNumericImm8 = 0x1e, Imm8;
    NegImm8 = 0x1f, Imm8;
    NotImm8 = 0x20, Imm8;
    IncImm8 = 0x21, Imm8;
    DecImm8 = 0x22, Imm8;
    IsTrue = 0x23, None;
    IsFalse = 0x24, None;
    IsInImm8V8 = 0x25, Imm8V8;
    InstanceOfImm8V8 = 0x26, Imm8V8;
    StrictNotEqImm8V8 = 0x27, Imm8V8;
    StrictEqImm8V8 = 0x28, Imm8V8;
    CallArg0Imm8 = 0x29, Imm8;
    CallArg1Imm8V8 = 0x2a, Imm8V8;
    CallArgs2Imm8V8V8 = 0x2b, Imm8V8V8;
    CallArgs3Imm8V8V8V8 = 0x2c, Imm8V8V8V8;
    CallThis0Imm8V8 = 0x2d, Imm8V8;
    CallThis1Imm8V8V8 = 0x2e, Imm8V8V8;
    CallThis2Imm8V8V8V8 = 0x2f, Imm8V8V8V8;
    CallThis3Imm8V8V8V8V8 = 0x30, Imm8V8V8V8V8;
    CallThisRangeImm8Imm8V8 = 0x31, Imm8Imm8V8;
    SuperCallThisRangeImm8Imm8V8 = 0x32, Imm8Imm8V8;
    DefineFuncImm8Id16Imm8 = 0x33, Imm8Id16Imm8, METHOD_ID;
    DefineMethodImm8Id16Imm8 = 0x34, Imm8Id16Imm8, METHOD_ID;
    DefineClassWithBufferImm8Id16Id16Imm16V8 = 0x35, Imm8Id16Id16Imm16V8, METHOD_ID, LITERALARRAY_ID;
    GetNextPropNameV8 = 0x36, V8;
    LdObjByValueImm8V8 = 0x37, Imm8V8;
    StObjByValueImm8V8V8 = 0x38, Imm8V8V8;
    LdSuperByValueImm8V8 = 0x39, Imm8V8;
    LdObjByIndexImm8Imm16 = 0x3a, Imm8Imm16;
    StObjByIndexImm8V8Imm16 = 0x3b, Imm8V8Imm16;
    LdLexVarImm4Imm4 = 0x3c, Imm4Imm4;
    StLexVarImm4Imm4 = 0x3d, Imm4Imm4;
    LdaStrId16 = 0x3e, Id16, STRING_ID;
    TryLdGlobalByNameImm8Id16 = 0x3f, Imm8Id16, STRING_ID;
    TryStGlobalByNameImm8Id16 = 0x40, Imm8Id16, STRING_ID;
    LdGlobalVarImm16Id16 = 0x41, Imm16Id16, STRING_ID;
    LdObjByNameImm8Id16 = 0x42, Imm8Id16, STRING_ID;
    StObjByNameImm8Id16V8 = 0x43, Imm8Id16V8, STRING_ID;
    MovV4V4 = 0x44, V4V4;
    MovV8V8 = 0x45, V8V8;
    LdSuperByNameImm8Id16 = 0x46, Imm8Id16, STRING_ID;
    StConstToGlobalRecordImm16Id16 = 0x47, Imm16Id16, STRING_ID;
    StToGlobalRecordImm16Id16 = 0x48, Imm16Id16, STRING_ID;
    LdThisByNameImm8Id16 = 0x49, Imm8Id16, STRING_ID;
    StThisByNameImm8Id16 = 0x4a, Imm8Id16, STRING_ID;
    LdThisByValueImm8 = 0x4b, Imm8;
    StThisByValueImm8V8 = 0x4c, Imm8V8;
    JmpImm8 = 0x4d, Imm8;
    JmpImm16 = 0x4e, Imm16;
    JeqzImm8 = 0x4f, Imm8;
    JeqzImm16 = 0x50, Imm16;
    JnezImm8 = 0x51, Imm8;
    JstrictEqzImm8 = 0x52, Imm8;
    JnstrictEqzImm8 = 0x53, Imm8;
    JeqNullImm8 = 0x54, Imm8;
    JneNullImm8 = 0x55, Imm8;
    JstrictEqNullImm8 = 0x56, Imm8;
    JnstrictEqNullImm8 = 0x57, Imm8;
    JeqUndefinedImm8 = 0x58, Imm8;
    JneUndefinedImm8 = 0x59, Imm8;
    JstrictEqUndefinedImm8 = 0x5a, Imm8;
    JnstrictEqUndefinedImm8 = 0x5b, Imm8;
    JeqV8Imm8 = 0x5c, V8Imm8;
    JneV8Imm8 = 0x5d, V8Imm8;
    JstrictEqV8Imm8 = 0x5e, V8Imm8;
    JnstrictEqV8Imm8 = 0x5f, V8Imm8;
    LdaV8 = 0x60, V8;
    StaV8 = 0x61, V8;
    LdaiImm32 = 0x62, Imm32;
    FldaiImm64 = 0x63, Imm64;
    Return = 0x64, None;
    ReturnUndefined = 0x65, None;
    GetPropIterator = 0x66, None;
    GetIteratorImm8 = 0x67, Imm8;
    CloseIteratorImm8V8 = 0x68, Imm8V8;
    PopLexEnv = 0x69, None;
    LdNan = 0x6a, None;
    LdInfinity = 0x6b, None;
    GetUnmappedArgs = 0x6c, None;
    LdGlobal = 0x6d, None;
    LdNewTarget = 0x6e, None;
    LdThis = 0x6f, None;
    LdHole = 0x70, None;
    CreateRegExpWithLiteralImm8Id16Imm8 = 0x71, Imm8Id16Imm8, STRING_ID;
    CreateRegExpWithLiteralImm16Id16Imm8 = 0x72, Imm16Id16Imm8, STRING_ID;
    CallRangeImm8Imm8V8 = 0x73, Imm8Imm8V8;
    DefineFuncImm16Id16Imm8 = 0x74, Imm16Id16Imm8, METHOD_ID;
    DefineClassWithBufferImm16Id16Id16Imm16V8 = 0x75, Imm16Id16Id16Imm16V8, METHOD_ID, LITERALARRAY_ID;
    GetTemplateObjectImm8 = 0x76, Imm8;
    SetObjectWithProtoImm8V8 = 0x77, Imm8V8;
    StOwnByValueImm8V8V8 = 0x78, Imm8V8V8;
    StOwnByIndexImm8V8Imm16 = 0x79, Imm8V8Imm16;
    StOwnByNameImm8Id16V8 = 0x7a, Imm8Id16V8, STRING_ID;
    GetModuleNamespaceImm8 = 0x7b, Imm8;
    StModuleVarImm8 = 0x7c, Imm8;
    LdLocalModuleVarImm8 = 0x7d, Imm8;
    LdExternalModuleVarImm8 = 0x7e, Imm8;
    StGlobalVarImm16Id16 = 0x7f, Imm16Id16, STRING_ID;
    CreateEmptyArrayImm16 = 0x80, Imm16;
    CreateArrayWithBufferImm16Id16 = 0x81, Imm16Id16, LITERALARRAY_ID;
    CreateObjectWithBufferImm16Id16 = 0x82, Imm16Id16, LITERALARRAY_ID;
    NewObjRangeImm16Imm8V8 = 0x83, Imm16Imm8V8;
    TypeOfImm16 = 0x84, Imm16;
    LdObjByValueImm16V8 = 0x85, Imm16V8;
    StObjByValueImm16V8V8 = 0x86, Imm16V8V8;
    LdSuperByValueImm16V8 = 0x87, Imm16V8;
    LdObjByIndexImm16Imm16 = 0x88, Imm16Imm16;
    StObjByIndexImm16V8Imm16 = 0x89, Imm16V8Imm16;
    LdLexVarImm8Imm8 = 0x8a, Imm8Imm8;
    StLexVarImm8Imm8 = 0x8b, Imm8Imm8;
    TryLdGlobalByNameImm16Id16 = 0x8c, Imm16Id16, STRING_ID;
    TryStGlobalByNameImm16Id16 = 0x8d, Imm16Id16, STRING_ID;
    StOwnByNameWithNameSetImm8Id16V8 = 0x8e, Imm8Id16V8, STRING_ID;
    MovV16V16 = 0x8f, V16V16;
    LdObjByNameImm16Id16 = 0x90, Imm16Id16, STRING_ID;
    StObjByNameImm16Id16V8 = 0x91, Imm16Id16V8, STRING_ID;
    LdSuperByNameImm16Id16 = 0x92, Imm16Id16, STRING_ID;
    LdThisByNameImm16Id16 = 0x93, Imm16Id16, STRING_ID;
    StThisByNameImm16Id16 = 0x94, Imm16Id16, STRING_ID;
    LdThisByValueImm16 = 0x95, Imm16;
    StThisByValueImm16V8 = 0x96, Imm16V8;
    AsyncGeneratorRejectV8 = 0x97, V8;
    JmpImm32 = 0x98, Imm32;
    StOwnByValueWithNameSetImm8V8V8 = 0x99, Imm8V8V8;
    JeqzImm32 = 0x9a, Imm32;
    JnezImm16 = 0x9b, Imm16;
    JnezImm32 = 0x9c, Imm32;
    JstrictEqzImm16 = 0x9d, Imm16;
    JnstrictEqzImm16 = 0x9e, Imm16;
    JeqNullImm16 = 0x9f, Imm16;
    JneNullImm16 = 0xa0, Imm16;
    JstrictEqNullImm16 = 0xa1, Imm16;
    JnstrictEqNullImm16 = 0xa2, Imm16;
    JeqUndefinedImm16 = 0xa3, Imm16;
    JneUndefinedImm16 = 0xa4, Imm16;
    JstrictEqUndefinedImm16 = 0xa5, Imm16;
    JnstrictEqUndefinedImm16 = 0xa6, Imm16;
    JeqV8Imm16 = 0xa7, V8Imm16;
    JneV8Imm16 = 0xa8, V8Imm16;
    JstrictEqV8Imm16 = 0xa9, V8Imm16;
    JnstrictEqV8Imm16 = 0xaa, V8Imm16;
    GetIteratorImm16 = 0xab, Imm16;
    CloseIteratorImm16V8 = 0xac, Imm16V8;
    LdSymbol = 0xad, None;
    AsyncFunctionEnter = 0xae, None;
    LdFunction = 0xaf, None;
    Debugger = 0xb0, None;
    CreateGeneratorObjV8 = 0xb1, V8;
    CreateIterResultObjV8V8 = 0xb2, V8V8;
    CreateObjectWithExcludedKeysImm8V8V8 = 0xb3, Imm8V8V8;
    NewObjApplyImm8V8 = 0xb4, Imm8V8;
    NewObjApplyImm16V8 = 0xb5, Imm16V8;
    NewLexEnvWithNameImm8Id16 = 0xb6, Imm8Id16, LITERALARRAY_ID;
    CreateAsyncGeneratorObjV8 = 0xb7, V8;
    AsyncGeneratorResolveV8V8V8 = 0xb8, V8V8V8;
    SuperCallSpreadImm8V8 = 0xb9, Imm8V8;
    ApplyImm8V8V8 = 0xba, Imm8V8V8;
    SuperCallArrowRangeImm8Imm8V8 = 0xbb, Imm8Imm8V8;
    DefineGetterSetterByValueV8V8V8V8 = 0xbc, V8V8V8V8;
    DynamicImport = 0xbd, None;
    DefineMethodImm16Id16Imm8 = 0xbe, Imm16Id16Imm8, METHOD_ID;
    ResumeGenerator = 0xbf, None;
    GetResumeMode = 0xc0, None;
    GetTemplateObjectImm16 = 0xc1, Imm16;
    DelObjPropV8 = 0xc2, V8;
    SuspendGeneratorV8 = 0xc3, V8;
    AsyncFunctionAwaitUncaughtV8 = 0xc4, V8;
    CopyDataPropertiesV8 = 0xc5, V8;
    StArraySpreadV8V8 = 0xc6, V8V8;
    SetObjectWithProtoImm16V8 = 0xc7, Imm16V8;
    StOwnByValueImm16V8V8 = 0xc8, Imm16V8V8;
    StSuperByValueImm8V8V8 = 0xc9, Imm8V8V8;
    StSuperByValueImm16V8V8 = 0xca, Imm16V8V8;
    StOwnByIndexImm16V8Imm16 = 0xcb, Imm16V8Imm16;
    StOwnByNameImm16Id16V8 = 0xcc, Imm16Id16V8, STRING_ID;
    AsyncFunctionResolveV8 = 0xcd, V8;
    AsyncFunctionRejectV8 = 0xce, V8;
    CopyRestArgsImm8 = 0xcf, Imm8;
    StSuperByNameImm8Id16V8 = 0xd0, Imm8Id16V8, STRING_ID;
    StSuperByNameImm16Id16V8 = 0xd1, Imm16Id16V8, STRING_ID;
    StOwnByValueWithNameSetImm16V8V8 = 0xd2, Imm16V8V8;
    LdBigIntId16 = 0xd3, Id16, STRING_ID;
    StOwnByNameWithNameSetImm16Id16V8 = 0xd4, Imm16Id16V8, STRING_ID;
    Nop = 0xd5, None;
    SetGeneratorStateImm8 = 0xd6, Imm8;
    GetAsyncIteratorImm8 = 0xd7, Imm8;
    LdPrivatePropertyImm8Imm16Imm16 = 0xd8, Imm8Imm16Imm16;
    StPrivatePropertyImm8Imm16Imm16V8 = 0xd9, Imm8Imm16Imm16V8;
    TestInImm8Imm16Imm16 = 0xda, Imm8Imm16Imm16;
    DefineFieldByNameImm8Id16V8 = 0xdb, Imm8Id16V8, STRING_ID;
    DefinePropertyByNameImm8Id16V8 = 0xdc, Imm8Id16V8, STRING_ID;

    CallRuntimeNotifyConcurrentResultPrefNone = callruntime(0x00), PrefNone;
    CallRuntimeDefineFieldByValuePrefImm8V8V8 = callruntime(0x01), PrefImm8V8V8;
    CallRuntimeDefineFieldByIndexPrefImm8Imm32V8 = callruntime(0x02), PrefImm8Imm32V8;
    CallRuntimeToPropertyKeyPrefNone = callruntime(0x03), PrefNone;
    CallRuntimeCreatePrivatePropertyPrefImm16Id16 = callruntime(0x04), PrefImm16Id16, LITERALARRAY_ID;
    CallRuntimeDefinePrivatePropertyPrefImm8Imm16Imm16V8 = callruntime(0x05), PrefImm8Imm16Imm16V8;
    CallRuntimeCallInitPrefImm8V8 = callruntime(0x06), PrefImm8V8;
    CallRuntimeDefineSendableClassPrefImm16Id16Id16Imm16V8 = callruntime(0x07), PrefImm16Id16Id16Imm16V8, METHOD_ID, LITERALARRAY_ID;
    CallRuntimeLdSendableClassPrefImm16 = callruntime(0x08), PrefImm16;
    CallRuntimeLdSendableExternalModuleVarPrefImm8 = callruntime(0x09), PrefImm8;
    CallRuntimeWideLdSendableExternalModuleVarPrefImm16 = callruntime(0x0a), PrefImm16;
    CallRuntimeNewSendableEnvPrefImm8 = callruntime(0x0b), PrefImm8;
    CallRuntimeWideNewSendableEnvPrefImm16 = callruntime(0x0c), PrefImm16;
    CallRuntimeStSendableVarPrefImm4Imm4 = callruntime(0x0d), PrefImm4Imm4;
    CallRuntimeStSendableVarPrefImm8Imm8 = callruntime(0x0e), PrefImm8Imm8;
    CallRuntimeWideStSendableVarPrefImm16Imm16 = callruntime(0x0f), PrefImm16Imm16;
    CallRuntimeLdSendableVarPrefImm4Imm4 = callruntime(0x10), PrefImm4Imm4;
    CallRuntimeLdSendableVarPrefImm8Imm8 = callruntime(0x11), PrefImm8Imm8;
    CallRuntimeWideLdSendableVarPrefImm16Imm16 = callruntime(0x12), PrefImm16Imm16;
    CallRuntimeIsTruePrefImm8 = callruntime(0x13), PrefImm8;
    CallRuntimeIsFalsePrefImm8 = callruntime(0x14), PrefImm8;
    CallRuntimeLdLazyModuleVarPrefImm8 = callruntime(0x15), PrefImm8;
    CallRuntimeWideLdLazyModuleVarPrefImm16 = callruntime(0x16), PrefImm16;
    CallRuntimeLdLazySendableModuleVarPrefImm8 = callruntime(0x17), PrefImm8;
    CallRuntimeWideLdLazySendableModuleVarPrefImm16 = callruntime(0x18), PrefImm16;
    CallRuntimeSuperCallForwardAllArgsPrefV8 = callruntime(0x19), PrefV8;
    CallRuntimeLdSendableLocalModuleVarPrefImm8 = callruntime(0x1a), PrefImm8;
    CallRuntimeWideLdSendableLocalModuleVarPrefImm16 = callruntime(0x1b), PrefImm16;

    DeprecatedLdLexEnvPrefNone = deprecated(0x00), PrefNone;
    DeprecatedPopLexEnvPrefNone = deprecated(0x01), PrefNone;
    DeprecatedGetIteratorNextPrefV8V8 = deprecated(0x02), PrefV8V8;
    DeprecatedCreateArrayWithBufferPrefImm16 = deprecated(0x03), PrefImm16;
    DeprecatedCreateObjectWithBufferPrefImm16 = deprecated(0x04), PrefImm16;
    DeprecatedToNumberPrefV8 = deprecated(0x05), PrefV8;
    DeprecatedToNumericPrefV8 = deprecated(0x06), PrefV8;
    DeprecatedNegPrefV8 = deprecated(0x07), PrefV8;
    DeprecatedNotPrefV8 = deprecated(0x08), PrefV8;
    DeprecatedIncPrefV8 = deprecated(0x09), PrefV8;
    DeprecatedDecPrefV8 = deprecated(0x0a), PrefV8;
    DeprecatedCallArg0PrefV8 = deprecated(0x0b), PrefV8;
    DeprecatedCallArg1PrefV8V8 = deprecated(0x0c), PrefV8V8;
    DeprecatedCallArgs2PrefV8V8V8 = deprecated(0x0d), PrefV8V8V8;
    DeprecatedCallArgs3PrefV8V8V8V8 = deprecated(0x0e), PrefV8V8V8V8;
    DeprecatedCallRangePrefImm16V8 = deprecated(0x0f), PrefImm16V8;
    DeprecatedCallSpreadPrefV8V8V8 = deprecated(0x10), PrefV8V8V8;
    DeprecatedCallThisRangePrefImm16V8 = deprecated(0x11), PrefImm16V8;
    DeprecatedDefineClassWithBufferPrefId16Imm16Imm16V8V8 = deprecated(0x12), PrefId16Imm16Imm16V8V8, METHOD_ID;
    DeprecatedResumeGeneratorPrefV8 = deprecated(0x13), PrefV8;
    DeprecatedGetResumeModePrefV8 = deprecated(0x14), PrefV8;
    DeprecatedGetTemplateObjectPrefV8 = deprecated(0x15), PrefV8;
    DeprecatedDelObjPropPrefV8V8 = deprecated(0x16), PrefV8V8;
    DeprecatedSuspendGeneratorPrefV8V8 = deprecated(0x17), PrefV8V8;
    DeprecatedAsyncFunctionAwaitUncaughtPrefV8V8 = deprecated(0x18), PrefV8V8;
    DeprecatedCopyDataPropertiesPrefV8V8 = deprecated(0x19), PrefV8V8;
    DeprecatedSetObjectWithProtoPrefV8V8 = deprecated(0x1a), PrefV8V8;
    DeprecatedLdObjByValuePrefV8V8 = deprecated(0x1b), PrefV8V8;
    DeprecatedLdSuperByValuePrefV8V8 = deprecated(0x1c), PrefV8V8;
    DeprecatedLdObjByIndexPrefV8Imm32 = deprecated(0x1d), PrefV8Imm32;
    DeprecatedAsyncFunctionResolvePrefV8V8V8 = deprecated(0x1e), PrefV8V8V8;
    DeprecatedAsyncFunctionRejectPrefV8V8V8 = deprecated(0x1f), PrefV8V8V8;
    DeprecatedStLexVarPrefImm4Imm4V8 = deprecated(0x20), PrefImm4Imm4V8;
    DeprecatedStLexVarPrefImm8Imm8V8 = deprecated(0x21), PrefImm8Imm8V8;
    DeprecatedStLexVarPrefImm16Imm16V8 = deprecated(0x22), PrefImm16Imm16V8;
    DeprecatedGetModuleNamespacePrefId32 = deprecated(0x23), PrefId32, STRING_ID;
    DeprecatedStModuleVarPrefId32 = deprecated(0x24), PrefId32, STRING_ID;
    DeprecatedLdObjByNamePrefId32V8 = deprecated(0x25), PrefId32V8, STRING_ID;
    DeprecatedLdSuperByNamePrefId32V8 = deprecated(0x26), PrefId32V8, STRING_ID;
    DeprecatedLdModuleVarPrefId32Imm8 = deprecated(0x27), PrefId32Imm8, STRING_ID;
    DeprecatedStConstToGlobalRecordPrefId32 = deprecated(0x28), PrefId32, STRING_ID;
    DeprecatedStLetToGlobalRecordPrefId32 = deprecated(0x29), PrefId32, STRING_ID;
    DeprecatedStClassToGlobalRecordPrefId32 = deprecated(0x2a), PrefId32, STRING_ID;
    DeprecatedLdHomeObjectPrefNone = deprecated(0x2b), PrefNone;
    DeprecatedCreateObjectHavingMethodPrefImm16 = deprecated(0x2c), PrefImm16;
    DeprecatedDynamicImportPrefV8 = deprecated(0x2d), PrefV8;
    DeprecatedAsyncGeneratorRejectPrefV8V8 = deprecated(0x2e), PrefV8V8;

    WideCreateObjectWithExcludedKeysPrefImm16V8V8 = wide(0x00), PrefImm16V8V8;
    WideNewObjRangePrefImm16V8 = wide(0x01), PrefImm16V8;
    WideNewLexEnvPrefImm16 = wide(0x02), PrefImm16;
    WideNewLexEnvWithNamePrefImm16Id16 = wide(0x03), PrefImm16Id16, LITERALARRAY_ID;
    WideCallRangePrefImm16V8 = wide(0x04), PrefImm16V8;
    WideCallThisRangePrefImm16V8 = wide(0x05), PrefImm16V8;
    WideSuperCallThisRangePrefImm16V8 = wide(0x06), PrefImm16V8;
    WideSuperCallArrowRangePrefImm16V8 = wide(0x07), PrefImm16V8;
    WideLdObjByIndexPrefImm32 = wide(0x08), PrefImm32;
    WideStObjByIndexPrefV8Imm32 = wide(0x09), PrefV8Imm32;
    WideStOwnByIndexPrefV8Imm32 = wide(0x0a), PrefV8Imm32;
    WideCopyRestArgsPrefImm16 = wide(0x0b), PrefImm16;
    WideLdLexVarPrefImm16Imm16 = wide(0x0c), PrefImm16Imm16;
    WideStLexVarPrefImm16Imm16 = wide(0x0d), PrefImm16Imm16;
    WideGetModuleNamespacePrefImm16 = wide(0x0e), PrefImm16;
    WideStModuleVarPrefImm16 = wide(0x0f), PrefImm16;
    WideLdLocalModuleVarPrefImm16 = wide(0x10), PrefImm16;
    WideLdExternalModuleVarPrefImm16 = wide(0x11), PrefImm16;
    WideLdPatchVarPrefImm16 = wide(0x12), PrefImm16;
    WideStPatchVarPrefImm16 = wide(0x13), PrefImm16;

    ThrowPrefNone = throw(0x00), PrefNone;
    ThrowNotExistsPrefNone = throw(0x01), PrefNone;
    ThrowPatternNonCoerciblePrefNone = throw(0x02), PrefNone;
    ThrowDeleteSuperPropertyPrefNone = throw(0x03), PrefNone;
    ThrowConstAssignmentPrefV8 = throw(0x04), PrefV8;
    ThrowIfNotObjectPrefV8 = throw(0x05), PrefV8;
    ThrowUndefinedIfHolePrefV8V8 = throw(0x06), PrefV8V8;
    ThrowIfSuperNotCorrectCallPrefImm8 = throw(0x07), PrefImm8;
    ThrowIfSuperNotCorrectCallPrefImm16 = throw(0x08), PrefImm16;
    ThrowUndefinedIfHoleWithNamePrefId16 = throw(0x09), PrefId16, STRING_ID;
}

impl Opcode {
    /// Decode the opcode starting with `first`.
    ///
    /// `second` is the byte following `first`; it is only consulted when `first` is a
    /// prefix byte. Returns `None` for encodings outside the instruction set.
    #[must_use]
    pub fn decode(first: u8, second: Option<u8>) -> Option<Opcode> {
        if is_prefix(first) {
            let sub = second?;
            Opcode::from_repr((u16::from(sub) << 8) | u16::from(first))
        } else {
            Opcode::from_repr(u16::from(first))
        }
    }

    /// The numeric value of this opcode.
    #[must_use]
    pub const fn value(self) -> u16 {
        self as u16
    }

    /// The prefix byte, if this is a prefixed opcode.
    #[must_use]
    pub const fn prefix(self) -> Option<u8> {
        if self.format().is_prefixed() {
            Some((self as u16 & 0xff) as u8)
        } else {
            None
        }
    }

    /// The opcode byte, or the sub-opcode byte for prefixed opcodes.
    #[must_use]
    pub const fn sub_opcode(self) -> u8 {
        if self.format().is_prefixed() {
            (self as u16 >> 8) as u8
        } else {
            self as u16 as u8
        }
    }

    /// The bytes that introduce this opcode in an instruction stream.
    #[must_use]
    pub fn encoding(self) -> Vec<u8> {
        match self.prefix() {
            Some(prefix) => vec![prefix, self.sub_opcode()],
            None => vec![self.sub_opcode()],
        }
    }

    /// Encoded size of an instruction with this opcode.
    #[must_use]
    pub fn size(self) -> usize {
        self.format().size()
    }

    /// Returns `true` if the opcode has `flag`.
    #[must_use]
    pub fn has_flag(self, flag: InstructionFlags) -> bool {
        self.flags().contains(flag)
    }

    /// Name of the opcode variant, for diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Number of opcodes in the instruction set.
    #[must_use]
    pub const fn total() -> usize {
        Opcode::COUNT
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
