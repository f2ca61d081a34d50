//! # abcscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! of the abcscope library. Import it to get quick access to everything a collection run needs.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all abcscope operations
pub use crate::Error;

/// The result type used throughout abcscope
pub use crate::Result;

/// Parallel multi-file entry point
pub use crate::collect_files;

// ================================================================================================
// Instruction Set and Decoding
// ================================================================================================

/// Opcodes, formats and instruction flags
pub use crate::isa::{Format, InstructionFlags, Opcode};

/// Instruction cursor, metadata and encoder
pub use crate::bytecode::{
    BytecodeEncoder, BytecodeFlags, BytecodeInstruction, BytecodeKind, BytecodeMetaData,
    Bytecodes,
};

// ================================================================================================
// File Model
// ================================================================================================

/// Panda-file access
pub use crate::file::{
    CodeData, EntityId, FunctionKind, LiteralArray, LiteralRef, MemoryFile, MemoryFileBuilder,
    PandaFile,
};

// ================================================================================================
// Methods and Collection
// ================================================================================================

/// Method literals
pub use crate::method::{MethodFlags, MethodHandle, MethodLiteral, MethodLiterals};

/// The collector and its results
pub use crate::collector::{
    Analysis, BytecodeInfo, BytecodeInfoCollector, CollectorConfig, Discovery, FastCallInfo,
    InstructionRecorder, MethodInfo, MethodMatcher, MethodPcInfo, MethodRegistry,
};
