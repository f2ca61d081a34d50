//! Instruction decoding, encoding and static opcode metadata.
//!
//! # Key Types
//! - [`BytecodeInstruction`] - Read-only cursor over a method's code block
//! - [`Instructions`] - Iterator adaptor over a whole code block
//! - [`BytecodeEncoder`] - Builds encoded instruction streams
//! - [`BytecodeMetaData`] / [`Bytecodes`] - Per-opcode flags consulted by the collector
//!
//! # Example
//! ```rust
//! use abcscope::bytecode::{BytecodeEncoder, Instructions};
//! use abcscope::isa::Opcode;
//!
//! let mut encoder = BytecodeEncoder::new();
//! encoder.emit(Opcode::LdaStrId16, &[0])?.emit(Opcode::Return, &[])?;
//! let code = encoder.finish();
//!
//! let no_gc = Instructions::new(&code)
//!     .map(|inst| inst.and_then(|inst| inst.metadata()).map(|meta| meta.is_no_gc()))
//!     .collect::<abcscope::Result<Vec<bool>>>()?;
//! assert_eq!(no_gc, vec![true, true]);
//! # Ok::<(), abcscope::Error>(())
//! ```

mod cursor;
mod encoder;
mod metadata;

pub use cursor::{BytecodeInstruction, Instructions};
pub use encoder::BytecodeEncoder;
pub use metadata::{BytecodeFlags, BytecodeKind, BytecodeMetaData, Bytecodes};
