use thiserror::Error;

use crate::file::EntityId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The collection pipeline runs over binaries that were already verified by a file-format
/// checker. Every error below is therefore treated as fatal for the file being analysed: it is
/// propagated to the caller of the top-level entry point and no partial result is produced.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::Malformed`] - Inconsistent file or instruction stream
/// - [`Error::OutOfBounds`] - Attempted to read beyond a buffer
/// - [`Error::UnknownOpcode`] - An opcode byte with no instruction-set entry
///
/// ## File Model Errors
/// - [`Error::EntityNotFound`] - An entity id the reader does not know
/// - [`Error::MissingCode`] - A method that should carry a code block has none
/// - [`Error::InvalidFunctionKind`] - Unknown raw function kind
///
/// ## Analysis Errors
/// - [`Error::RecursionLimit`] - Literal worklist exceeded its configured bound
///
/// # Examples
///
/// ```rust
/// use abcscope::{Error, bytecode::BytecodeInstruction};
///
/// let code = [0xf0];
/// match BytecodeInstruction::begin(&code).opcode() {
///     Err(Error::UnknownOpcode { opcode, .. }) => assert_eq!(opcode, 0xf0),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file or instruction stream is damaged and could not be processed.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The opcode byte (or prefix/sub-opcode pair) is not part of the instruction set.
    #[error("Unknown opcode 0x{opcode:02x} (prefix {prefix:?}) at offset {offset}")]
    UnknownOpcode {
        /// The prefix byte, if the instruction was prefixed
        prefix: Option<u8>,
        /// The (sub-)opcode byte
        opcode: u8,
        /// Byte offset of the instruction inside its code block
        offset: usize,
    },

    /// The binary reader has no entity with this id.
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// A method that must carry bytecode has no code block.
    #[error("Method {0} has no code block")]
    MissingCode(EntityId),

    /// The raw function kind of a method is outside the known range.
    #[error("Invalid function kind - 0x{0:02x}")]
    InvalidFunctionKind(u8),

    /// Recursion limit reached.
    ///
    /// Literal arrays can reference further literal arrays. The worklist that expands them
    /// is bounded; this error reports the bound that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
