//! Panda-file object model consumed by the collector.
//!
//! The collector does not parse `.abc` containers itself. It walks a file through the
//! [`PandaFile`] trait, which exposes the few typed accessors the analysis needs: class and
//! method enumeration, code blocks, literal arrays and index resolution. Any reader that
//! implements the trait can be analysed; [`MemoryFile`] is an in-memory implementation used to
//! build files programmatically.
//!
//! # Key Components
//!
//! - [`crate::file::EntityId`] - Offset-based entity reference
//! - [`crate::file::PandaFile`] - Read-only accessor trait over a panda file
//! - [`crate::file::CodeData`] - A method's code block
//! - [`crate::file::LiteralRef`] / [`crate::file::LiteralArray`] - Literal buffers and the methods they embed
//! - [`crate::file::FunctionKind`] - Closure kind of a method
//! - [`crate::file::parser::Parser`] - Bounds-checked byte cursor
//! - [`crate::file::io`] - Little-endian primitive decoding
//!
//! # Examples
//!
//! ```rust
//! use abcscope::file::{MemoryFileBuilder, PandaFile};
//!
//! let mut builder = MemoryFileBuilder::new("demo.abc");
//! let class = builder.add_class("Lcom/demo/Main;", false);
//! let method = builder.add_method(class, "func_main_0");
//! builder.set_code(method, 1, 3, vec![0x65]);
//! let file = builder.build();
//!
//! assert_eq!(file.classes()?, vec![class]);
//! assert_eq!(file.method_name(method)?, "func_main_0");
//! assert_eq!(file.num_methods()?, 1);
//! # Ok::<(), abcscope::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! [`PandaFile`] requires `Send + Sync`, so one reader can be analysed from a worker thread
//! while other files are processed concurrently.

pub mod io;
pub mod parser;

mod entity;
mod memory;

pub use entity::EntityId;
pub use memory::{MemoryFile, MemoryFileBuilder};

use crate::{Error, Result};

/// A method's code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeData<'a> {
    /// Number of local virtual registers
    pub num_vregs: u32,
    /// Number of arguments, including the implicit ones
    pub num_args: u32,
    /// The encoded instruction stream
    pub instructions: &'a [u8],
}

impl CodeData<'_> {
    /// Size of the instruction stream in bytes.
    #[must_use]
    pub fn code_size(&self) -> usize {
        self.instructions.len()
    }
}

/// Reference to a literal array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralRef {
    /// Legacy encoding: index into the file's literal-array table
    Index(u32),
    /// Current encoding: entity id of the literal array
    Entity(EntityId),
}

/// The method-relevant content of a literal array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralArray {
    /// Methods stored as literal values, in literal order
    pub methods: Vec<EntityId>,
    /// Literal arrays referenced from this one
    pub nested: Vec<LiteralRef>,
}

/// Read-only access to the entities of a panda file.
///
/// All accessors fail with [`Error::EntityNotFound`] when passed an id the file does not
/// know.
pub trait PandaFile: Send + Sync {
    /// A name identifying the file in diagnostics.
    fn filename(&self) -> &str;

    /// All classes of the file, in file order.
    ///
    /// # Errors
    /// Returns an error if the class index cannot be read.
    fn classes(&self) -> Result<Vec<EntityId>>;

    /// Returns `true` if the class is only declared by this file.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown class.
    fn is_external(&self, class: EntityId) -> Result<bool>;

    /// The mangled descriptor of a class, e.g. `Lcom/demo/Main;`.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown class.
    fn class_descriptor(&self, class: EntityId) -> Result<&str>;

    /// The methods of a class, in declaration order.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown class.
    fn class_methods(&self, class: EntityId) -> Result<Vec<EntityId>>;

    /// The class declaring `method`.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown method.
    fn method_class(&self, method: EntityId) -> Result<EntityId>;

    /// The name of `method`.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown method.
    fn method_name(&self, method: EntityId) -> Result<&str>;

    /// The raw function-kind byte of `method`; see [`FunctionKind::decode`].
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown method.
    fn method_function_kind(&self, method: EntityId) -> Result<u8>;

    /// The code block of `method`, if it has one.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown method.
    fn method_code(&self, method: EntityId) -> Result<Option<EntityId>>;

    /// Returns `true` if `method` is abstract or native and so carries no bytecode.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown method.
    fn method_is_abstract_or_native(&self, method: EntityId) -> Result<bool>;

    /// The content of a code block.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown code block.
    fn code(&self, code: EntityId) -> Result<CodeData<'_>>;

    /// Resolve a 16-bit method operand of an instruction inside `method`.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] if the index does not resolve.
    fn resolve_method_index(&self, method: EntityId, index: u16) -> Result<EntityId>;

    /// Resolve a 16-bit literal-array operand of an instruction inside `method`.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] if the index does not resolve.
    fn resolve_literal_index(&self, method: EntityId, index: u16) -> Result<EntityId>;

    /// The methods and nested literal arrays of a literal array.
    ///
    /// # Errors
    /// Returns [`Error::EntityNotFound`] for an unknown literal array.
    fn literal_array(&self, literal: LiteralRef) -> Result<LiteralArray>;

    /// Total number of methods declared by all classes.
    ///
    /// # Errors
    /// Fails if a class cannot be enumerated.
    fn num_methods(&self) -> Result<usize> {
        let mut count = 0;
        for class in self.classes()? {
            count += self.class_methods(class)?.len();
        }
        Ok(count)
    }
}

/// Closure kind of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FunctionKind {
    /// Plain function or base class constructor
    #[default]
    BaseConstructor,
    /// Arrow function
    ArrowFunction,
    /// Generator function
    GeneratorFunction,
    /// Async function
    AsyncFunction,
    /// Async generator function
    AsyncGeneratorFunction,
    /// Async arrow function
    AsyncArrowFunction,
    /// Function executed on a concurrent worker
    ConcurrentFunction,
}

/// Bit of the raw function kind marking a sendable (shared) function.
pub const SENDABLE_FUNCTION_BIT: u8 = 0x08;

impl FunctionKind {
    /// Decode a raw function-kind byte into its kind and sendable marker.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFunctionKind`] for bytes outside the known encoding.
    pub fn decode(raw: u8) -> Result<(FunctionKind, bool)> {
        if raw & !(SENDABLE_FUNCTION_BIT | 0x07) != 0 {
            return Err(Error::InvalidFunctionKind(raw));
        }

        let kind = match raw & 0x07 {
            0 | 1 => FunctionKind::BaseConstructor,
            2 => FunctionKind::ArrowFunction,
            3 => FunctionKind::GeneratorFunction,
            4 => FunctionKind::AsyncFunction,
            5 => FunctionKind::AsyncGeneratorFunction,
            6 => FunctionKind::AsyncArrowFunction,
            _ => FunctionKind::ConcurrentFunction,
        };

        Ok((kind, raw & SENDABLE_FUNCTION_BIT != 0))
    }
}

/// Method names that mark a record's entry point or a patch entry.
pub const ENTRY_POINT_NAMES: [&str; 3] = ["func_main_0", "patch_main_0", "patch_main_1"];

/// Returns `true` if `name` is an entry or patch method name.
#[must_use]
pub fn is_entry_or_patch(name: &str) -> bool {
    ENTRY_POINT_NAMES.contains(&name)
}

/// Derive a record name from a class descriptor by stripping the `L` and `;` markers.
///
/// # Errors
/// Returns [`Error::Malformed`] if the descriptor is not of the form `L<name>;`.
pub fn parse_entry_point(descriptor: &str) -> Result<&str> {
    descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .ok_or_else(|| malformed_error!("Invalid class descriptor - {}", descriptor))
}
