//! Per-method descriptors produced by the collector.
//!
//! A [`MethodLiteral`] is the compiler-facing description of one method: its register
//! layout, closure kind and the call flags computed while scanning its body. Full-file
//! scans store them in a [`MethodLiterals`] arena sized up front from the file's method
//! count and addressed by [`MethodHandle`].

use std::collections::HashMap;

use bitflags::bitflags;

use crate::{
    file::{EntityId, FunctionKind, PandaFile},
    Result,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Properties of a method
    pub struct MethodFlags: u8 {
        /// Sendable function, shareable between concurrent instances
        const SHARED = 0x01;
        /// Eligible for fast-call dispatch
        const FAST_CALL = 0x02;
        /// No instruction of the body can trigger a garbage collection
        const NO_GC = 0x04;
        /// The body contains a `debugger` statement
        const DEBUGGER_STMT = 0x08;
        /// Eligible for typed calls
        const TYPED_CALL = 0x10;
    }
}

/// Compiler-facing description of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLiteral {
    method_id: EntityId,
    num_vregs: u32,
    num_args: u32,
    function_kind: FunctionKind,
    flags: MethodFlags,
}

impl MethodLiteral {
    /// Create a literal with no call flags set.
    #[must_use]
    pub fn new(
        method_id: EntityId,
        num_vregs: u32,
        num_args: u32,
        function_kind: FunctionKind,
        shared: bool,
    ) -> Self {
        let mut flags = MethodFlags::empty();
        flags.set(MethodFlags::SHARED, shared);

        MethodLiteral {
            method_id,
            num_vregs,
            num_args,
            function_kind,
            flags,
        }
    }

    /// Read the literal of `method` from `file`.
    ///
    /// Register and argument counts come from the method's code block; methods without one
    /// report zero for both.
    ///
    /// # Errors
    /// Fails if the method or its code block cannot be read, or with
    /// [`crate::Error::InvalidFunctionKind`] for an unknown function kind.
    pub fn from_file<F: PandaFile + ?Sized>(file: &F, method: EntityId) -> Result<Self> {
        let (function_kind, shared) = FunctionKind::decode(file.method_function_kind(method)?)?;

        let (num_vregs, num_args) = match file.method_code(method)? {
            Some(code) => {
                let code = file.code(code)?;
                (code.num_vregs, code.num_args)
            }
            None => (0, 0),
        };

        Ok(MethodLiteral::new(
            method,
            num_vregs,
            num_args,
            function_kind,
            shared,
        ))
    }

    /// Entity id of the method.
    #[must_use]
    pub fn method_id(&self) -> EntityId {
        self.method_id
    }

    /// File offset of the method.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.method_id.offset()
    }

    /// Number of local registers.
    #[must_use]
    pub fn num_vregs(&self) -> u32 {
        self.num_vregs
    }

    /// Number of arguments, including the implicit ones.
    #[must_use]
    pub fn num_args(&self) -> u32 {
        self.num_args
    }

    /// Closure kind.
    #[must_use]
    pub fn function_kind(&self) -> FunctionKind {
        self.function_kind
    }

    /// All flags.
    #[must_use]
    pub fn flags(&self) -> MethodFlags {
        self.flags
    }

    /// Sendable function.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.flags.contains(MethodFlags::SHARED)
    }

    /// Eligible for fast-call dispatch.
    #[must_use]
    pub fn can_fast_call(&self) -> bool {
        self.flags.contains(MethodFlags::FAST_CALL)
    }

    /// No instruction can trigger a garbage collection.
    #[must_use]
    pub fn is_no_gc(&self) -> bool {
        self.flags.contains(MethodFlags::NO_GC)
    }

    /// Contains a `debugger` statement.
    #[must_use]
    pub fn has_debugger_stmt(&self) -> bool {
        self.flags.contains(MethodFlags::DEBUGGER_STMT)
    }

    /// Eligible for typed calls.
    #[must_use]
    pub fn can_typed_call(&self) -> bool {
        self.flags.contains(MethodFlags::TYPED_CALL)
    }

    /// Register holding `new.target`, or 0 if the method has none.
    ///
    /// Methods taking the implicit `func, new.target, this` arguments keep them right after
    /// their locals, so `new.target` lives in register `num_vregs + 1`.
    #[must_use]
    pub fn new_target_vreg_index(&self) -> u32 {
        if self.num_args >= 3 {
            self.num_vregs + 1
        } else {
            0
        }
    }

    pub(crate) fn set_call_flags(
        &mut self,
        can_fast_call: bool,
        no_gc: bool,
        has_debugger_stmt: bool,
        can_typed_call: bool,
    ) {
        self.flags.set(MethodFlags::FAST_CALL, can_fast_call);
        self.flags.set(MethodFlags::NO_GC, no_gc);
        self.flags.set(MethodFlags::DEBUGGER_STMT, has_debugger_stmt);
        self.flags.set(MethodFlags::TYPED_CALL, can_typed_call);
    }

    pub(crate) fn copy_call_flags(&mut self, other: &MethodLiteral) {
        self.set_call_flags(
            other.can_fast_call(),
            other.is_no_gc(),
            other.has_debugger_stmt(),
            other.can_typed_call(),
        );
    }
}

/// Index of a [`MethodLiteral`] inside a [`MethodLiterals`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodHandle(pub u32);

/// Append-only storage for the method literals of one file.
#[derive(Debug, Default, Clone)]
pub struct MethodLiterals {
    literals: Vec<MethodLiteral>,
    by_offset: HashMap<u32, MethodHandle>,
}

impl MethodLiterals {
    /// Create an arena with room for `capacity` literals.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        MethodLiterals {
            literals: Vec::with_capacity(capacity),
            by_offset: HashMap::with_capacity(capacity),
        }
    }

    /// Append a literal and return its handle.
    ///
    /// Offset lookups keep resolving to the first literal pushed for an offset.
    pub fn push(&mut self, literal: MethodLiteral) -> MethodHandle {
        let handle = MethodHandle(self.literals.len() as u32);
        self.by_offset.entry(literal.offset()).or_insert(handle);
        self.literals.push(literal);
        handle
    }

    /// The literal behind `handle`.
    #[must_use]
    pub fn get(&self, handle: MethodHandle) -> Option<&MethodLiteral> {
        self.literals.get(handle.0 as usize)
    }

    /// Mutable access to the literal behind `handle`.
    pub fn get_mut(&mut self, handle: MethodHandle) -> Option<&mut MethodLiteral> {
        self.literals.get_mut(handle.0 as usize)
    }

    /// The first literal pushed for a method offset.
    #[must_use]
    pub fn by_offset(&self, offset: u32) -> Option<&MethodLiteral> {
        self.by_offset
            .get(&offset)
            .and_then(|handle| self.get(*handle))
    }

    /// Handle of the first literal pushed for a method offset.
    #[must_use]
    pub fn handle_of(&self, offset: u32) -> Option<MethodHandle> {
        self.by_offset.get(&offset).copied()
    }

    /// Number of stored literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Returns `true` if nothing was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Reserved slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.literals.capacity()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, MethodLiteral> {
        self.literals.iter()
    }
}

impl<'a> IntoIterator for &'a MethodLiterals {
    type Item = &'a MethodLiteral;
    type IntoIter = std::slice::Iter<'a, MethodLiteral>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
