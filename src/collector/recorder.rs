//! Hooks for consumers that observe a scan.
//!
//! Snapshot constant-pool builders and profile decoders piggyback on the collector's single
//! pass over every method body instead of decoding the file a second time. They plug in
//! through these traits; the collector calls them for every instruction and method it sees.

use crate::{bytecode::BytecodeInstruction, file::EntityId};

/// Observer of every decoded instruction.
pub trait InstructionRecorder {
    /// Called once per instruction, in program order.
    ///
    /// `bc_index` is the position of the instruction inside its method.
    fn record(
        &mut self,
        record_name: &str,
        method: EntityId,
        bc_index: usize,
        inst: &BytecodeInstruction<'_>,
    );
}

/// Matcher of enumerated methods against profile data.
pub trait MethodMatcher {
    /// Called once for every method enumerated by a full-file scan.
    fn match_and_mark(&mut self, record_name: &str, method_name: &str, method: EntityId);
}

impl<F> InstructionRecorder for F
where
    F: FnMut(&str, EntityId, usize, &BytecodeInstruction<'_>),
{
    fn record(
        &mut self,
        record_name: &str,
        method: EntityId,
        bc_index: usize,
        inst: &BytecodeInstruction<'_>,
    ) {
        self(record_name, method, bc_index, inst);
    }
}
