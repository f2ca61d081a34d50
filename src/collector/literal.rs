//! Discovery of methods embedded in literal arrays.
//!
//! Class definitions and array/object literals reference literal arrays whose values may be
//! methods, and literal arrays may reference further literal arrays. [`InnerMethodExtractor`]
//! expands such a tree with an explicit FIFO worklist. Every literal array is visited at most
//! once, so cyclic references terminate, and the number of visited arrays is bounded.

use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::{
    file::{EntityId, LiteralRef, PandaFile},
    Error, Result,
};

/// Expands a literal array into the methods it embeds.
pub struct InnerMethodExtractor<'a, F: PandaFile + ?Sized> {
    file: &'a F,
    max_literal_arrays: usize,
}

impl<'a, F: PandaFile + ?Sized> InnerMethodExtractor<'a, F> {
    /// Create an extractor visiting at most `max_literal_arrays` literal arrays per call.
    #[must_use]
    pub fn new(file: &'a F, max_literal_arrays: usize) -> Self {
        InnerMethodExtractor {
            file,
            max_literal_arrays,
        }
    }

    /// All methods reachable from `root`, each reported once, in breadth-first discovery
    /// order.
    ///
    /// # Errors
    /// Returns [`Error::RecursionLimit`] if more literal arrays than allowed are reachable,
    /// or fails if a literal array cannot be read.
    pub fn extract(&self, root: LiteralRef) -> Result<Vec<EntityId>> {
        let mut worklist = VecDeque::from([root]);
        let mut visited = HashSet::new();
        let mut seen = HashSet::new();
        let mut methods = Vec::new();

        while let Some(literal) = worklist.pop_front() {
            if !visited.insert(literal) {
                continue;
            }
            if visited.len() > self.max_literal_arrays {
                return Err(Error::RecursionLimit(self.max_literal_arrays));
            }

            let array = self.file.literal_array(literal)?;
            trace!(
                "Literal {:?}: {} methods, {} nested",
                literal,
                array.methods.len(),
                array.nested.len()
            );

            for method in array.methods {
                if seen.insert(method) {
                    methods.push(method);
                }
            }
            worklist.extend(array.nested);
        }

        Ok(methods)
    }
}
