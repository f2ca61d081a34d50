//! Collector configuration
//!
//! Controls which auxiliary indices the collector builds while it walks a file. The
//! per-method scan itself (pc offsets and call flags) always runs.

/// Configuration for a [`crate::collector::BytecodeInfoCollector`] run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Resolve literal arrays referenced by class definitions and array/object literals,
    /// registering the methods embedded in them
    pub collect_literal_methods: bool,

    /// Record the bytecode indices of class-definition instructions
    pub record_class_definitions: bool,

    /// Maximum number of literal arrays one literal expansion may visit (default: 4096)
    /// Exceeding it fails the scan with [`crate::Error::RecursionLimit`]
    pub max_literal_arrays: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            collect_literal_methods: true,
            record_class_definitions: true,
            max_literal_arrays: 4096,
        }
    }
}

impl CollectorConfig {
    /// Creates a minimal configuration
    ///
    /// Only pc offsets, call flags and directly defined inner methods are collected.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            collect_literal_methods: false,
            record_class_definitions: false,
            max_literal_arrays: 0,
        }
    }

    /// Creates a configuration with every index enabled and a tight literal bound
    #[must_use]
    pub fn strict() -> Self {
        Self {
            collect_literal_methods: true,
            record_class_definitions: true,
            max_literal_arrays: 256,
        }
    }
}
