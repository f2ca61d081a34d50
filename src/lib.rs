// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # abcscope
//!
//! Static analysis of Ark bytecode (`.abc`) files. `abcscope` walks every method body of a
//! panda file once and collects what an ahead-of-time or just-in-time compiler needs before it
//! can compile anything: instruction offsets, the registry of all methods the file defines,
//! class-definition positions and per-method call flags.
//!
//! ## Features
//!
//! - **Instruction decoding** - Opcode table for the full Ark instruction set, including the
//!   `callruntime`, `deprecated`, `wide` and `throw` prefix groups
//! - **Method discovery** - Closures, class constructors and members, and methods embedded in
//!   (possibly nested) literal buffers
//! - **Call flags** - Fast-call, typed-call, no-GC and debugger-statement analysis per method
//! - **Two modes** - Whole-file collection and incremental single-method collection
//! - **Parallel batches** - Independent files analysed on the `rayon` thread pool
//!
//! ## Quick Start
//!
//! ```rust
//! use abcscope::prelude::*;
//!
//! let mut builder = MemoryFileBuilder::new("hello.abc");
//! let class = builder.add_class("Lhello;", false);
//! let main = builder.add_method(class, "func_main_0");
//!
//! let mut code = BytecodeEncoder::new();
//! code.emit(Opcode::LdaiImm32, &[42])?
//!     .emit(Opcode::Debugger, &[])?
//!     .emit(Opcode::Return, &[])?;
//! builder.set_code(main, 1, 3, code.finish());
//! let file = builder.build();
//!
//! let analysis = BytecodeInfoCollector::new(&file, CollectorConfig::default()).collect()?;
//! let literal = analysis.methods.by_offset(main.offset()).unwrap();
//! assert!(literal.can_fast_call());
//! assert!(literal.has_debugger_stmt());
//!
//! let pc_info = analysis.bytecode_info.method_pc_info(main.offset()).unwrap();
//! assert_eq!(pc_info.pc_offsets(), &[0, 5, 6]);
//! # Ok::<(), abcscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`isa`] - Opcodes, operand formats and instruction flags
//! - [`bytecode`] - Instruction cursor, per-opcode metadata and an encoder
//! - [`file`] - The [`file::PandaFile`] model the collector reads from
//! - [`method`] - Method literals and their call flags
//! - [`collector`] - The collection pass itself
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Input files are expected to
//! be verified, so every error aborts the analysis of that file.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: a summary per file at `info`, one line per scanned
//! method at `debug` and inner-method discovery at `trace`. Install any logger to see it.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use abcscope::prelude::*;
///
/// let file = MemoryFileBuilder::new("empty.abc").build();
/// let analysis = BytecodeInfoCollector::new(&file, CollectorConfig::default()).collect()?;
/// assert!(analysis.methods.is_empty());
/// # Ok::<(), abcscope::Error>(())
/// ```
pub mod prelude;

/// Instruction-set definitions.
pub mod isa;

/// Instruction decoding and per-opcode metadata.
pub mod bytecode;

/// Panda-file object model.
pub mod file;

/// Method literals.
pub mod method;

/// The bytecode information collector.
pub mod collector;

use rayon::prelude::*;

/// `abcscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `abcscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// Bounds-checked byte cursor used by the instruction decoder.
pub use file::parser::Parser;

/// Analyse several files in parallel.
///
/// Each file gets its own collector running on the `rayon` thread pool; nothing is shared
/// between them. Results come back in input order.
///
/// # Errors
/// Returns the first error of any file.
///
/// # Example
///
/// ```rust
/// use abcscope::{collect_files, collector::CollectorConfig, file::MemoryFileBuilder};
///
/// let files: Vec<_> = (0..4)
///     .map(|i| MemoryFileBuilder::new(&format!("part{}.abc", i)).build())
///     .collect();
/// let analyses = collect_files(&files, CollectorConfig::default())?;
/// assert_eq!(analyses.len(), 4);
/// # Ok::<(), abcscope::Error>(())
/// ```
pub fn collect_files<F>(
    files: &[F],
    config: collector::CollectorConfig,
) -> Result<Vec<collector::Analysis>>
where
    F: file::PandaFile,
{
    files
        .par_iter()
        .map(|file| collector::BytecodeInfoCollector::new(file, config).collect())
        .collect()
}
