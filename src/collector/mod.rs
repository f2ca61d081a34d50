//! Bytecode information collection.
//!
//! This module walks the method bodies of a panda file and builds the per-file
//! [`BytecodeInfo`] an ahead-of-time or just-in-time compiler consumes: the instruction
//! offsets of every method, the registry of every method the file defines (including closures,
//! class members and methods embedded in literal buffers), the positions of class definitions
//! and the call flags of each method.
//!
//! # Architecture
//!
//! - [`BytecodeInfoCollector`] - Drives a scan, either over the whole file or one method
//! - [`BytecodeInfo`] - Result container, with the [`MethodRegistry`]
//! - [`InnerMethodExtractor`] - Bounded expansion of literal arrays
//! - [`classify`] - What one opcode means to the collector
//! - [`InstructionRecorder`] / [`MethodMatcher`] - Hooks for snapshot and profile consumers
//!
//! # Call flags
//!
//! Every scanned method gets four flags, derived from its instructions:
//!
//! - *can fast call*: no instruction needs the generic calling convention (generator
//!   resumption, argument-forwarding super calls, `arguments`/rest materialisation) and no
//!   instruction names the `new.target` register as an operand
//! - *can typed call*: no instruction materialises or forwards the argument list
//! - *no GC*: every instruction is free of allocations
//! - *has debugger statement*: at least one `debugger` instruction
//!
//! # Examples
//!
//! ```rust
//! use abcscope::bytecode::BytecodeEncoder;
//! use abcscope::collector::{BytecodeInfoCollector, CollectorConfig, Discovery};
//! use abcscope::file::MemoryFileBuilder;
//! use abcscope::isa::Opcode;
//!
//! let mut builder = MemoryFileBuilder::new("app.abc");
//! let class = builder.add_class("Lapp;", false);
//! let main = builder.add_method(class, "func_main_0");
//! let closure = builder.add_method(class, "closure");
//! let index = builder.index_entity(closure)?;
//!
//! let mut code = BytecodeEncoder::new();
//! code.emit(Opcode::DefineFuncImm8Id16Imm8, &[0, i64::from(index), 0])?
//!     .emit(Opcode::ReturnUndefined, &[])?;
//! builder.set_code(main, 0, 3, code.finish());
//!
//! let mut code = BytecodeEncoder::new();
//! code.emit(Opcode::ReturnUndefined, &[])?;
//! builder.set_code(closure, 0, 3, code.finish());
//!
//! let file = builder.build();
//! let analysis = BytecodeInfoCollector::new(&file, CollectorConfig::default()).collect()?;
//!
//! let info = analysis.bytecode_info.method_info(closure.offset()).unwrap();
//! assert_eq!(info.discovery(), Discovery::DefineFunction);
//! assert!(info.is_scanned());
//! assert_eq!(analysis.bytecode_info.main_method("app"), Some(main.offset()));
//! # Ok::<(), abcscope::Error>(())
//! ```

mod classify;
mod config;
mod info;
mod literal;
mod recorder;

pub use classify::{classify, Classification, InnerReference};
pub use config::CollectorConfig;
pub use info::{
    BytecodeInfo, Discovery, FastCallInfo, MethodInfo, MethodPcInfo, MethodRegistry,
};
pub use literal::InnerMethodExtractor;
pub use recorder::{InstructionRecorder, MethodMatcher};

use std::sync::Arc;

use log::{debug, info, trace};

use crate::{
    bytecode::BytecodeInstruction,
    file::{is_entry_or_patch, parse_entry_point, CodeData, EntityId, LiteralRef, PandaFile},
    isa::InstructionFlags,
    method::{MethodLiteral, MethodLiterals},
    Error, Result,
};

/// Output of a full-file collection.
#[derive(Debug)]
pub struct Analysis {
    /// Everything collected from the file
    pub bytecode_info: BytecodeInfo,
    /// One literal per enumerated method, in enumeration order
    pub methods: MethodLiterals,
}

/// Walks the methods of a [`PandaFile`] and fills a [`BytecodeInfo`].
///
/// A collector is either consumed by [`BytecodeInfoCollector::collect`], which enumerates
/// every class of the file, or fed single methods through
/// [`BytecodeInfoCollector::process_method`], which is how a just-in-time compiler uses it.
pub struct BytecodeInfoCollector<'a, F: PandaFile + ?Sized> {
    file: &'a F,
    config: CollectorConfig,
    info: BytecodeInfo,
    snapshot_recorder: Option<&'a mut dyn InstructionRecorder>,
    pgo_recorder: Option<&'a mut dyn InstructionRecorder>,
    matcher: Option<&'a mut dyn MethodMatcher>,
}

impl<'a, F: PandaFile + ?Sized> BytecodeInfoCollector<'a, F> {
    /// Create a collector over `file`.
    #[must_use]
    pub fn new(file: &'a F, config: CollectorConfig) -> Self {
        BytecodeInfoCollector {
            file,
            config,
            info: BytecodeInfo::new(),
            snapshot_recorder: None,
            pgo_recorder: None,
            matcher: None,
        }
    }

    /// Forward every scanned instruction to a snapshot constant-pool builder.
    #[must_use]
    pub fn with_snapshot_recorder(mut self, recorder: &'a mut dyn InstructionRecorder) -> Self {
        self.snapshot_recorder = Some(recorder);
        self
    }

    /// Forward every scanned instruction to a profile decoder.
    #[must_use]
    pub fn with_pgo_recorder(mut self, recorder: &'a mut dyn InstructionRecorder) -> Self {
        self.pgo_recorder = Some(recorder);
        self
    }

    /// Match every enumerated method against profile data.
    #[must_use]
    pub fn with_method_matcher(mut self, matcher: &'a mut dyn MethodMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// The information collected so far.
    #[must_use]
    pub fn bytecode_info(&self) -> &BytecodeInfo {
        &self.info
    }

    /// Finish a single-method session.
    #[must_use]
    pub fn into_bytecode_info(self) -> BytecodeInfo {
        self.info
    }

    /// Scan every method of every local class of the file.
    ///
    /// A method listed by several classes is scanned once; later occurrences reuse its pc
    /// info and copy its call flags.
    ///
    /// Abstract and native methods are enumerated and registered but not scanned.
    ///
    /// # Errors
    /// Fails on the first malformed class, method or instruction, and with
    /// [`Error::MissingCode`] for any other enumerated method without a code block. No partial
    /// result is returned.
    pub fn collect(mut self) -> Result<Analysis> {
        let methods = self.process_classes()?;
        Ok(Analysis {
            bytecode_info: self.info,
            methods,
        })
    }

    /// Scan a single method, unless this session already scanned it.
    ///
    /// The call flags of `literal` are updated in place. An abstract or native method is
    /// registered without being scanned.
    ///
    /// # Errors
    /// Fails if the method's class or code cannot be read, or on a malformed instruction.
    pub fn process_method(&mut self, literal: &mut MethodLiteral) -> Result<()> {
        let file = self.file;
        let method = literal.method_id();
        let offset = method.offset();

        if self.info.scanned_pc_info(offset).is_some() {
            debug!("Method {} already scanned", method);
            return Ok(());
        }

        let class = file.method_class(method)?;
        let record = self
            .info
            .intern(parse_entry_point(file.class_descriptor(class)?)?);
        self.info.push_record_name(Arc::clone(&record));

        let Some(code) = self.code_of(method)? else {
            self.info
                .registry_mut()
                .register(offset, &record, Discovery::Enumerated);
            debug!("Method {} has no body, not scanned", method);
            return Ok(());
        };
        let index = self.collect_method_pcs(code.instructions, literal, &record)?;
        self.info
            .registry_mut()
            .set_pc_info_index(offset, index, &record);
        Ok(())
    }

    fn process_classes(&mut self) -> Result<MethodLiterals> {
        let file = self.file;
        let mut methods = MethodLiterals::with_capacity(file.num_methods()?);

        for class in file.classes()? {
            if file.is_external(class)? {
                continue;
            }

            let record = self
                .info
                .intern(parse_entry_point(file.class_descriptor(class)?)?);

            for method in file.class_methods(class)? {
                let mut literal = MethodLiteral::from_file(file, method)?;
                let name = file.method_name(method)?;
                let offset = method.offset();

                if is_entry_or_patch(name) {
                    self.info.set_main_method(Arc::clone(&record), offset);
                    self.info.push_record_name(Arc::clone(&record));
                }

                if let Some(matcher) = self.matcher.as_deref_mut() {
                    matcher.match_and_mark(&record, name, method);
                }

                match self.info.scanned_pc_info(offset) {
                    Some(index) => {
                        if let Some(first) = methods.by_offset(offset) {
                            literal.copy_call_flags(first);
                        }
                        trace!("Method {} listed again, reusing pc info {}", method, index);
                    }
                    None => match self.code_of(method)? {
                        Some(code) => {
                            let index =
                                self.collect_method_pcs(code.instructions, &mut literal, &record)?;
                            self.info
                                .registry_mut()
                                .set_pc_info_index(offset, index, &record);
                        }
                        None => {
                            self.info
                                .registry_mut()
                                .register(offset, &record, Discovery::Enumerated);
                            trace!("Method {} is abstract or native", method);
                        }
                    },
                }

                methods.push(literal);
            }
        }

        info!(
            "Total number of methods in file: {} is: {}",
            file.filename(),
            methods.len()
        );
        Ok(methods)
    }

    /// The code block of `method`, or `None` if it is abstract or native.
    fn code_of(&self, method: EntityId) -> Result<Option<CodeData<'a>>> {
        let file = self.file;
        match file.method_code(method)? {
            Some(code) => file.code(code).map(Some),
            None if file.method_is_abstract_or_native(method)? => Ok(None),
            None => Err(Error::MissingCode(method)),
        }
    }

    fn collect_method_pcs(
        &mut self,
        code: &[u8],
        literal: &mut MethodLiteral,
        record: &Arc<str>,
    ) -> Result<usize> {
        let method = literal.method_id();
        let new_target = literal.new_target_vreg_index();

        let mut pc_info = MethodPcInfo::new(code.len());
        let mut can_fast_call = true;
        let mut can_typed_call = true;
        let mut no_gc = true;
        let mut has_debugger_stmt = false;

        let mut inst = BytecodeInstruction::begin(code);
        let end = inst.jump_to(code.len());
        let mut bc_index = 0;

        while inst.address() < end.address() {
            let metadata = inst.metadata()?;

            let (fast, typed) =
                self.collect_method_info_from_bc(&inst, method, bc_index, record)?;
            can_fast_call &= fast && !is_vreg_used(&inst, new_target)?;
            can_typed_call &= typed;

            if let Some(recorder) = self.snapshot_recorder.as_deref_mut() {
                recorder.record(record, method, bc_index, &inst);
            }
            if let Some(recorder) = self.pgo_recorder.as_deref_mut() {
                recorder.record(record, method, bc_index, &inst);
            }

            no_gc &= metadata.is_no_gc();
            has_debugger_stmt |= metadata.has_debugger_stmt();

            pc_info.push(inst.address());
            inst = inst.next()?;
            bc_index += 1;
        }

        let offset = method.offset();
        let index = self.info.push_pc_info(offset, pc_info);
        self.info.set_fast_call(
            offset,
            FastCallInfo {
                can_fast_call,
                no_gc,
            },
        );
        literal.set_call_flags(can_fast_call, no_gc, has_debugger_stmt, can_typed_call);

        debug!(
            "Scanned {} ({}): {} instructions, fast call {}, typed call {}, no gc {}",
            method, record, bc_index, can_fast_call, can_typed_call, no_gc
        );
        Ok(index)
    }

    /// Handle the method references of one instruction and report whether it keeps its method
    /// eligible for fast and typed calls.
    fn collect_method_info_from_bc(
        &mut self,
        inst: &BytecodeInstruction<'_>,
        method: EntityId,
        bc_index: usize,
        record: &Arc<str>,
    ) -> Result<(bool, bool)> {
        let opcode = inst.opcode()?;
        if opcode.has_flag(InstructionFlags::STRING_ID) && inst.has_id(0)? {
            return Ok((true, true));
        }

        let outer = method.offset();
        self.info
            .registry_mut()
            .register(outer, record, Discovery::Enumerated);

        let classification = classify(opcode);
        match classification.reference {
            InnerReference::None => {}
            InnerReference::DefineFunction => {
                let inner = self.file.resolve_method_index(method, id16(inst, 0)?)?;
                self.register_inner(outer, inner, record, Discovery::DefineFunction);
            }
            InnerReference::DefineClass => {
                let constructor = self.file.resolve_method_index(method, id16(inst, 0)?)?;
                self.register_inner(outer, constructor, record, Discovery::ClassDefinition);

                if self.config.record_class_definitions {
                    self.info.record_class_def(outer, bc_index);
                }
                if self.config.collect_literal_methods {
                    let members = self.file.resolve_literal_index(method, id16(inst, 1)?)?;
                    self.collect_literal_methods(
                        outer,
                        LiteralRef::Entity(members),
                        record,
                        Discovery::ClassDefinition,
                    )?;
                }
            }
            InnerReference::LiteralArray => {
                if self.config.collect_literal_methods {
                    let literal = self.file.resolve_literal_index(method, id16(inst, 0)?)?;
                    self.collect_literal_methods(
                        outer,
                        LiteralRef::Entity(literal),
                        record,
                        Discovery::LiteralBuffer,
                    )?;
                }
            }
            InnerReference::LegacyLiteralArray => {
                if self.config.collect_literal_methods {
                    let index = u32::try_from(inst.imm_data(0)?).map_err(|_| {
                        malformed_error!("Literal index out of range at {}", inst.address())
                    })?;
                    self.collect_literal_methods(
                        outer,
                        LiteralRef::Index(index),
                        record,
                        Discovery::LiteralBuffer,
                    )?;
                }
            }
        }

        Ok((
            !classification.defeats_fast_call,
            !classification.defeats_typed_call,
        ))
    }

    fn collect_literal_methods(
        &mut self,
        outer: u32,
        literal: LiteralRef,
        record: &Arc<str>,
        discovery: Discovery,
    ) -> Result<()> {
        let inner = InnerMethodExtractor::new(self.file, self.config.max_literal_arrays)
            .extract(literal)?;
        for method in inner {
            self.register_inner(outer, method, record, discovery);
        }
        Ok(())
    }

    fn register_inner(
        &mut self,
        outer: u32,
        inner: EntityId,
        record: &Arc<str>,
        discovery: Discovery,
    ) {
        let registry = self.info.registry_mut();
        registry.register(inner.offset(), record, discovery);
        registry.add_inner_method(outer, inner.offset());
        trace!("Inner method {} of 0x{:08x} ({:?})", inner, outer, discovery);
    }
}

fn id16(inst: &BytecodeInstruction<'_>, index: usize) -> Result<u16> {
    let id = inst.id(index)?;
    u16::try_from(id).map_err(|_| malformed_error!("Id operand 0x{:x} is wider than 16 bits", id))
}

/// Returns `true` if one of the register operands of `inst` is the `new.target` register.
fn is_vreg_used(inst: &BytecodeInstruction<'_>, new_target: u32) -> Result<bool> {
    if new_target == 0 {
        return Ok(false);
    }

    for index in 0..inst.vreg_count()? {
        if u32::from(inst.vreg(index)?) == new_target {
            return Ok(true);
        }
    }
    Ok(false)
}
