//! Integration tests for the bytecode information collector.
//!
//! Every test builds a small panda file in memory, runs the collector over it and checks the
//! registry, pc infos, class-definition index and call flags it produced.

use abcscope::{prelude::*, Result};

fn body(instructions: &[(Opcode, &[i64])]) -> Result<Vec<u8>> {
    let mut encoder = BytecodeEncoder::new();
    for (opcode, operands) in instructions {
        encoder.emit(*opcode, operands)?;
    }
    Ok(encoder.finish())
}

fn collect(file: &MemoryFile) -> Result<Analysis> {
    BytecodeInfoCollector::new(file, CollectorConfig::default()).collect()
}

#[test]
fn test_plain_method() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("plain.abc");
    let class = builder.add_class("Lcom/demo/Plain;", false);
    let method = builder.add_method(class, "func_main_0");
    builder.set_code(
        method,
        1,
        3,
        body(&[
            (Opcode::LdaiImm32, &[7]),
            (Opcode::StaV8, &[0]),
            (Opcode::Return, &[]),
        ])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let info = &analysis.bytecode_info;

    let pc_info = info.method_pc_info(method.offset()).unwrap();
    assert_eq!(pc_info.pc_offsets(), &[0, 5, 7]);
    assert_eq!(pc_info.method_size(), 8);

    let literal = analysis.methods.by_offset(method.offset()).unwrap();
    assert!(literal.can_fast_call());
    assert!(literal.can_typed_call());
    assert!(literal.is_no_gc());
    assert!(!literal.has_debugger_stmt());

    let method_info = info.method_info(method.offset()).unwrap();
    assert!(method_info.is_scanned());
    assert_eq!(method_info.discovery(), Discovery::Enumerated);
    assert_eq!(&**method_info.record_name(), "com/demo/Plain");
    assert_eq!(info.main_method("com/demo/Plain"), Some(method.offset()));
    assert_eq!(
        info.fast_call_info(method.offset()),
        Some(FastCallInfo {
            can_fast_call: true,
            no_gc: true
        })
    );
    Ok(())
}

#[test]
fn test_string_load_and_return() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("strings.abc");
    let class = builder.add_class("Lapp;", false);
    let method = builder.add_method(class, "greet");
    builder.set_code(
        method,
        0,
        3,
        body(&[(Opcode::LdaStrId16, &[0]), (Opcode::Return, &[])])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let pc_info = analysis
        .bytecode_info
        .method_pc_info(method.offset())
        .unwrap();
    assert_eq!(pc_info.pc_offsets(), &[0, 3]);
    assert_eq!(pc_info.method_size(), 4);

    let literal = analysis.methods.by_offset(method.offset()).unwrap();
    assert!(literal.can_fast_call());
    assert!(literal.can_typed_call());
    assert!(literal.is_no_gc());
    assert_eq!(analysis.bytecode_info.registry().len(), 1);
    Ok(())
}

#[test]
fn test_pc_offsets_cover_the_body() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("offsets.abc");
    let class = builder.add_class("Lapp;", false);
    let method = builder.add_method(class, "mixed");
    let code = body(&[
        (Opcode::LdUndefined, &[]),
        (Opcode::MovV4V4, &[1, 2]),
        (Opcode::WideCopyRestArgsPrefImm16, &[1]),
        (Opcode::CallArg1Imm8V8, &[0, 1]),
        (Opcode::ReturnUndefined, &[]),
    ])?;
    let size = code.len();
    builder.set_code(method, 4, 1, code);
    let file = builder.build();

    let analysis = collect(&file)?;
    let pc_info = analysis
        .bytecode_info
        .method_pc_info(method.offset())
        .unwrap();

    assert_eq!(pc_info.len(), 5);
    assert_eq!(pc_info.pc_offsets()[0], 0);
    assert!(pc_info.pc_offsets().windows(2).all(|pair| pair[0] < pair[1]));
    assert!(*pc_info.pc_offsets().last().unwrap() < size);
    Ok(())
}

#[test]
fn test_define_func_registers_unscanned_inner_method() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("closure.abc");
    let class = builder.add_class("Lapp;", false);
    let hidden = builder.add_class("Lhidden;", true);
    let main = builder.add_method(class, "func_main_0");
    let closure = builder.add_method(hidden, "closure");
    let index = builder.index_entity(closure)?;
    builder.set_code(
        main,
        0,
        3,
        body(&[
            (Opcode::DefineFuncImm8Id16Imm8, &[0, i64::from(index), 0]),
            (Opcode::ReturnUndefined, &[]),
        ])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let info = &analysis.bytecode_info;

    let inner = info.method_info(closure.offset()).unwrap();
    assert_eq!(inner.discovery(), Discovery::DefineFunction);
    assert!(!inner.is_scanned());
    assert_eq!(inner.pc_info_index(), 0);
    assert_eq!(&**inner.record_name(), "app");

    let outer = info.method_info(main.offset()).unwrap();
    assert_eq!(outer.inner_methods(), &[closure.offset()]);
    assert_eq!(inner.outer_method(), Some(outer.id()));
    assert_eq!(info.pc_infos().len(), 1);
    Ok(())
}

#[test]
fn test_super_call_disables_fast_call_only() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("super.abc");
    let class = builder.add_class("Lapp;", false);
    let method = builder.add_method(class, "Derived");
    builder.set_code(
        method,
        2,
        3,
        body(&[
            (Opcode::SuperCallThisRangeImm8Imm8V8, &[0, 0, 0]),
            (Opcode::Return, &[]),
        ])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let literal = analysis.methods.by_offset(method.offset()).unwrap();
    assert!(!literal.can_fast_call());
    assert!(literal.can_typed_call());
    Ok(())
}

#[test]
fn test_every_calling_convention_defeater() -> Result<()> {
    let cases = [
        (Opcode::ResumeGenerator, false, true),
        (Opcode::SuspendGeneratorV8, false, true),
        (Opcode::SuperCallThisRangeImm8Imm8V8, false, true),
        (Opcode::WideSuperCallThisRangePrefImm16V8, false, true),
        (Opcode::SuperCallArrowRangeImm8Imm8V8, false, true),
        (Opcode::WideSuperCallArrowRangePrefImm16V8, false, true),
        (Opcode::CallRuntimeSuperCallForwardAllArgsPrefV8, false, false),
        (Opcode::SuperCallSpreadImm8V8, false, false),
        (Opcode::GetUnmappedArgs, false, false),
        (Opcode::CopyRestArgsImm8, false, false),
        (Opcode::WideCopyRestArgsPrefImm16, false, false),
        (Opcode::CreateEmptyObject, true, true),
    ];

    let mut builder = MemoryFileBuilder::new("conventions.abc");
    let class = builder.add_class("Lapp;", false);
    let mut methods = Vec::new();
    for (opcode, fast, typed) in cases {
        let method = builder.add_method(class, opcode.name());
        let operands = vec![0; opcode.format().operands().len()];
        builder.set_code(
            method,
            4,
            1,
            body(&[(opcode, operands.as_slice()), (Opcode::Return, &[])])?,
        );
        methods.push((method, opcode, fast, typed));
    }
    let file = builder.build();

    let analysis = collect(&file)?;
    for (method, opcode, fast, typed) in methods {
        let literal = analysis.methods.by_offset(method.offset()).unwrap();
        assert_eq!(literal.can_fast_call(), fast, "fast call after {}", opcode);
        assert_eq!(literal.can_typed_call(), typed, "typed call after {}", opcode);

        let fast_call = analysis.bytecode_info.fast_call_info(method.offset()).unwrap();
        assert_eq!(fast_call.can_fast_call, fast, "fast call info after {}", opcode);
    }
    Ok(())
}

#[test]
fn test_rest_args_disable_both_call_kinds() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("rest.abc");
    let class = builder.add_class("Lapp;", false);
    let rest = builder.add_method(class, "rest");
    let arguments = builder.add_method(class, "arguments");
    builder.set_code(
        rest,
        1,
        1,
        body(&[(Opcode::CopyRestArgsImm8, &[0]), (Opcode::Return, &[])])?,
    );
    builder.set_code(
        arguments,
        1,
        1,
        body(&[(Opcode::GetUnmappedArgs, &[]), (Opcode::Return, &[])])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    for method in [rest, arguments] {
        let literal = analysis.methods.by_offset(method.offset()).unwrap();
        assert!(!literal.can_fast_call());
        assert!(!literal.can_typed_call());
    }
    Ok(())
}

#[test]
fn test_new_target_register_disables_fast_call() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("newtarget.abc");
    let class = builder.add_class("Lapp;", false);
    let reads = builder.add_method(class, "reads_new_target");
    let other = builder.add_method(class, "reads_local");
    let no_implicit = builder.add_method(class, "no_implicit_args");

    // Two locals and the implicit arguments: new.target lives in v3.
    builder.set_code(
        reads,
        2,
        3,
        body(&[(Opcode::LdaV8, &[3]), (Opcode::Return, &[])])?,
    );
    builder.set_code(
        other,
        2,
        3,
        body(&[(Opcode::LdaV8, &[1]), (Opcode::Return, &[])])?,
    );
    builder.set_code(
        no_implicit,
        2,
        2,
        body(&[(Opcode::LdaV8, &[3]), (Opcode::Return, &[])])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let reads = analysis.methods.by_offset(reads.offset()).unwrap();
    assert_eq!(reads.new_target_vreg_index(), 3);
    assert!(!reads.can_fast_call());
    assert!(reads.can_typed_call());

    assert!(analysis.methods.by_offset(other.offset()).unwrap().can_fast_call());

    let no_implicit = analysis.methods.by_offset(no_implicit.offset()).unwrap();
    assert_eq!(no_implicit.new_target_vreg_index(), 0);
    assert!(no_implicit.can_fast_call());
    Ok(())
}

#[test]
fn test_no_gc_and_debugger_flags() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("gc.abc");
    let class = builder.add_class("Lapp;", false);
    let quiet = builder.add_method(class, "quiet");
    let allocating = builder.add_method(class, "allocating");
    let debugging = builder.add_method(class, "debugging");
    builder.set_code(
        quiet,
        1,
        1,
        body(&[
            (Opcode::LdNull, &[]),
            (Opcode::StaV8, &[0]),
            (Opcode::ReturnUndefined, &[]),
        ])?,
    );
    builder.set_code(
        allocating,
        1,
        1,
        body(&[
            (Opcode::LdNull, &[]),
            (Opcode::CreateEmptyObject, &[]),
            (Opcode::ReturnUndefined, &[]),
        ])?,
    );
    builder.set_code(
        debugging,
        0,
        1,
        body(&[(Opcode::Debugger, &[]), (Opcode::ReturnUndefined, &[])])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let info = &analysis.bytecode_info;

    assert!(analysis.methods.by_offset(quiet.offset()).unwrap().is_no_gc());
    assert!(!analysis.methods.by_offset(allocating.offset()).unwrap().is_no_gc());
    assert!(!info.fast_call_info(allocating.offset()).unwrap().no_gc);

    let debugging = analysis.methods.by_offset(debugging.offset()).unwrap();
    assert!(debugging.has_debugger_stmt());
    assert!(!analysis
        .methods
        .by_offset(quiet.offset())
        .unwrap()
        .has_debugger_stmt());
    Ok(())
}

#[test]
fn test_literal_buffer_methods_with_cycle_and_self_reference() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("literals.abc");
    let class = builder.add_class("Lapp;", false);
    let hidden = builder.add_class("Lhidden;", true);
    let main = builder.add_method(class, "func_main_0");
    let first = builder.add_method(hidden, "first");
    let second = builder.add_method(hidden, "second");
    let third = builder.add_method(hidden, "third");

    let leaf = builder.add_literal_array(vec![third, first], vec![]);
    // The root references itself through legacy index 0 and lists the enclosing method.
    let root = builder.add_literal_array(
        vec![first, main, second],
        vec![LiteralRef::Entity(leaf), LiteralRef::Index(0)],
    );
    assert_eq!(builder.legacy_literal_index(root), 0);
    let root_index = builder.index_entity(root)?;

    builder.set_code(
        main,
        0,
        3,
        body(&[
            (Opcode::CreateArrayWithBufferImm8Id16, &[0, i64::from(root_index)]),
            (Opcode::ReturnUndefined, &[]),
        ])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let info = &analysis.bytecode_info;

    assert_eq!(info.registry().len(), 4);
    let outer = info.method_info(main.offset()).unwrap();
    assert_eq!(
        outer.inner_methods(),
        &[first.offset(), second.offset(), third.offset()]
    );
    for method in [first, second, third] {
        let inner = info.method_info(method.offset()).unwrap();
        assert_eq!(inner.discovery(), Discovery::LiteralBuffer);
        assert!(!inner.is_scanned());
    }
    assert_eq!(outer.discovery(), Discovery::Enumerated);
    Ok(())
}

#[test]
fn test_legacy_literal_buffer() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("legacy.abc");
    let class = builder.add_class("Lapp;", false);
    let hidden = builder.add_class("Lhidden;", true);
    let main = builder.add_method(class, "func_main_0");
    let getter = builder.add_method(hidden, "getter");
    let literal = builder.add_literal_array(vec![getter], vec![]);
    let index = builder.legacy_literal_index(literal);

    builder.set_code(
        main,
        0,
        3,
        body(&[
            (Opcode::DeprecatedCreateObjectWithBufferPrefImm16, &[i64::from(index)]),
            (Opcode::ReturnUndefined, &[]),
        ])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let inner = analysis.bytecode_info.method_info(getter.offset()).unwrap();
    assert_eq!(inner.discovery(), Discovery::LiteralBuffer);

    let minimal = BytecodeInfoCollector::new(&file, CollectorConfig::minimal()).collect()?;
    assert!(minimal.bytecode_info.method_info(getter.offset()).is_none());
    Ok(())
}

#[test]
fn test_literal_expansion_is_bounded() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("deep.abc");
    let class = builder.add_class("Lapp;", false);
    let main = builder.add_method(class, "func_main_0");

    let mut literal = builder.add_literal_array(vec![], vec![]);
    for _ in 0..3 {
        literal = builder.add_literal_array(vec![], vec![LiteralRef::Entity(literal)]);
    }
    let index = builder.index_entity(literal)?;
    builder.set_code(
        main,
        0,
        3,
        body(&[
            (Opcode::CreateObjectWithBufferImm8Id16, &[0, i64::from(index)]),
            (Opcode::ReturnUndefined, &[]),
        ])?,
    );
    let file = builder.build();

    let config = CollectorConfig {
        max_literal_arrays: 2,
        ..CollectorConfig::default()
    };
    assert!(matches!(
        BytecodeInfoCollector::new(&file, config).collect(),
        Err(Error::RecursionLimit(2))
    ));
    assert!(collect(&file).is_ok());
    Ok(())
}

#[test]
fn test_class_definition() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("class.abc");
    let class = builder.add_class("Lapp;", false);
    let hidden = builder.add_class("Lhidden;", true);
    let main = builder.add_method(class, "func_main_0");
    let constructor = builder.add_method(hidden, "Point");
    let member = builder.add_method(hidden, "length");
    let members = builder.add_literal_array(vec![member], vec![]);
    let constructor_index = builder.index_entity(constructor)?;
    let members_index = builder.index_entity(members)?;

    builder.set_code(
        main,
        1,
        3,
        body(&[
            (Opcode::LdHole, &[]),
            (
                Opcode::DefineClassWithBufferImm8Id16Id16Imm16V8,
                &[
                    0,
                    i64::from(constructor_index),
                    i64::from(members_index),
                    2,
                    0,
                ],
            ),
            (Opcode::ReturnUndefined, &[]),
        ])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    let info = &analysis.bytecode_info;
    assert!(info.is_class_def(main.offset(), 1));
    assert!(!info.is_class_def(main.offset(), 0));
    assert_eq!(info.class_def_bc_indexes().into_iter().collect::<Vec<_>>(), vec![1]);
    assert_eq!(
        info.method_info(constructor.offset()).unwrap().discovery(),
        Discovery::ClassDefinition
    );
    assert_eq!(
        info.method_info(member.offset()).unwrap().discovery(),
        Discovery::ClassDefinition
    );

    let minimal = BytecodeInfoCollector::new(&file, CollectorConfig::minimal()).collect()?;
    let info = &minimal.bytecode_info;
    assert!(!info.is_class_def(main.offset(), 1));
    assert!(info.method_info(constructor.offset()).is_some());
    assert!(info.method_info(member.offset()).is_none());
    Ok(())
}

#[test]
fn test_method_listed_twice_is_scanned_once() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("shared.abc");
    let first = builder.add_class("Lfirst;", false);
    let second = builder.add_class("Lsecond;", false);
    let method = builder.add_method(first, "shared");
    builder.attach_method(second, method);
    builder.set_code(
        method,
        1,
        1,
        body(&[(Opcode::CopyRestArgsImm8, &[0]), (Opcode::Return, &[])])?,
    );
    let file = builder.build();

    let analysis = collect(&file)?;
    assert_eq!(analysis.methods.len(), 2);
    assert_eq!(analysis.bytecode_info.pc_infos().len(), 1);
    assert_eq!(analysis.bytecode_info.registry().len(), 1);

    let literals: Vec<_> = analysis.methods.iter().collect();
    assert_eq!(literals[0].flags(), literals[1].flags());
    assert!(!literals[1].can_fast_call());
    Ok(())
}

#[test]
fn test_registry_ids_and_entry_records() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("records.abc");
    for record in ["La;", "Lb;"] {
        let class = builder.add_class(record, false);
        let main = builder.add_method(class, "func_main_0");
        let helper = builder.add_method(class, "helper");
        builder.set_code(main, 0, 3, body(&[(Opcode::ReturnUndefined, &[])])?);
        builder.set_code(helper, 0, 3, body(&[(Opcode::ReturnUndefined, &[])])?);
    }
    builder.add_class("Lstd/external;", true);
    let file = builder.build();

    let analysis = collect(&file)?;
    let info = &analysis.bytecode_info;

    let names: Vec<&str> = info.record_names().iter().map(|name| &**name).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(info.main_method("a").is_some());
    assert!(info.main_method("std/external").is_none());

    let mut ids: Vec<u32> = info.registry().iter().map(|(_, method)| method.id()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(info.registry().iter().all(|(_, method)| method.is_scanned()));
    Ok(())
}

#[test]
fn test_abstract_methods_are_registered_not_scanned() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("shapes.abc");
    let class = builder.add_class("Lshapes;", false);
    let main = builder.add_method(class, "func_main_0");
    let area = builder.add_method(class, "area");
    let native = builder.add_method(class, "hash");
    builder.set_code(main, 0, 3, body(&[(Opcode::ReturnUndefined, &[])])?);
    builder.set_abstract_or_native(area, true);
    builder.set_abstract_or_native(native, true);
    let file = builder.build();

    let analysis = collect(&file)?;
    let info = &analysis.bytecode_info;
    assert_eq!(analysis.methods.len(), 3);
    assert_eq!(info.pc_infos().len(), 1);

    for method in [area, native] {
        assert!(analysis.methods.by_offset(method.offset()).is_some());
        let registered = info.method_info(method.offset()).unwrap();
        assert_eq!(registered.discovery(), Discovery::Enumerated);
        assert!(!registered.is_scanned());
        assert!(info.method_pc_info(method.offset()).is_none());
        assert!(info.fast_call_info(method.offset()).is_none());
    }
    assert!(info.method_info(main.offset()).unwrap().is_scanned());

    let mut literal = MethodLiteral::from_file(&file, area)?;
    let mut collector = BytecodeInfoCollector::new(&file, CollectorConfig::default());
    collector.process_method(&mut literal)?;
    let info = collector.into_bytecode_info();
    assert!(info.pc_infos().is_empty());
    assert!(!info.method_info(area.offset()).unwrap().is_scanned());
    Ok(())
}

#[test]
fn test_missing_code_is_an_error() {
    let mut builder = MemoryFileBuilder::new("missing.abc");
    let class = builder.add_class("Lapp;", false);
    let method = builder.add_method(class, "no_body");
    let file = builder.build();

    match collect(&file) {
        Err(Error::MissingCode(id)) => assert_eq!(id, method),
        other => panic!("unexpected {:?}", other.map(|analysis| analysis.methods.len())),
    }
}

#[test]
fn test_malformed_input_is_an_error() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("bad_descriptor.abc");
    let class = builder.add_class("app", false);
    let method = builder.add_method(class, "f");
    builder.set_code(method, 0, 0, body(&[(Opcode::Return, &[])])?);
    assert!(matches!(
        collect(&builder.build()),
        Err(Error::Malformed { .. })
    ));

    let mut builder = MemoryFileBuilder::new("truncated.abc");
    let class = builder.add_class("Lapp;", false);
    let method = builder.add_method(class, "f");
    builder.set_code(method, 0, 0, vec![0x62, 0x01]);
    assert!(collect(&builder.build()).is_err());

    let mut builder = MemoryFileBuilder::new("unknown.abc");
    let class = builder.add_class("Lapp;", false);
    let method = builder.add_method(class, "f");
    builder.set_code(method, 0, 0, vec![0xf0]);
    assert!(matches!(
        collect(&builder.build()),
        Err(Error::UnknownOpcode { opcode: 0xf0, .. })
    ));
    Ok(())
}

#[test]
fn test_single_method_mode() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("jit.abc");
    let class = builder.add_class("Lcom/demo/Jit;", false);
    let hot = builder.add_method(class, "hot");
    builder.set_code(
        hot,
        2,
        3,
        body(&[(Opcode::IncImm8, &[0]), (Opcode::Return, &[])])?,
    );
    let file = builder.build();

    let mut literal = MethodLiteral::from_file(&file, hot)?;
    let mut collector = BytecodeInfoCollector::new(&file, CollectorConfig::default());
    collector.process_method(&mut literal)?;
    collector.process_method(&mut literal)?;

    assert!(literal.can_fast_call());
    assert!(!literal.is_no_gc());

    let info = collector.into_bytecode_info();
    assert_eq!(info.pc_infos().len(), 1);
    assert_eq!(info.record_names().len(), 1);
    assert_eq!(&*info.record_names()[0], "com/demo/Jit");
    assert_eq!(info.method_pc_info(hot.offset()).unwrap().pc_offsets(), &[0, 2]);
    assert!(info.method_info(hot.offset()).unwrap().is_scanned());
    Ok(())
}

#[test]
fn test_single_method_mode_lists_each_record_once() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("jit_records.abc");
    let jit = builder.add_class("Lcom/demo/Jit;", false);
    let other = builder.add_class("Lcom/demo/Other;", false);
    let mut methods = Vec::new();
    for (class, name) in [(jit, "first"), (jit, "second"), (other, "third"), (jit, "fourth")] {
        let method = builder.add_method(class, name);
        builder.set_code(method, 0, 3, body(&[(Opcode::ReturnUndefined, &[])])?);
        methods.push(method);
    }
    let file = builder.build();

    let mut collector = BytecodeInfoCollector::new(&file, CollectorConfig::minimal());
    for method in &methods {
        let mut literal = MethodLiteral::from_file(&file, *method)?;
        collector.process_method(&mut literal)?;
    }

    let info = collector.into_bytecode_info();
    assert_eq!(info.pc_infos().len(), 4);
    let names: Vec<&str> = info.record_names().iter().map(|name| &**name).collect();
    assert_eq!(names, vec!["com/demo/Jit", "com/demo/Other"]);
    Ok(())
}

#[derive(Default)]
struct CountingMatcher {
    seen: Vec<(String, String)>,
}

impl MethodMatcher for CountingMatcher {
    fn match_and_mark(&mut self, record_name: &str, method_name: &str, _method: EntityId) {
        self.seen
            .push((record_name.to_string(), method_name.to_string()));
    }
}

#[test]
fn test_recorders_and_matcher() -> Result<()> {
    let mut builder = MemoryFileBuilder::new("hooks.abc");
    let class = builder.add_class("Lapp;", false);
    let first = builder.add_method(class, "func_main_0");
    let second = builder.add_method(class, "helper");
    builder.set_code(
        first,
        0,
        3,
        body(&[(Opcode::LdTrue, &[]), (Opcode::Return, &[])])?,
    );
    builder.set_code(second, 0, 3, body(&[(Opcode::ReturnUndefined, &[])])?);
    let file = builder.build();

    let mut snapshot = Vec::new();
    let mut profile = 0usize;
    let mut matcher = CountingMatcher::default();
    {
        let mut snapshot_recorder =
            |record: &str, method: EntityId, bc_index: usize, inst: &BytecodeInstruction<'_>| {
                snapshot.push((record.to_string(), method, bc_index, inst.address()));
            };
        let mut pgo_recorder =
            |_: &str, _: EntityId, _: usize, _: &BytecodeInstruction<'_>| profile += 1;

        BytecodeInfoCollector::new(&file, CollectorConfig::default())
            .with_snapshot_recorder(&mut snapshot_recorder)
            .with_pgo_recorder(&mut pgo_recorder)
            .with_method_matcher(&mut matcher)
            .collect()?;
    }

    assert_eq!(
        snapshot,
        vec![
            ("app".to_string(), first, 0, 0),
            ("app".to_string(), first, 1, 1),
            ("app".to_string(), second, 0, 0),
        ]
    );
    assert_eq!(profile, 3);
    assert_eq!(
        matcher.seen,
        vec![
            ("app".to_string(), "func_main_0".to_string()),
            ("app".to_string(), "helper".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_collect_files_in_parallel() -> Result<()> {
    let files = (0..8)
        .map(|i| {
            let mut builder = MemoryFileBuilder::new(&format!("part{}.abc", i));
            let class = builder.add_class(&format!("Lpart{};", i), false);
            let main = builder.add_method(class, "func_main_0");
            builder.set_code(main, 0, 3, body(&[(Opcode::ReturnUndefined, &[])])?);
            Ok(builder.build())
        })
        .collect::<Result<Vec<_>>>()?;

    let analyses = collect_files(&files, CollectorConfig::default())?;
    assert_eq!(analyses.len(), 8);
    for (i, analysis) in analyses.iter().enumerate() {
        assert_eq!(
            &*analysis.bytecode_info.record_names()[0],
            format!("part{}", i)
        );
    }
    Ok(())
}
