//! Benchmarks for bytecode information collection.
//!
//! Measures the collector over synthetic files:
//! - Instruction walking over a long straight-line body
//! - A full-file scan with closures and nested literal buffers
//! - Single-method (JIT) scans
//! - Parallel collection over several files

extern crate abcscope;

use abcscope::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn straight_line_body(length: usize) -> Vec<u8> {
    let mut encoder = BytecodeEncoder::new();
    for i in 0..length {
        encoder.emit(Opcode::LdaiImm32, &[i as i64]).unwrap();
        encoder.emit(Opcode::StaV8, &[(i % 8) as i64]).unwrap();
        encoder.emit(Opcode::Add2Imm8V8, &[0, 1]).unwrap();
    }
    encoder.emit(Opcode::Return, &[]).unwrap();
    encoder.finish()
}

/// A file with `classes` records, each defining closures and a literal buffer tree.
fn synthetic_file(name: &str, classes: usize) -> MemoryFile {
    let mut builder = MemoryFileBuilder::new(name);
    let hidden = builder.add_class("Lbench/hidden;", true);

    for c in 0..classes {
        let class = builder.add_class(&format!("Lbench/Record{};", c), false);
        let main = builder.add_method(class, "func_main_0");

        let mut encoder = BytecodeEncoder::new();
        let mut nested = Vec::new();
        for i in 0..16 {
            let closure = builder.add_method(hidden, &format!("closure{}", i));
            let index = builder.index_entity(closure).unwrap();
            encoder
                .emit(Opcode::DefineFuncImm8Id16Imm8, &[0, i64::from(index), 0])
                .unwrap();
            nested.push(LiteralRef::Entity(
                builder.add_literal_array(vec![closure], vec![]),
            ));
        }
        let root = builder.add_literal_array(vec![], nested);
        let root = builder.index_entity(root).unwrap();
        encoder
            .emit(Opcode::CreateObjectWithBufferImm8Id16, &[0, i64::from(root)])
            .unwrap();
        encoder.emit(Opcode::ReturnUndefined, &[]).unwrap();
        builder.set_code(main, 8, 3, encoder.finish());

        let worker = builder.add_method(class, "worker");
        builder.set_code(worker, 8, 3, straight_line_body(256));
    }

    builder.build()
}

/// Benchmark decoding a long instruction stream with the cursor alone.
fn bench_instruction_walk(c: &mut Criterion) {
    let code = straight_line_body(4096);

    c.bench_function("instruction_walk", |b| {
        b.iter(|| {
            let mut count = 0usize;
            let mut inst = BytecodeInstruction::begin(black_box(&code));
            while inst.address() < code.len() {
                count += inst.size().unwrap();
                inst = inst.next().unwrap();
            }
            black_box(count)
        });
    });
}

/// Benchmark a full-file scan.
fn bench_full_file(c: &mut Criterion) {
    let file = synthetic_file("bench.abc", 64);

    c.bench_function("collect_full_file", |b| {
        b.iter(|| {
            let analysis = BytecodeInfoCollector::new(black_box(&file), CollectorConfig::default())
                .collect()
                .unwrap();
            black_box(analysis)
        });
    });
}

/// Benchmark single-method scans over every method of a file.
fn bench_single_method(c: &mut Criterion) {
    let file = synthetic_file("jit.abc", 16);
    let methods: Vec<EntityId> = file
        .classes()
        .unwrap()
        .into_iter()
        .filter(|class| !file.is_external(*class).unwrap())
        .flat_map(|class| file.class_methods(class).unwrap())
        .collect();

    c.bench_function("collect_single_method", |b| {
        b.iter(|| {
            let mut collector = BytecodeInfoCollector::new(&file, CollectorConfig::minimal());
            for method in &methods {
                let mut literal = MethodLiteral::from_file(&file, *method).unwrap();
                collector.process_method(&mut literal).unwrap();
            }
            black_box(collector.into_bytecode_info())
        });
    });
}

/// Benchmark parallel collection over several files.
fn bench_parallel_files(c: &mut Criterion) {
    let files: Vec<MemoryFile> = (0..8)
        .map(|i| synthetic_file(&format!("part{}.abc", i), 16))
        .collect();

    c.bench_function("collect_files_parallel", |b| {
        b.iter(|| black_box(collect_files(black_box(&files), CollectorConfig::default()).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_instruction_walk,
    bench_full_file,
    bench_single_method,
    bench_parallel_files
);
criterion_main!(benches);
