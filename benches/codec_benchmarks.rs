use c_ast_json::ast::{child, BinaryOp, Compound, Constant, FileAST, FuncDef, Node, Return, ID};
use c_ast_json::{from_json, from_value, to_json, to_value};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Test Data: Trees of Varying Size
// ============================================================================

fn constant(value: usize) -> Node {
    Constant {
        ty: "int".to_string(),
        value: value.to_string(),
        coord: None,
    }
    .into()
}

/// A translation unit with one function whose body holds `statements`
/// `return v<i> + <i + 1>;` statements.
fn generate_tree(statements: usize) -> Node {
    let block_items: Vec<Node> = (0..statements)
        .map(|i| {
            Node::from(Return {
                expr: child(BinaryOp {
                    op: "+".to_string(),
                    left: child(ID {
                        name: format!("v{i}"),
                        coord: None,
                    }),
                    right: child(constant(i + 1)),
                    coord: None,
                }),
                coord: None,
            })
        })
        .collect();

    FileAST {
        ext: vec![FuncDef {
            decl: None,
            param_decls: vec![],
            body: child(Compound {
                block_items,
                coord: None,
            }),
            coord: None,
        }
        .into()],
        coord: None,
    }
    .into()
}

/// `1 + (1 + (1 + ...))`, nested `depth` levels.
fn generate_deep_tree(depth: usize) -> Node {
    let mut node = constant(1);
    for _ in 0..depth {
        node = BinaryOp {
            op: "+".to_string(),
            left: child(constant(1)),
            right: child(node),
            coord: None,
        }
        .into();
    }
    node
}

// ============================================================================
// Encoder / Decoder Benchmarks
// ============================================================================

fn bench_encode_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_scaling");

    for size in [10, 100, 1000, 5000] {
        let tree = generate_tree(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &tree, |b, tree| {
            b.iter(|| to_value(black_box(tree)).unwrap());
        });
    }
    group.finish();
}

fn bench_decode_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_scaling");

    for size in [10, 100, 1000, 5000] {
        let value = to_value(&generate_tree(size)).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| from_value(black_box(value.clone())).unwrap());
        });
    }
    group.finish();
}

fn bench_deep_trees(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_trees");

    for depth in [16, 128, 400] {
        let tree = generate_deep_tree(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &tree, |b, tree| {
            b.iter(|| to_value(black_box(tree)).unwrap());
        });
    }
    group.finish();
}

// ============================================================================
// End-to-End JSON Benchmarks
// ============================================================================

fn bench_json_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_round_trip");

    for size in [100, 1000] {
        let tree = generate_tree(size);
        let text = to_json(&tree).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("to_json", size), &tree, |b, tree| {
            b.iter(|| to_json(black_box(tree)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("from_json", size), &text, |b, text| {
            b.iter(|| from_json(black_box(text)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    codec_benches,
    bench_encode_scaling,
    bench_decode_scaling,
    bench_deep_trees
);
criterion_group!(json_benches, bench_json_round_trip);
criterion_main!(codec_benches, json_benches);
