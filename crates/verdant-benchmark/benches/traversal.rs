use std::hint::black_box;

use codspeed_criterion_compat::{Criterion, criterion_group, criterion_main};
use verdant_parse::Parser;
use verdant_syntax::Tree;

fn tree() -> (String, Tree) {
    let text: String = (0..200).map(|i| format!("int g{i} = {i} + {i} * (1 - 2);\n")).collect();
    let mut parser = Parser::new();
    parser.set_language(verdant_c::language()).unwrap();
    let tree = parser.parse(&text, None).unwrap();
    (text, tree)
}

fn benchmark_traversal(c: &mut Criterion) {
    let (text, tree) = tree();
    let mut group = c.benchmark_group("Traversal Benchmark");

    group.bench_function("cursor_walk", |b| {
        b.iter(|| {
            let mut cursor = tree.walk();
            let mut count = 0usize;
            'walk: loop {
                count += 1;
                if cursor.goto_first_child() {
                    continue;
                }
                while !cursor.goto_next_sibling() {
                    if !cursor.goto_parent() {
                        break 'walk;
                    }
                }
            }
            black_box(count);
        });
    });

    group.bench_function("descendant_for_byte_range", |b| {
        let root = tree.root_node();
        let end = text.len() as u32;
        b.iter(|| {
            for byte in (0..end).step_by(97) {
                black_box(root.descendant_for_byte_range(byte, byte));
            }
        });
    });

    group.bench_function("to_sexp", |b| {
        b.iter(|| black_box(tree.root_node().to_sexp()));
    });

    group.finish();
}

criterion_group!(benches, benchmark_traversal);
criterion_main!(benches);
