use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use verdant_parse::Parser;
use verdant_syntax::InputEdit;

fn sources() -> Vec<(&'static str, String)> {
    let simple = "int main() {\n  return;\n}\n".to_owned();
    let medium = r#"
        // globals
        int count = 0;
        double ratio = 1.5;

        int scale(int value, int factor) {
            count = count + 1;
            print("scaled", value * factor);
            return value * factor / (ratio + 2);
        }
    "#
    .to_owned();
    let large = (0..400)
        .map(|i| format!("int f{i}(int a) {{ int b = a * {i}; return b + a; }}\n"))
        .collect();

    vec![("Simple", simple), ("Medium", medium), ("Large", large)]
}

fn parser() -> Parser {
    let mut parser = Parser::new();
    parser.set_language(verdant_c::language()).unwrap();
    parser
}

fn benchmark_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, text) in sources() {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_code", name), &text, |b, text| {
            let mut parser = parser();
            b.iter(|| {
                let tree = parser.parse(text, None).unwrap();
                black_box(tree);
            });
        });
    }

    group.finish();
}

fn benchmark_reparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Incremental Benchmark");

    for (name, text) in sources() {
        let mut parser = parser();
        let mut old_tree = parser.parse(&text, None).unwrap();

        let at = text.rfind("return").unwrap_or_default();
        let edit = InputEdit::for_replacement(&text, at..at, "x = 1; ");
        old_tree.edit(&edit);
        let mut new_text = text.clone();
        new_text.insert_str(at, "x = 1; ");

        group.throughput(Throughput::Bytes(new_text.len() as u64));
        let id = BenchmarkId::new("reparse_after_edit", name);
        group.bench_with_input(id, &new_text, |b, new_text| {
            b.iter(|| {
                let tree = parser.parse(new_text, Some(&old_tree)).unwrap();
                black_box(tree);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser, benchmark_reparse);
criterion_main!(benches);
