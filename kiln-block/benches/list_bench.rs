use std::rc::Rc;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use kiln_block::{CompiledBlock, VNode, compile, list, mount, patch};
use kiln_dom::{Document, Value};

struct Table {
    outer: Rc<CompiledBlock>,
    row: Rc<CompiledBlock>,
}

impl Table {
    fn new() -> Self {
        Self {
            outer: compile("<table><tbody><block-child-0/></tbody></table>").unwrap(),
            row: compile(
                "<tr block-attribute-1=\"class\"><td><block-text-0/></td><td><a><block-text-2/></a></td></tr>",
            )
            .unwrap(),
        }
    }

    /// `(id, label)` rows; `selected` marks one row with a class.
    fn render(&self, rows: &[(i64, String)], selected: Option<i64>) -> VNode {
        let items = rows.iter().map(|(id, label)| {
            let class = if Some(*id) == selected { "danger" } else { "" };
            let data = [Value::from(*id as f64), Value::from(class), Value::from(label.as_str())];
            (*id, self.row.create(data, vec![]))
        });
        self.outer.create(Vec::<Value>::new(), vec![Some(list(items))])
    }
}

fn rows(count: usize) -> Vec<(i64, String)> {
    (0..count as i64).map(|i| (i, format!("row {i}"))).collect()
}

fn mounted(table: &Table, data: &[(i64, String)]) -> (Document, VNode) {
    let mut dom = Document::new();
    let root = dom.create_element("div");
    let mut node = table.render(data, None);
    mount(&mut dom, &mut node, root);
    (dom, node)
}

fn bench_create(c: &mut Criterion) {
    let table = Table::new();
    let mut group = c.benchmark_group("create_rows");
    group.sample_size(20);
    for &count in &[100usize, 1000usize] {
        let data = rows(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| mounted(&table, data));
        });
    }
    group.finish();
}

fn bench_swap(c: &mut Criterion) {
    let table = Table::new();
    let data = rows(1000);
    let mut swapped = data.clone();
    swapped.swap(1, 998);
    c.bench_function("swap_rows", |b| {
        b.iter_batched(
            || mounted(&table, &data),
            |(mut dom, mut node)| {
                patch(&mut dom, &mut node, table.render(&swapped, None));
                (dom, node)
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_update(c: &mut Criterion) {
    let table = Table::new();
    let data = rows(1000);
    let updated: Vec<_> = data
        .iter()
        .enumerate()
        .map(|(i, (id, label))| {
            let label = if i % 10 == 0 { format!("{label} !!!") } else { label.clone() };
            (*id, label)
        })
        .collect();
    c.bench_function("update_every_10th_row", |b| {
        b.iter_batched(
            || mounted(&table, &data),
            |(mut dom, mut node)| {
                patch(&mut dom, &mut node, table.render(&updated, Some(5)));
                (dom, node)
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_clear(c: &mut Criterion) {
    let table = Table::new();
    let data = rows(1000);
    c.bench_function("clear_rows", |b| {
        b.iter_batched(
            || mounted(&table, &data),
            |(mut dom, mut node)| {
                patch(&mut dom, &mut node, table.render(&[], None));
                (dom, node)
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().without_plots();
    targets = bench_create, bench_swap, bench_update, bench_clear
}
criterion_main!(benches);
