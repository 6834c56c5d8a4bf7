use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pipenet_core::prelude::*;

fn grid_network(side: u32) -> NetworkEditor {
    let mut editor = NetworkEditor::default();
    for row in 0..side {
        for col in 0..side {
            editor
                .add_node(
                    20.0 + f64::from(row) * 0.01,
                    78.0 + f64::from(col) * 0.01,
                    None,
                    None,
                )
                .expect("grid node");
        }
    }
    for id in 1..side * side {
        editor.add_pipe(id, id + 1, None).expect("grid pipe");
    }
    editor
}

fn bench_serialization(c: &mut Criterion) {
    let editor = grid_network(20);
    let nodes = editor.export_nodes().expect("export nodes");
    let pipes = editor.export_pipes().expect("export pipes");

    c.bench_function("export_pipes_400", |b| {
        b.iter(|| black_box(editor.export_pipes().expect("export pipes")));
    });

    c.bench_function("import_network_400", |b| {
        b.iter(|| {
            let mut target = NetworkEditor::default();
            target.import_nodes(black_box(&nodes)).expect("import nodes");
            target.import_pipes(black_box(&pipes)).expect("import pipes");
            target
        });
    });
}

fn bench_drag(c: &mut Criterion) {
    let mut editor = grid_network(20);
    c.bench_function("move_node_sync", |b| {
        b.iter(|| editor.move_node(black_box(200), 20.1, 78.1).expect("move"));
    });
}

criterion_group!(benches, bench_serialization, bench_drag);
criterion_main!(benches);
