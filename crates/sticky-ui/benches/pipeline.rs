use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::rc::Rc;

use sticky_ui::{
    compute_sticky_layout, Constraints, LeafChild, ScrollOffsetSource, ScrollState, Size,
    StickyHeaderNode, StickyHeaderSpec, StickyLayoutInput,
};

fn bench_engine(c: &mut Criterion) {
    c.bench_function("sticky_engine_sweep", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for step in 0..2_000 {
                let layout = compute_sticky_layout(&StickyLayoutInput {
                    header_size: Size::new(320.0, 50.0),
                    content_size: Size::new(320.0, 400.0),
                    section_top: 1000.0,
                    scroll_offset: step as f32,
                    overlap_headers: false,
                });
                total += layout.stuck_amount;
            }
            black_box(total)
        })
    });
}

fn bench_node_scroll(c: &mut Criterion) {
    let scroll = ScrollState::new(0.0);
    let source: Rc<dyn ScrollOffsetSource> = Rc::new(scroll.clone());
    let mut node = StickyHeaderNode::new(
        StickyHeaderSpec::new().on_stuck_amount_changed(|amount| {
            black_box(amount);
        }),
        Box::new(LeafChild::new(1, Size::new(320.0, 50.0))),
        Box::new(LeafChild::new(2, Size::new(320.0, 400.0))),
        Some(source),
    )
    .unwrap();
    node.measure(Constraints::loose(Size::new(320.0, 600.0))).unwrap();
    node.place(1000.0);

    // Scroll-only passes reuse the measured sizes.
    c.bench_function("sticky_node_scroll_pass", |b| {
        b.iter(|| {
            for step in 0..500 {
                scroll.scroll_to(900.0 + step as f32);
                black_box(node.apply_scroll());
            }
            scroll.scroll_to(0.0);
            node.apply_scroll();
        })
    });
}

criterion_group!(pipeline_benches, bench_engine, bench_node_scroll);
criterion_main!(pipeline_benches);
