use chart_scales::core::{
    Dataset, EntityIndex, LinearScale, Point, Scale, StackingOrder, stack, stacked_extent,
};
use chart_scales::interaction::{PanZoomConstraints, PanZoomController};
use criterion::{Criterion, criterion_group, criterion_main};
use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

fn bench_auto_domain_10k(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000)
        .map(|i| {
            let t = i as f64;
            100.0 + (t * 0.01).sin() * 50.0
        })
        .collect();
    let mut scale = LinearScale::new().with_range(0.0, 1080.0);
    scale.add_included_values_provider(move || values.clone());
    scale.add_padding_exceptions_provider(|| vec![0.0]);

    c.bench_function("auto_domain_10k", |b| {
        b.iter(|| {
            scale.auto_domain();
            black_box(scale.domain());
        })
    });
}

fn bench_stack_8x1k(c: &mut Criterion) {
    let datasets: Vec<Dataset<(usize, f64)>> = (0..8)
        .map(|series| {
            Dataset::new(
                (0..1_000)
                    .map(|i| {
                        let sign = if (i + series) % 3 == 0 { -1.0 } else { 1.0 };
                        (i, sign * (1.0 + (i % 17) as f64))
                    })
                    .collect(),
            )
        })
        .collect();
    let refs: Vec<&Dataset<(usize, f64)>> = datasets.iter().collect();
    let key = |datum: &(usize, f64), _: usize, _: &Dataset<(usize, f64)>| datum.0;
    let value = |datum: &(usize, f64), _: usize, _: &Dataset<(usize, f64)>| datum.1;

    c.bench_function("stack_8x1k", |b| {
        b.iter(|| {
            let result = stack(black_box(&refs), key, value, StackingOrder::BottomUp);
            black_box(stacked_extent(&result, &refs, key, None));
        })
    });
}

fn bench_entity_nearest_10k(c: &mut Criterion) {
    let mut index = EntityIndex::new();
    index.add_all(
        (0..10_000).map(|i| {
            let t = i as f64;
            Point::new(t * 0.192, 540.0 + (t * 0.05).sin() * 400.0)
        }),
        None,
    );

    c.bench_function("entity_nearest_10k", |b| {
        b.iter(|| {
            let _ = black_box(index.entity_nearest(black_box(Point::new(960.0, 300.0))));
        })
    });
}

fn bench_constrained_wheel_zoom(c: &mut Criterion) {
    let scale = Rc::new(RefCell::new(
        LinearScale::new()
            .with_range(0.0, 1920.0)
            .with_domain(0.0, 1_000.0)
            .expect("finite domain"),
    ));
    let mut controller = PanZoomController::new();
    let id = controller
        .add_x_scale(scale.clone())
        .expect("register x scale");
    controller
        .set_constraints(
            id,
            PanZoomConstraints::default()
                .with_domain_extents(Some(1.0), Some(1_000.0))
                .with_domain_values(Some(0.0), Some(1_000.0)),
        )
        .expect("valid constraints");

    c.bench_function("constrained_zoom_in_out", |b| {
        b.iter(|| {
            controller.zoom(black_box(0.8), Some(Point::new(700.0, 0.0)));
            controller.zoom(black_box(1.25), Some(Point::new(1_500.0, 0.0)));
        })
    });
}

criterion_group!(
    benches,
    bench_auto_domain_10k,
    bench_stack_8x1k,
    bench_entity_nearest_10k,
    bench_constrained_wheel_zoom
);
criterion_main!(benches);
