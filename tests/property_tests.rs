use std::cell::RefCell;
use std::rc::Rc;

use chart_scales::core::{
    Dataset, EntityIndex, LinearScale, Point, Scale, StackingOrder, TransformableScale, stack,
};
use chart_scales::interaction::{PanZoomConstraints, PanZoomController};
use proptest::prelude::*;

type Reading = (usize, f64);

fn key(datum: &Reading, _: usize, _: &Dataset<Reading>) -> usize {
    datum.0
}

fn value(datum: &Reading, _: usize, _: &Dataset<Reading>) -> f64 {
    datum.1
}

fn datasets_from(rows: &[Vec<f64>]) -> Vec<Dataset<Reading>> {
    rows.iter()
        .map(|values| Dataset::new(values.iter().copied().enumerate().collect()))
        .collect()
}

fn bounded_controller(
    domain: (f64, f64),
    constraints: PanZoomConstraints,
) -> (PanZoomController, Rc<RefCell<LinearScale>>) {
    let mut scale = LinearScale::new().with_range(0.0, 640.0);
    scale.set_transformation_domain(domain);
    let scale = Rc::new(RefCell::new(scale));
    let mut controller = PanZoomController::new();
    let id = controller
        .add_x_scale(scale.clone())
        .expect("register x scale");
    controller
        .set_constraints(id, constraints)
        .expect("valid constraints");
    (controller, scale)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn auto_domain_contains_every_included_value(
        values in prop::collection::vec(-1.0e6f64..1.0e6, 1..32),
        snapping in any::<bool>(),
    ) {
        let mut scale = LinearScale::new();
        scale.set_snapping_domain_enabled(snapping);
        let provided = values.clone();
        scale.add_included_values_provider(move || provided.clone());

        let (start, end) = scale.domain();
        for value in values {
            prop_assert!(start <= value && value <= end);
        }
    }

    #[test]
    fn zoom_by_one_never_moves_a_domain(
        start in -1.0e4f64..1.0e4,
        width in 0.5f64..1.0e3,
        center_x in -1.0e5f64..1.0e5,
        center_y in -1.0e5f64..1.0e5,
        use_center in any::<bool>(),
    ) {
        // Bounds strictly inside the current domain, so any real zoom would move it.
        let constraints = PanZoomConstraints::default()
            .with_domain_values(Some(start + width * 0.25), Some(start + width * 0.75));
        let (mut controller, scale) = bounded_controller((start, start + width), constraints);
        let before = scale.borrow().transformation_domain();

        let center = use_center.then(|| Point::new(center_x, center_y));
        controller.zoom(1.0, center);
        prop_assert_eq!(scale.borrow().transformation_domain(), before);
    }

    #[test]
    fn dual_bound_zoom_out_lands_exactly_on_both_bounds(
        start in 10.0f64..40.0,
        width in 5.0f64..40.0,
        center_share in 0.0f64..1.0,
        factor in 30.0f64..200.0,
    ) {
        let constraints =
            PanZoomConstraints::default().with_domain_values(Some(0.0), Some(100.0));
        let (mut controller, scale) = bounded_controller((start, start + width), constraints);
        let center = scale.borrow().scale_transformation(start + width * center_share);

        controller.zoom(factor, Some(Point::new(center, 0.0)));
        let (min, max) = scale.borrow().transformation_domain();
        prop_assert!(min.abs() < 1e-6, "min edge {min} not on bound 0");
        prop_assert!((max - 100.0).abs() < 1e-6, "max edge {max} not on bound 100");
    }

    #[test]
    fn panning_toward_the_max_bound_never_crosses_it(
        start in -100.0f64..100.0,
        width in 1.0f64..50.0,
        headroom in 0.0f64..200.0,
        steps in prop::collection::vec(0.0f64..400.0, 1..24),
    ) {
        let bound = start + width + headroom;
        let constraints = PanZoomConstraints::default().with_domain_values(None, Some(bound));
        let (mut controller, scale) = bounded_controller((start, start + width), constraints);

        for step in steps {
            controller.pan(Point::new(step, 0.0));
            let (_, max) = scale.borrow().transformation_domain();
            prop_assert!(max <= bound, "max edge {max} crossed bound {bound}");
        }
    }

    #[test]
    fn positive_and_negative_offsets_conserve_totals(
        rows in prop::collection::vec(prop::collection::vec(-50.0f64..50.0, 4), 1..6),
    ) {
        let datasets = datasets_from(&rows);
        let refs: Vec<&Dataset<Reading>> = datasets.iter().collect();
        let result = stack(&refs, key, value, StackingOrder::BottomUp);

        for key in 0..4 {
            let name = key.to_string();
            let entries: Vec<(f64, f64)> = refs
                .iter()
                .filter_map(|dataset| result.get(dataset.id(), &name))
                .map(|datum| (datum.value, datum.offset))
                .collect();

            let positive: Vec<&(f64, f64)> = entries.iter().filter(|(v, _)| *v >= 0.0).collect();
            if !positive.is_empty() {
                let total: f64 = positive.iter().map(|(v, _)| v).sum();
                let top = positive
                    .iter()
                    .map(|(v, offset)| offset + v)
                    .fold(f64::NEG_INFINITY, f64::max);
                prop_assert!((total - top).abs() < 1e-9);
            }

            let negative: Vec<&(f64, f64)> = entries.iter().filter(|(v, _)| *v < 0.0).collect();
            if !negative.is_empty() {
                let total: f64 = negative.iter().map(|(v, _)| v).sum();
                let bottom = negative
                    .iter()
                    .map(|(v, offset)| offset + v)
                    .fold(f64::INFINITY, f64::min);
                prop_assert!((total - bottom).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn top_down_equals_bottom_up_over_reversed_datasets(
        rows in prop::collection::vec(prop::collection::vec(-50.0f64..50.0, 3), 1..6),
    ) {
        let datasets = datasets_from(&rows);
        let refs: Vec<&Dataset<Reading>> = datasets.iter().collect();
        let reversed: Vec<&Dataset<Reading>> = refs.iter().rev().copied().collect();

        let top_down = stack(&refs, key, value, StackingOrder::TopDown);
        let bottom_up = stack(&reversed, key, value, StackingOrder::BottomUp);
        prop_assert_eq!(top_down, bottom_up);
    }

    #[test]
    fn nearest_entity_is_at_minimum_distance(
        points in prop::collection::vec((0.0f64..500.0, 0.0f64..500.0), 1..64),
        query in (-50.0f64..550.0, -50.0f64..550.0),
    ) {
        let query = Point::new(query.0, query.1);
        let mut index = EntityIndex::new();
        index.add_all(points.iter().map(|&(x, y)| Point::new(x, y)), None);

        let best = points
            .iter()
            .map(|&(x, y)| Point::new(x, y).distance_squared(query))
            .fold(f64::INFINITY, f64::min);
        let nearest = index.entity_nearest(query).expect("non-empty index");
        prop_assert_eq!(nearest.distance_squared(query), best);
    }
}
