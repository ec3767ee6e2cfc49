use chart_scales::core::{
    Bounds, Dataset, EntityIndex, LinearScale, PlotEntity, Point, build_entities, scaled_accessor,
};

fn grid_scales() -> (LinearScale, LinearScale) {
    let x = LinearScale::new()
        .with_range(0.0, 100.0)
        .with_domain(0.0, 10.0)
        .expect("finite domain");
    let y = LinearScale::new()
        .with_range(100.0, 0.0)
        .with_domain(0.0, 10.0)
        .expect("finite domain");
    (x, y)
}

fn index_of(points: &[(f64, f64)], bounds: Option<Bounds>) -> EntityIndex<Point> {
    let mut index = EntityIndex::new();
    index.add_all(points.iter().map(|&(x, y)| Point::new(x, y)), bounds);
    index
}

#[test]
fn nearest_entity_matches_brute_force() {
    let points = [(10.0, 10.0), (40.0, 80.0), (55.0, 20.0), (90.0, 90.0), (70.0, 45.0)];
    let index = index_of(&points, None);

    for query in [
        Point::new(0.0, 0.0),
        Point::new(60.0, 30.0),
        Point::new(85.0, 70.0),
        Point::new(41.0, 79.0),
    ] {
        let expected = points
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .min_by(|a, b| a.distance_squared(query).total_cmp(&b.distance_squared(query)))
            .expect("non-empty points");
        assert_eq!(index.entity_nearest(query), Some(&expected));
    }
}

#[test]
fn entities_outside_bounds_are_stored_but_not_indexed() {
    let bounds = Bounds::from_size(50.0, 50.0);
    let index = index_of(&[(10.0, 10.0), (50.0, 50.0), (80.0, 10.0)], Some(bounds));

    assert_eq!(index.len(), 3);
    assert_eq!(index.indexed_len(), 2);
    // The query point is right next to the out-of-bounds entity, yet it is never returned.
    assert_eq!(
        index.entity_nearest(Point::new(79.0, 10.0)),
        Some(&Point::new(50.0, 50.0))
    );
}

#[test]
fn empty_index_has_no_nearest_entity() {
    let index: EntityIndex<Point> = EntityIndex::new();
    assert!(index.is_empty());
    assert_eq!(index.entity_nearest(Point::new(1.0, 1.0)), None);
}

#[test]
fn entities_in_returns_hits_in_insertion_order() {
    let index = index_of(
        &[(30.0, 30.0), (5.0, 5.0), (90.0, 90.0), (20.0, 20.0)],
        None,
    );
    let hits = index.entities_in(Bounds::new(Point::new(0.0, 0.0), Point::new(30.0, 30.0)));
    assert_eq!(
        hits,
        vec![
            &Point::new(30.0, 30.0),
            &Point::new(5.0, 5.0),
            &Point::new(20.0, 20.0)
        ]
    );
}

#[test]
fn incremental_adds_extend_the_tree() {
    let mut index = index_of(&[(0.0, 0.0)], None);
    index.add_all([Point::new(100.0, 100.0)], None);

    assert_eq!(index.indexed_len(), 2);
    assert_eq!(
        index.entity_nearest(Point::new(95.0, 95.0)),
        Some(&Point::new(100.0, 100.0))
    );

    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.indexed_len(), 0);
}

#[test]
fn built_entities_carry_their_datum_and_pixel_position() {
    let (x_scale, y_scale) = grid_scales();
    let readings = Dataset::new(vec![(1.0, 2.0), (f64::NAN, 4.0), (5.0, 10.0)]);
    let x = scaled_accessor(|d: &(f64, f64), _, _: &Dataset<(f64, f64)>| d.0, &x_scale);
    let y = scaled_accessor(|d: &(f64, f64), _, _: &Dataset<(f64, f64)>| d.1, &y_scale);

    let entities = build_entities(&[&readings], x, y);
    assert_eq!(entities.len(), 2);
    assert_eq!(
        entities[1],
        PlotEntity {
            datum: (5.0, 10.0),
            dataset: readings.id(),
            index: 2,
            position: Point::new(50.0, 0.0),
        }
    );

    let mut index = EntityIndex::new();
    index.add_all(entities, Some(Bounds::from_size(100.0, 100.0)));
    let nearest = index
        .entity_nearest(Point::new(12.0, 78.0))
        .expect("an indexed entity");
    assert_eq!(nearest.datum, (1.0, 2.0));
    assert_eq!(nearest.position, Point::new(10.0, 80.0));
}
