use egui::{Pos2, Vec2};
use pointdash::render::coords::{
    apply_view_transform, base_scales, compute_domain, generate_tick_values, LinearScale, ViewTransform,
};
use pointdash::state::point::Point;
use proptest::prelude::*;

fn points_from(coords: &[(i64, i64)]) -> Vec<Point> {
    coords
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Point::new(format!("p{i}").as_str(), x, y))
        .collect()
}

proptest! {
    #[test]
    fn domain_contains_every_point_with_padding(
        coords in proptest::collection::vec((-1000i64..1000, -1000i64..1000), 1..20)
    ) {
        let domain = compute_domain(&points_from(&coords));
        for &(x, y) in &coords {
            prop_assert!(domain.x[0] <= x as f64 - 2.0);
            prop_assert!(domain.x[1] >= x as f64 + 2.0);
            prop_assert!(domain.y[0] <= y as f64 - 2.0);
            prop_assert!(domain.y[1] >= y as f64 + 2.0);
        }
        prop_assert_eq!(domain.x[0].fract(), 0.0);
        prop_assert_eq!(domain.y[1].fract(), 0.0);
    }

    #[test]
    fn screen_round_trip_recovers_integer_coordinates(
        coords in proptest::collection::vec((-1000i64..1000, -1000i64..1000), 1..10),
        width in 200.0f32..1600.0,
        height in 200.0f32..1200.0,
        k in 0.5f64..8.0,
        tx in -300.0f32..300.0,
        ty in -300.0f32..300.0,
    ) {
        let domain = compute_domain(&points_from(&coords));
        let base = base_scales(&domain, Vec2::new(width, height));
        let transform = ViewTransform::IDENTITY
            .scaled_about(k, Pos2::new(width / 2.0, height / 2.0), [0.1, 50.0])
            .translated(Vec2::new(tx, ty));
        let scales = apply_view_transform(&base, &transform);
        for &(x, y) in &coords {
            let screen = scales.to_screen(x as f64, y as f64);
            prop_assert_eq!(scales.to_point_coords(screen), (x, y));
        }
    }

    #[test]
    fn ticks_are_sorted_even_and_evenly_spaced(min in -5000.0f64..5000.0, span in 0.0f64..5000.0) {
        let max = min + span;
        let ticks = generate_tick_values([min, max]);
        prop_assert!(!ticks.is_empty());
        prop_assert!(ticks[0] <= min);
        prop_assert!(ticks.len() <= 1000);
        for t in &ticks {
            prop_assert_eq!(t % 2.0, 0.0);
            prop_assert!(*t <= max);
        }
        if ticks.len() > 2 {
            let step = ticks[1] - ticks[0];
            prop_assert!(step > 0.0);
            for w in ticks.windows(2) {
                prop_assert_eq!(w[1] - w[0], step);
            }
        }
    }

    #[test]
    fn degenerate_scales_never_produce_non_finite_values(
        d in -100.0f64..100.0,
        r in -100.0f64..100.0,
        pixel in -1000.0f64..1000.0,
    ) {
        let collapsed_domain = LinearScale::new([d, d], [0.0, 100.0]);
        let collapsed_range = LinearScale::new([0.0, 10.0], [r, r]);
        prop_assert!(collapsed_domain.invert(pixel).is_finite());
        prop_assert!(collapsed_range.invert(pixel).is_finite());
        prop_assert!(collapsed_domain.apply(pixel).is_finite());
    }
}
