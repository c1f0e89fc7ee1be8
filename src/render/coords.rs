//! Data <-> screen mapping for the point chart.
//!
//! Screen coordinates here are relative to the plot area's top-left corner.

use egui::{Pos2, Vec2};

use crate::state::point::Point;

/// Domain used when there are no points to fit.
pub const DEFAULT_DOMAIN: Domain = Domain {
    x: [-10.0, 10.0],
    y: [-10.0, 10.0],
};

/// Minimum padding added on each side of the data extent.
const MIN_PADDING: f64 = 2.0;
/// Padding as a fraction of the data extent.
const PADDING_FRACTION: f64 = 0.1;
/// Upper bound on ticks per axis, protects against runaway loops.
const MAX_TICKS: usize = 1000;

/// Data-space extent mapped onto the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Default for Domain {
    fn default() -> Self {
        DEFAULT_DOMAIN
    }
}

/// Fit a domain around `points` with adaptive padding, snapped outward to
/// whole numbers.
pub fn compute_domain(points: &[Point]) -> Domain {
    let Some(first) = points.first() else {
        return DEFAULT_DOMAIN;
    };
    let (mut x_min, mut x_max) = (first.x, first.x);
    let (mut y_min, mut y_max) = (first.y, first.y);
    for p in &points[1..] {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    Domain {
        x: padded(x_min as f64, x_max as f64),
        y: padded(y_min as f64, y_max as f64),
    }
}

fn padded(min: f64, max: f64) -> [f64; 2] {
    let padding = MIN_PADDING.max((max - min) * PADDING_FRACTION);
    [(min - padding).floor(), (max + padding).ceil()]
}

/// A linear map from `domain` onto `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// True when either end pair collapses, so the map has no inverse.
    pub fn is_degenerate(&self) -> bool {
        let d = self.domain[1] - self.domain[0];
        let r = self.range[1] - self.range[0];
        d == 0.0 || r == 0.0 || !d.is_finite() || !r.is_finite()
    }

    pub fn apply(&self, value: f64) -> f64 {
        let span = self.domain[1] - self.domain[0];
        if span == 0.0 {
            return self.range[0];
        }
        let t = (value - self.domain[0]) / span;
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Screen -> data. Falls back to returning `pixel` unchanged when the
    /// scale cannot be inverted.
    pub fn invert(&self, pixel: f64) -> f64 {
        if self.is_degenerate() {
            return pixel;
        }
        let t = (pixel - self.range[0]) / (self.range[1] - self.range[0]);
        let value = self.domain[0] + t * (self.domain[1] - self.domain[0]);
        if value.is_finite() {
            value
        } else {
            pixel
        }
    }
}

/// User pan/zoom applied on top of the base scales:
/// `screen = k * base(data) + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub k: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            tx: self.tx + delta.x as f64,
            ty: self.ty + delta.y as f64,
            ..self
        }
    }

    /// Multiply the zoom by `factor` keeping the screen point `anchor` fixed.
    /// The resulting zoom is clamped to `extent`.
    pub fn scaled_about(self, factor: f64, anchor: Pos2, extent: [f64; 2]) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        let k = (self.k * factor).clamp(extent[0], extent[1]);
        let ratio = k / self.k;
        let (ax, ay) = (anchor.x as f64, anchor.y as f64);
        Self {
            k,
            tx: ax - (ax - self.tx) * ratio,
            ty: ay - (ay - self.ty) * ratio,
        }
    }

    fn rescale(&self, base: &LinearScale, translate: f64) -> LinearScale {
        let [r0, r1] = base.range();
        let inv = |r: f64| base.invert((r - translate) / self.k);
        LinearScale::new([inv(r0), inv(r1)], [r0, r1])
    }
}

/// The pair of scales used to place points on the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotScales {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl PlotScales {
    pub fn to_screen(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(self.x.apply(x) as f32, self.y.apply(y) as f32)
    }

    pub fn to_data(&self, pos: Pos2) -> (f64, f64) {
        (self.x.invert(pos.x as f64), self.y.invert(pos.y as f64))
    }

    /// Data coordinates snapped to the integer grid points live on.
    pub fn to_point_coords(&self, pos: Pos2) -> (i64, i64) {
        let (x, y) = self.to_data(pos);
        (round_coord(x), round_coord(y))
    }

    /// Visible data domain after pan/zoom.
    pub fn visible_domain(&self) -> Domain {
        let [x0, x1] = self.x.domain();
        let [y0, y1] = self.y.domain();
        Domain {
            x: [x0.min(x1), x0.max(x1)],
            y: [y0.min(y1), y0.max(y1)],
        }
    }
}

/// Base scales: x to `[0, width]`, y to `[height, 0]` so data y grows upward.
pub fn base_scales(domain: &Domain, size: Vec2) -> PlotScales {
    PlotScales {
        x: LinearScale::new(domain.x, [0.0, size.x as f64]),
        y: LinearScale::new(domain.y, [size.y as f64, 0.0]),
    }
}

/// Compose the pan/zoom transform with the base scales.
pub fn apply_view_transform(base: &PlotScales, transform: &ViewTransform) -> PlotScales {
    if transform.k == 0.0 || !transform.k.is_finite() {
        return *base;
    }
    PlotScales {
        x: transform.rescale(&base.x, transform.tx),
        y: transform.rescale(&base.y, transform.ty),
    }
}

fn round_coord(v: f64) -> i64 {
    if v.is_finite() {
        v.round() as i64
    } else {
        0
    }
}

/// Even-numbered tick positions covering `domain`, at most about twenty.
pub fn generate_tick_values(domain: [f64; 2]) -> Vec<f64> {
    let [min, max] = domain;
    if !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }
    let start = (min / 2.0).floor() * 2.0;
    let mut step = ((max - min) / 20.0).ceil().max(1.0);
    if step % 2.0 != 0.0 {
        step += 1.0;
    }
    let mut ticks = Vec::new();
    let mut value = start;
    while value <= max && ticks.len() < MAX_TICKS {
        ticks.push(value);
        value += step;
    }
    ticks
}

/// Integer-style tick label.
pub fn format_tick_value(val: f64) -> String {
    format!("{}", val.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(coords: &[(i64, i64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(format!("p{i}").as_str(), x, y))
            .collect()
    }

    #[test]
    fn empty_domain_is_default() {
        assert_eq!(compute_domain(&[]), DEFAULT_DOMAIN);
    }

    #[test]
    fn small_extent_uses_minimum_padding() {
        let d = compute_domain(&pts(&[(0, 0), (10, 10)]));
        assert_eq!(d.x, [-2.0, 12.0]);
        assert_eq!(d.y, [-2.0, 12.0]);
    }

    #[test]
    fn large_extent_uses_fractional_padding() {
        let d = compute_domain(&pts(&[(0, -50), (100, 50)]));
        assert_eq!(d.x, [-10.0, 110.0]);
        assert_eq!(d.y, [-60.0, 60.0]);
    }

    #[test]
    fn single_point_is_not_degenerate() {
        let d = compute_domain(&pts(&[(3, -7)]));
        assert_eq!(d.x, [1.0, 5.0]);
        assert_eq!(d.y, [-9.0, -5.0]);
    }

    #[test]
    fn fractional_padding_snaps_outward() {
        let d = compute_domain(&pts(&[(0, 0), (25, 1)]));
        assert_eq!(d.x, [-3.0, 28.0]);
        assert_eq!(d.y, [-2.0, 3.0]);
    }

    #[test]
    fn ticks_for_small_domain() {
        assert_eq!(generate_tick_values([0.0, 10.0]), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn ticks_start_on_even_value() {
        assert_eq!(generate_tick_values([-3.0, 3.0]), vec![-4.0, -2.0, 0.0, 2.0]);
    }

    #[test]
    fn ticks_step_grows_with_domain() {
        let ticks = generate_tick_values([0.0, 100.0]);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks[1] - ticks[0], 6.0);
        assert!(ticks.len() <= 21);
    }

    #[test]
    fn ticks_reject_non_finite() {
        assert!(generate_tick_values([f64::NAN, 1.0]).is_empty());
        assert!(generate_tick_values([0.0, f64::INFINITY]).is_empty());
    }

    #[test]
    fn base_scale_inverts_y() {
        let scales = base_scales(&DEFAULT_DOMAIN, Vec2::new(200.0, 100.0));
        let top_right = scales.to_screen(10.0, 10.0);
        assert_relative_eq!(top_right.x, 200.0);
        assert_relative_eq!(top_right.y, 0.0);
        let origin = scales.to_screen(0.0, 0.0);
        assert_relative_eq!(origin.x, 100.0);
        assert_relative_eq!(origin.y, 50.0);
    }

    #[test]
    fn degenerate_scale_inverts_to_identity() {
        let scale = LinearScale::new([5.0, 5.0], [0.0, 100.0]);
        assert_eq!(scale.invert(42.0), 42.0);
        let flat_range = LinearScale::new([0.0, 10.0], [0.0, 0.0]);
        assert_eq!(flat_range.invert(7.0), 7.0);
    }

    #[test]
    fn identity_transform_keeps_base() {
        let base = base_scales(&DEFAULT_DOMAIN, Vec2::new(400.0, 300.0));
        let eff = apply_view_transform(&base, &ViewTransform::IDENTITY);
        assert_relative_eq!(eff.x.domain()[0], -10.0);
        assert_relative_eq!(eff.x.domain()[1], 10.0);
        assert_relative_eq!(eff.y.domain()[0], -10.0);
        assert_relative_eq!(eff.y.domain()[1], 10.0);
    }

    #[test]
    fn zoom_about_center_halves_visible_domain() {
        let size = Vec2::new(400.0, 300.0);
        let base = base_scales(&DEFAULT_DOMAIN, size);
        let t = ViewTransform::IDENTITY.scaled_about(2.0, Pos2::new(200.0, 150.0), [0.1, 50.0]);
        let eff = apply_view_transform(&base, &t);
        let visible = eff.visible_domain();
        assert_relative_eq!(visible.x[0], -5.0, epsilon = 1e-9);
        assert_relative_eq!(visible.x[1], 5.0, epsilon = 1e-9);
        assert_relative_eq!(visible.y[0], -5.0, epsilon = 1e-9);
        assert_relative_eq!(visible.y[1], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn zoom_is_clamped_to_extent() {
        let t = ViewTransform::IDENTITY.scaled_about(1000.0, Pos2::ZERO, [0.1, 50.0]);
        assert_eq!(t.k, 50.0);
        let t = ViewTransform::IDENTITY.scaled_about(0.0001, Pos2::ZERO, [0.1, 50.0]);
        assert_eq!(t.k, 0.1);
    }

    #[test]
    fn pan_shifts_screen_positions() {
        let base = base_scales(&DEFAULT_DOMAIN, Vec2::new(400.0, 300.0));
        let t = ViewTransform::IDENTITY.translated(Vec2::new(20.0, -10.0));
        let eff = apply_view_transform(&base, &t);
        let p = eff.to_screen(0.0, 0.0);
        assert_relative_eq!(p.x, 220.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 140.0, epsilon = 1e-4);
        let (x, y) = eff.to_data(p);
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn point_coords_round_to_integers() {
        let base = base_scales(&DEFAULT_DOMAIN, Vec2::new(200.0, 200.0));
        // 10 px per unit; 123 px -> 2.3 -> 2
        assert_eq!(base.to_point_coords(Pos2::new(123.0, 77.0)), (2, 2));
    }
}
