//! The render step: a pure function from store snapshot and engine view state
//! to a description of what the chart should show. Painting the description
//! is `ui::chart_panel`'s job.

use egui::{Color32, Pos2, Vec2};

use crate::error::RenderError;
use crate::render::coords::{self, Domain};
use crate::render::interaction::{ChartEngine, CursorHint};
use crate::state::point::PointId;
use crate::state::point_store::PointCollectionState;
use crate::state::theme::{POINT_DEFAULT_FILL, POINT_DRAG_FILL, POINT_HOVER_FILL};

/// Offset of the tooltip from the pointer.
const HOVER_TOOLTIP_OFFSET: Vec2 = Vec2::new(15.0, -10.0);
const DRAG_TOOLTIP_OFFSET: Vec2 = Vec2::new(20.0, -10.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStyle {
    Default,
    Hovered,
    Dragged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointMarker {
    pub id: PointId,
    pub center: Pos2,
    pub radius: f32,
    pub fill: Color32,
    pub stroke_width: f32,
    pub style: PointStyle,
}

impl PointMarker {
    pub fn has_shadow(&self) -> bool {
        self.style == PointStyle::Dragged
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    /// Position along the axis on the plot area.
    pub pixel: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub anchor: Pos2,
    pub lines: Vec<String>,
    pub dragging: bool,
}

/// Everything needed to paint one chart frame. Coordinates are relative to
/// the plot area's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub plot_size: Vec2,
    pub visible_domain: Domain,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
    /// Paint order: the drag subject is last so it sits on top.
    pub markers: Vec<PointMarker>,
    pub tooltip: Option<Tooltip>,
    pub cursor: CursorHint,
    pub controls_enabled: bool,
}

pub fn build_scene(state: &PointCollectionState, engine: &ChartEngine) -> Result<ChartScene, RenderError> {
    let plot_size = engine.plot_size();
    if !(plot_size.x > 0.0 && plot_size.y > 0.0) || !plot_size.x.is_finite() || !plot_size.y.is_finite() {
        return Err(RenderError::DegenerateSurface {
            width: plot_size.x,
            height: plot_size.y,
        });
    }

    let scales = engine.scales();
    let visible_domain = scales.visible_domain();

    let x_ticks = coords::generate_tick_values(visible_domain.x)
        .into_iter()
        .map(|value| (value, scales.x.apply(value) as f32))
        .filter(|(_, px)| (0.0..=plot_size.x).contains(px))
        .map(|(value, pixel)| AxisTick {
            value,
            pixel,
            label: coords::format_tick_value(value),
        })
        .collect();
    let y_ticks = coords::generate_tick_values(visible_domain.y)
        .into_iter()
        .map(|value| (value, scales.y.apply(value) as f32))
        .filter(|(_, px)| (0.0..=plot_size.y).contains(px))
        .map(|(value, pixel)| AxisTick {
            value,
            pixel,
            label: coords::format_tick_value(value),
        })
        .collect();

    let radii = &engine.config().radii;
    let mut markers = Vec::with_capacity(state.points.len());
    let mut raised = None;
    for point in &state.points {
        let center = engine.screen_position(point);
        if !center.x.is_finite() || !center.y.is_finite() {
            return Err(RenderError::NonFinitePosition {
                id: point.id.to_string(),
            });
        }
        let style = if engine.is_drag_subject(&point.id) {
            PointStyle::Dragged
        } else if state.is_hovered(&point.id) {
            PointStyle::Hovered
        } else {
            PointStyle::Default
        };
        let (radius, fill, stroke_width) = match style {
            PointStyle::Dragged => (radii.dragged, POINT_DRAG_FILL, 3.0),
            PointStyle::Hovered => (radii.hovered, POINT_HOVER_FILL, 2.0),
            PointStyle::Default => (radii.default, POINT_DEFAULT_FILL, 2.0),
        };
        let marker = PointMarker {
            id: point.id.clone(),
            center,
            radius,
            fill,
            stroke_width,
            style,
        };
        if style == PointStyle::Dragged {
            raised = Some(marker);
        } else {
            markers.push(marker);
        }
    }
    markers.extend(raised);

    Ok(ChartScene {
        plot_size,
        visible_domain,
        x_ticks,
        y_ticks,
        markers,
        tooltip: build_tooltip(state, engine),
        cursor: engine.cursor_hint(),
        controls_enabled: engine.controls_enabled(),
    })
}

fn build_tooltip(state: &PointCollectionState, engine: &ChartEngine) -> Option<Tooltip> {
    let pointer = engine.pointer()?;
    if let Some(session) = engine.drag_session() {
        let (x, y) = session.last_data;
        return Some(Tooltip {
            anchor: pointer + DRAG_TOOLTIP_OFFSET,
            lines: vec![
                "DRAGGING POINT".to_string(),
                format!("Current: ({x}, {y})"),
                format!("ID: {}", session.point_id),
                "Release to place".to_string(),
            ],
            dragging: true,
        });
    }
    let point = state.point(engine.hover_target()?)?;
    Some(Tooltip {
        anchor: pointer + HOVER_TOOLTIP_OFFSET,
        lines: vec![
            format!("Point: ({}, {})", point.x, point.y),
            format!("ID: {}", point.id),
            "Click and drag to move".to_string(),
        ],
        dragging: false,
    })
}
