//! Pointer-driven state machine for the point chart.
//!
//! The engine is toolkit-agnostic: it receives plot-relative pointer
//! positions plus the current time and turns them into store mutations and
//! transient view state. `ui::chart_panel` feeds it from egui.

use std::time::Instant;

use egui::{Pos2, Vec2};

use crate::config::DashboardConfig;
use crate::render::coords::{self, Domain, PlotScales, ViewTransform};
use crate::render::timing::{Delayed, Throttle};
use crate::state::point::{Point, PointId};
use crate::state::point_store::{PointCollectionState, PointStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Panning,
    Dragging(PointId),
}

/// Which pointer cursor the chart surface should show. Applied to the chart
/// area only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Crosshair,
    Grab,
    Grabbing,
}

/// Buttons in the chart's zoom control strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomControl {
    ZoomIn,
    ZoomOut,
    FitAll,
    ResetView,
}

impl ZoomControl {
    pub const ALL: [ZoomControl; 4] = [
        ZoomControl::ZoomIn,
        ZoomControl::ZoomOut,
        ZoomControl::FitAll,
        ZoomControl::ResetView,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ZoomControl::ZoomIn => "+ Zoom In",
            ZoomControl::ZoomOut => "- Zoom Out",
            ZoomControl::FitAll => "Fit All Points",
            ZoomControl::ResetView => "Reset View",
        }
    }
}

/// State of the one drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub point_id: PointId,
    /// Pointer position minus the point's screen position at grab time.
    pub grab_offset: Vec2,
    /// Where the marker is drawn right now (clamped to the plot area).
    pub screen_pos: Pos2,
    pub last_data: (i64, i64),
}

type PendingUpdate = (PointId, i64, i64);

pub struct ChartEngine {
    config: DashboardConfig,
    surface: Vec2,
    domain: Domain,
    transform: ViewTransform,
    drag: Option<DragSession>,
    panning: bool,
    hover_target: Option<PointId>,
    pointer: Option<Pos2>,
    drag_updates: Throttle<PendingUpdate>,
    pending_add: Delayed<Point>,
}

impl ChartEngine {
    pub fn new(config: DashboardConfig) -> Self {
        let surface = Vec2::new(config.min_surface[0], config.min_surface[1]);
        Self {
            drag_updates: Throttle::new(config.drag_throttle()),
            pending_add: Delayed::new(config.add_debounce()),
            config,
            surface,
            domain: coords::DEFAULT_DOMAIN,
            transform: ViewTransform::IDENTITY,
            drag: None,
            panning: false,
            hover_target: None,
            pointer: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    /// Container size changed. The view transform is kept.
    pub fn resize(&mut self, container: Vec2) {
        let [min_w, min_h] = self.config.min_surface;
        let w = if container.x.is_finite() { container.x.max(min_w) } else { min_w };
        let h = if container.y.is_finite() { container.y.max(min_h) } else { min_h };
        let surface = Vec2::new(w, h);
        if surface != self.surface {
            tracing::trace!(width = w, height = h, "chart resized");
            self.surface = surface;
        }
    }

    /// Full chart surface including margins.
    pub fn surface_size(&self) -> Vec2 {
        self.surface
    }

    /// Plotting area inside the margins.
    pub fn plot_size(&self) -> Vec2 {
        let m = &self.config.margins;
        Vec2::new(
            (self.surface.x - m.left - m.right).max(0.0),
            (self.surface.y - m.top - m.bottom).max(0.0),
        )
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn scales(&self) -> PlotScales {
        let base = coords::base_scales(&self.domain, self.plot_size());
        coords::apply_view_transform(&base, &self.transform)
    }

    /// Where a point's marker sits on the plot area. The drag subject is
    /// drawn at its session position rather than its stored coordinates.
    pub fn screen_position(&self, point: &Point) -> Pos2 {
        match &self.drag {
            Some(session) if session.point_id == point.id => session.screen_pos,
            _ => self.scales().to_screen(point.x as f64, point.y as f64),
        }
    }

    pub fn radius_for(&self, state: &PointCollectionState, id: &PointId) -> f32 {
        let radii = &self.config.radii;
        if self.is_drag_subject(id) {
            radii.dragged
        } else if state.is_hovered(id) {
            radii.hovered
        } else {
            radii.default
        }
    }

    /// Topmost point whose marker covers `pos`.
    pub fn hit_test(&self, state: &PointCollectionState, pos: Pos2) -> Option<PointId> {
        let slop = self.config.hit_slop;
        state
            .points
            .iter()
            .rev()
            .find(|p| {
                let r = self.radius_for(state, &p.id) + slop;
                self.screen_position(p).distance(pos) <= r
            })
            .map(|p| p.id.clone())
    }

    // ---------------------------------------------------------------------
    // State
    // ---------------------------------------------------------------------

    pub fn mode(&self) -> InteractionMode {
        match (&self.drag, self.panning) {
            (Some(session), _) => InteractionMode::Dragging(session.point_id.clone()),
            (None, true) => InteractionMode::Panning,
            (None, false) => InteractionMode::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_drag_subject(&self, id: &PointId) -> bool {
        self.drag.as_ref().is_some_and(|s| &s.point_id == id)
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    /// Point under the hovering pointer, as last seen by [`ChartEngine::hover`].
    pub fn hover_target(&self) -> Option<&PointId> {
        self.hover_target.as_ref()
    }

    pub fn controls_enabled(&self) -> bool {
        self.drag.is_none()
    }

    pub fn cursor_hint(&self) -> CursorHint {
        if self.drag.is_some() || self.panning {
            CursorHint::Grabbing
        } else if self.hover_target.is_some() {
            CursorHint::Grab
        } else if self.pointer.is_some() {
            CursorHint::Crosshair
        } else {
            CursorHint::Default
        }
    }

    pub fn pending_add(&self) -> Option<&Point> {
        self.pending_add.peek()
    }

    /// Reconcile with the latest store snapshot. Called once per frame before
    /// input is handled.
    pub fn refresh(&mut self, state: &PointCollectionState) {
        if let Some(session) = &self.drag {
            if !state.contains(&session.point_id) {
                tracing::debug!(id = %session.point_id, "drag subject removed, dropping drag");
                self.drag = None;
                self.drag_updates.cancel();
            }
        }
        if self.drag.is_none() {
            self.domain = coords::compute_domain(&state.points);
        }
        if let Some(target) = &self.hover_target {
            if !state.contains(target) {
                self.hover_target = None;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Pointer gestures
    // ---------------------------------------------------------------------

    /// Pointer pressed at `pos`. Starts a drag if a point is under the
    /// pointer and no drag is active. Returns `true` if a drag started.
    pub fn pointer_down(&mut self, pos: Pos2, store: &mut PointStore) -> bool {
        if let Some(session) = &self.drag {
            tracing::debug!(active = %session.point_id, "ignoring pointer down during drag");
            return false;
        }
        if self.panning {
            return false;
        }
        let Some(id) = self.hit_test(store.snapshot(), pos) else {
            return false;
        };
        let Some(point) = store.snapshot().point(&id) else {
            return false;
        };
        let screen_pos = self.screen_position(point);
        let session = DragSession {
            point_id: id.clone(),
            grab_offset: pos - screen_pos,
            screen_pos,
            last_data: (point.x, point.y),
        };
        tracing::debug!(%id, "drag start");
        self.drag = Some(session);
        self.pointer = Some(pos);
        self.hover_target = None;
        if store.hovered_id().is_some() {
            store.set_hovered(None);
        }
        true
    }

    /// Pointer moved while pressed. Moves the drag subject; store updates are
    /// rate limited.
    pub fn pointer_move(&mut self, pos: Pos2, now: Instant, store: &mut PointStore) {
        self.pointer = Some(pos);
        let Some(update) = self.move_subject(pos) else {
            return;
        };
        if let Some(update) = self.drag_updates.offer(update, now) {
            apply_update(store, update);
        }
    }

    /// Pointer released. Ends the drag with one authoritative update at the
    /// release position, discarding any throttled update still pending.
    pub fn pointer_up(&mut self, pos: Pos2, store: &mut PointStore) {
        self.pointer = Some(pos);
        if self.drag.is_some() {
            let update = self.move_subject(pos);
            self.finish_drag(update, store);
        }
        self.panning = false;
    }

    /// The drag ended without a release position (pointer lost, escape).
    /// Commits the last known position.
    pub fn cancel_drag(&mut self, store: &mut PointStore) {
        let update = self
            .drag
            .as_ref()
            .map(|s| (s.point_id.clone(), s.last_data.0, s.last_data.1));
        self.finish_drag(update, store);
    }

    fn finish_drag(&mut self, update: Option<PendingUpdate>, store: &mut PointStore) {
        self.drag_updates.cancel();
        if let Some(session) = self.drag.take() {
            tracing::debug!(id = %session.point_id, "drag end");
        }
        if let Some(update) = update {
            apply_update(store, update);
        }
    }

    fn move_subject(&mut self, pos: Pos2) -> Option<PendingUpdate> {
        let plot = self.plot_size();
        let scales = self.scales();
        let session = self.drag.as_mut()?;
        let target = pos - session.grab_offset;
        let clamped = Pos2::new(target.x.clamp(0.0, plot.x), target.y.clamp(0.0, plot.y));
        let (x, y) = scales.to_point_coords(clamped);
        session.screen_pos = clamped;
        session.last_data = (x, y);
        Some((session.point_id.clone(), x, y))
    }

    /// Click (press and release without a drag) at `pos`. Clicking empty
    /// background schedules an add; bursts coalesce to the latest click.
    pub fn click(&mut self, pos: Pos2, now: Instant, store: &PointStore) {
        if self.drag.is_some() || self.panning {
            return;
        }
        if self.hit_test(store.snapshot(), pos).is_some() {
            return;
        }
        let plot = self.plot_size();
        if pos.x < 0.0 || pos.y < 0.0 || pos.x > plot.x || pos.y > plot.y {
            return;
        }
        let (x, y) = self.scales().to_point_coords(pos);
        self.pending_add.schedule(Point::with_generated_id(x, y), now);
    }

    /// Pointer hovering (no button held), or `None` when it left the chart.
    /// Dispatches hover changes only on enter/leave transitions.
    pub fn hover(&mut self, pos: Option<Pos2>, store: &mut PointStore) {
        if self.drag.is_some() {
            return;
        }
        self.pointer = pos;
        if self.panning {
            return;
        }
        let target = pos.and_then(|p| self.hit_test(store.snapshot(), p));
        if target == self.hover_target {
            return;
        }
        match &target {
            Some(id) => store.set_hovered(Some(id.clone())),
            None => {
                if self.hover_target.is_some() && store.hovered_id() == self.hover_target.as_ref() {
                    store.set_hovered(None);
                }
            }
        }
        self.hover_target = target;
    }

    // ---------------------------------------------------------------------
    // Pan / zoom
    // ---------------------------------------------------------------------

    pub fn pan_start(&mut self) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.panning = true;
        true
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if self.panning && self.drag.is_none() {
            self.transform = self.transform.translated(delta);
        }
    }

    pub fn pan_end(&mut self) {
        self.panning = false;
    }

    /// Wheel zoom about the pointer. Positive `scroll` zooms in.
    pub fn wheel(&mut self, pos: Pos2, scroll: f32) {
        if self.drag.is_some() || scroll == 0.0 {
            return;
        }
        let factor = 2f64.powf(scroll as f64 * self.config.wheel_zoom_rate);
        self.transform = self.transform.scaled_about(factor, pos, self.config.zoom_extent);
    }

    /// Apply a zoom control button. Inert while dragging.
    pub fn apply_control(&mut self, control: ZoomControl, state: &PointCollectionState) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let center = (self.plot_size() / 2.0).to_pos2();
        let extent = self.config.zoom_extent;
        match control {
            ZoomControl::ZoomIn => {
                self.transform = self.transform.scaled_about(self.config.zoom_step, center, extent);
            }
            ZoomControl::ZoomOut => {
                self.transform = self
                    .transform
                    .scaled_about(1.0 / self.config.zoom_step, center, extent);
            }
            ZoomControl::FitAll => {
                self.domain = coords::compute_domain(&state.points);
                self.transform = ViewTransform::IDENTITY;
            }
            ZoomControl::ResetView => {
                self.transform = ViewTransform::IDENTITY;
            }
        }
        tracing::debug!(?control, k = self.transform.k, "view control");
        true
    }

    // ---------------------------------------------------------------------
    // Timers
    // ---------------------------------------------------------------------

    /// Fire timers that are due. Returns the id of a point added by a
    /// debounced click, if one landed.
    pub fn tick(&mut self, now: Instant, store: &mut PointStore) -> Option<PointId> {
        if let Some(update) = self.drag_updates.poll(now) {
            apply_update(store, update);
        }
        let point = self.pending_add.take_due(now)?;
        let id = point.id.clone();
        store.add_point(point);
        Some(id)
    }

    /// Earliest instant at which [`ChartEngine::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.drag_updates.deadline(), self.pending_add.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drop every pending timer and the drag session without touching the
    /// store. Used when the chart goes away.
    pub fn teardown(&mut self) {
        self.pending_add.cancel();
        self.drag_updates.cancel();
        self.drag = None;
        self.panning = false;
        self.hover_target = None;
        self.pointer = None;
    }
}

fn apply_update(store: &mut PointStore, (id, x, y): PendingUpdate) {
    if store.contains(&id) {
        store.update_point(&id, x, y);
    } else {
        tracing::debug!(%id, "skipping update for removed point");
    }
}
