use std::time::Instant;

use crate::config::DashboardConfig;
use crate::error::RenderError;
use crate::render::interaction::{ChartEngine, CursorHint, ZoomControl};
use crate::render::scene::{self, ChartScene, Tooltip};
use crate::state::point::PointId;
use crate::state::point_store::{PointCollectionState, PointStore};
use crate::state::theme::Theme;

/// Helper to create a toolbar button with consistent min size.
fn toolbar_btn(ui: &mut egui::Ui, label: &str, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

fn cursor_icon(hint: CursorHint) -> egui::CursorIcon {
    match hint {
        CursorHint::Default => egui::CursorIcon::Default,
        CursorHint::Crosshair => egui::CursorIcon::Crosshair,
        CursorHint::Grab => egui::CursorIcon::Grab,
        CursorHint::Grabbing => egui::CursorIcon::Grabbing,
    }
}

/// The interactive scatter chart: feeds egui input into the [`ChartEngine`]
/// and paints the resulting scene.
pub struct ChartPanel {
    engine: ChartEngine,
    /// Last scene that built successfully; painted again if a rebuild fails.
    last_scene: Option<ChartScene>,
}

impl ChartPanel {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            engine: ChartEngine::new(config),
            last_scene: None,
        }
    }

    pub fn engine(&self) -> &ChartEngine {
        &self.engine
    }

    pub fn last_scene(&self) -> Option<&ChartScene> {
        self.last_scene.as_ref()
    }

    /// Rebuild the scene from the current snapshot.
    pub fn rebuild_scene(&mut self, state: &PointCollectionState) {
        let built = scene::build_scene(state, &self.engine);
        self.accept_scene(built);
    }

    /// A failed build leaves the previous scene in place.
    fn accept_scene(&mut self, built: Result<ChartScene, RenderError>) {
        match built {
            Ok(scene) => self.last_scene = Some(scene),
            Err(e) => tracing::error!("Failed to build chart scene: {e}"),
        }
    }

    /// Cancel timers and any drag in progress.
    pub fn teardown(&mut self) {
        self.engine.teardown();
    }

    /// Render the chart into `ui`, which should offer `height` pixels.
    /// Returns the id of a point added by a click this frame, if any.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        store: &mut PointStore,
        theme: &Theme,
        height: f32,
        now: Instant,
    ) -> Option<PointId> {
        self.engine.refresh(store.snapshot());
        let added = self.engine.tick(now, store);

        // --- Title row with zoom controls ---
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Points Chart").strong().size(16.0));
            ui.separator();
            let enabled = self.engine.controls_enabled();
            for control in ZoomControl::ALL {
                if toolbar_btn(ui, control.label(), enabled).clicked() {
                    self.engine.apply_control(control, store.snapshot());
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("Click to add, drag a point to move, drag background to pan, scroll to zoom")
                        .weak()
                        .small(),
                );
            });
        });
        ui.add_space(4.0);

        // --- Layout ---
        let title_height = 34.0;
        self.engine
            .resize(egui::vec2(ui.available_width(), (height - title_height).max(0.0)));
        let total_rect = ui.allocate_space(self.engine.surface_size()).1;
        let margins = self.engine.config().margins;
        let plot_rect = egui::Rect::from_min_size(
            total_rect.min + egui::vec2(margins.left, margins.top),
            self.engine.plot_size(),
        );

        // --- Input ---
        let plot_id = ui.id().with("points_chart");
        let response = ui.interact(plot_rect, plot_id, egui::Sense::click_and_drag());
        let to_local = |p: egui::Pos2| (p - plot_rect.min).to_pos2();

        if response.drag_started() {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            let grabbed = origin
                .map(|p| self.engine.pointer_down(to_local(p), store))
                .unwrap_or(false);
            if !grabbed {
                self.engine.pan_start();
            }
        }
        if response.dragged() {
            if self.engine.is_dragging() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.engine.pointer_move(to_local(pos), now, store);
                }
            } else {
                self.engine.pan_by(response.drag_delta());
            }
        }
        if response.drag_stopped() {
            if self.engine.is_dragging() {
                let release = response
                    .interact_pointer_pos()
                    .or_else(|| ui.input(|i| i.pointer.latest_pos()));
                match release {
                    Some(pos) => self.engine.pointer_up(to_local(pos), store),
                    None => self.engine.cancel_drag(store),
                }
            }
            self.engine.pan_end();
        } else if self.engine.is_dragging()
            && !response.dragged()
            && !ui.input(|i| i.pointer.primary_down())
        {
            // Pointer capture was lost without a release event.
            self.engine.cancel_drag(store);
        }
        if self.engine.is_dragging() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.engine.cancel_drag(store);
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.engine.click(to_local(pos), now, store);
            }
        }
        if let Some(pos) = response.hover_pos() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.engine.wheel(to_local(pos), scroll);
            }
        }
        if !response.dragged() {
            self.engine.hover(response.hover_pos().map(to_local), store);
        }

        // --- Render ---
        self.rebuild_scene(store.snapshot());

        let painter = ui.painter_at(total_rect);
        painter.rect_filled(plot_rect, 0.0, theme.plot_bg());
        if let Some(scene) = &self.last_scene {
            paint_scene(&painter, scene, plot_rect, total_rect, theme);
            if let Some(tooltip) = &scene.tooltip {
                let layer = egui::LayerId::new(egui::Order::Tooltip, plot_id.with("tooltip"));
                paint_tooltip(&ui.ctx().layer_painter(layer), tooltip, plot_rect);
            }
        }

        response.on_hover_and_drag_cursor(cursor_icon(self.engine.cursor_hint()));

        if let Some(deadline) = self.engine.next_deadline() {
            ui.ctx()
                .request_repaint_after(deadline.saturating_duration_since(now));
        }

        added
    }
}

// ---------------------------------------------------------------------------
// Painting
// ---------------------------------------------------------------------------

fn paint_scene(
    painter: &egui::Painter,
    scene: &ChartScene,
    plot_rect: egui::Rect,
    total_rect: egui::Rect,
    theme: &Theme,
) {
    let text_color = painter.ctx().style().visuals.text_color();
    let dim_color = text_color.gamma_multiply(0.6);
    let grid = egui::Stroke::new(1.0, theme.grid_color());
    let font = egui::FontId::proportional(10.0);

    // --- Grid and tick labels ---
    for tick in &scene.x_ticks {
        let x = plot_rect.left() + tick.pixel;
        painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(x, plot_rect.top()), egui::pos2(x, plot_rect.bottom())],
            grid,
            3.0,
            3.0,
        ));
        painter.text(
            egui::pos2(x, plot_rect.bottom() + 4.0),
            egui::Align2::CENTER_TOP,
            &tick.label,
            font.clone(),
            dim_color,
        );
    }
    for tick in &scene.y_ticks {
        let y = plot_rect.top() + tick.pixel;
        painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(plot_rect.left(), y), egui::pos2(plot_rect.right(), y)],
            grid,
            3.0,
            3.0,
        ));
        painter.text(
            egui::pos2(plot_rect.left() - 6.0, y),
            egui::Align2::RIGHT_CENTER,
            &tick.label,
            font.clone(),
            dim_color,
        );
    }

    // --- Plot border and axis titles ---
    painter.rect_stroke(
        plot_rect,
        0.0,
        egui::Stroke::new(1.0, theme.axis_color()),
        egui::StrokeKind::Outside,
    );
    painter.text(
        egui::pos2(plot_rect.center().x, total_rect.bottom() - 8.0),
        egui::Align2::CENTER_BOTTOM,
        "X",
        egui::FontId::proportional(12.0),
        text_color,
    );
    painter.text(
        egui::pos2(total_rect.left() + 8.0, plot_rect.center().y),
        egui::Align2::LEFT_CENTER,
        "Y",
        egui::FontId::proportional(12.0),
        text_color,
    );

    // --- Points, clipped to the plot area ---
    let points_painter = painter.with_clip_rect(plot_rect);
    for marker in &scene.markers {
        let center = plot_rect.min + marker.center.to_vec2();
        if marker.has_shadow() {
            points_painter.circle_filled(
                center + egui::vec2(0.0, 4.0),
                marker.radius + 3.0,
                egui::Color32::from_black_alpha(60),
            );
        }
        points_painter.circle(
            center,
            marker.radius,
            marker.fill,
            egui::Stroke::new(marker.stroke_width, theme.point_stroke()),
        );
    }
}

fn paint_tooltip(painter: &egui::Painter, tooltip: &Tooltip, plot_rect: egui::Rect) {
    let font = egui::FontId::monospace(13.0);
    let text = tooltip.lines.join("\n");
    let galley = painter.layout_no_wrap(text, font, egui::Color32::WHITE);
    let text_rect = galley.rect;

    let pos = plot_rect.min + tooltip.anchor.to_vec2();
    let bg_rect = egui::Rect::from_min_size(
        pos,
        egui::vec2(text_rect.width() + 24.0, text_rect.height() + 24.0),
    );
    let border = if tooltip.dragging {
        egui::Color32::from_rgb(0xff, 0x6b, 0x6b)
    } else {
        egui::Color32::from_white_alpha(76)
    };

    painter.rect_filled(
        bg_rect.translate(egui::vec2(0.0, 4.0)),
        8.0,
        egui::Color32::from_black_alpha(100),
    );
    painter.rect_filled(bg_rect, 8.0, egui::Color32::from_black_alpha(242));
    painter.rect_stroke(bg_rect, 8.0, egui::Stroke::new(2.0, border), egui::StrokeKind::Inside);
    painter.galley(pos + egui::vec2(12.0, 12.0), galley, egui::Color32::WHITE);
}
