use std::time::Instant;

use eframe::egui;

use crate::config::DashboardConfig;
use crate::data::points_io;
use crate::error::AppError;
use crate::state::point::Point;
use crate::state::point_store::{PointStore, SubscriptionId};
use crate::state::theme::Theme;
use crate::ui::chart_panel::ChartPanel;
use crate::ui::point_modal::{self, ModalMode, ModalResult, PointModalState};
use crate::ui::points_table::{PointsTable, TableAction};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The point dashboard: chart above, table below, both driven by one store.
pub struct PointDashApp {
    store: PointStore,
    chart: ChartPanel,
    table: PointsTable,
    /// Add/edit modal, while open.
    modal: Option<PointModalState>,
    theme: Theme,
    /// An error message shown in the footer until dismissed.
    error_message: Option<String>,
    subscription: Option<SubscriptionId>,
}

impl PointDashApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let theme = Theme::default();

        // --- Global UI style ---
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(22.0));
        style.text_styles.insert(egui::TextStyle::Small, egui::FontId::proportional(12.0));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);
        ctx.set_style(style);
        ctx.set_visuals(themed_visuals(theme));

        // Any store change (including ones made by timers) needs a new frame.
        let mut store = PointStore::new();
        let repaint_ctx = ctx.clone();
        let subscription = store.subscribe(move |state| {
            tracing::trace!(points = state.points.len(), hovered = ?state.hovered_id, "store changed");
            repaint_ctx.request_repaint();
        });

        Self {
            store,
            table: PointsTable::new(config.highlight()),
            chart: ChartPanel::new(config),
            modal: None,
            theme,
            error_message: None,
            subscription: Some(subscription),
        }
    }

    fn save_points(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("points.json")
            .add_filter("Points", &["json"])
            .save_file()
        else {
            return;
        };
        match points_io::save_points_json(&path, self.store.points()) {
            Ok(()) => tracing::info!("Saved {} points to {:?}", self.store.len(), path),
            Err(e) => self.report("Failed to save points", e),
        }
    }

    fn load_points(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Points", &["json"])
            .add_filter("All Files", &["*"])
            .pick_file()
        else {
            return;
        };
        match points_io::load_points_json(&path) {
            Ok(points) => {
                tracing::info!("Loaded {} points from {:?}", points.len(), path);
                self.store.set_points(points);
            }
            Err(e) => self.report("Failed to load points", e),
        }
    }

    fn export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("points.csv")
            .add_filter("CSV Files", &["csv"])
            .save_file()
        else {
            return;
        };
        match points_io::export_points_csv(&path, self.store.points()) {
            Ok(()) => tracing::info!("Exported CSV to {:?}", path),
            Err(e) => self.report("Failed to export CSV", e),
        }
    }

    fn report(&mut self, context: &str, err: AppError) {
        tracing::error!("{context}: {err}");
        self.error_message = Some(format!("{context}: {err}"));
    }

    fn handle_table_action(&mut self, action: TableAction) {
        match action {
            TableAction::None => {}
            TableAction::AddPoint => self.modal = Some(PointModalState::add()),
            TableAction::Edit(id) => {
                if let Some(point) = self.store.snapshot().point(&id) {
                    self.modal = Some(PointModalState::edit(point));
                }
            }
            TableAction::Delete(id) => self.store.remove_point(&id),
            TableAction::ExportCsv => self.export_csv(),
        }
    }

    fn handle_modal_result(&mut self, mode: ModalMode, result: ModalResult, now: Instant) {
        let ModalResult::Save { x, y } = result else {
            return;
        };
        match mode {
            ModalMode::Add => {
                let point = Point::with_generated_id(x, y);
                let id = point.id.clone();
                self.store.add_point(point);
                self.table.mark_added(id, now);
            }
            ModalMode::Edit(id) => self.store.update_point(&id, x, y),
        }
    }
}

impl Drop for PointDashApp {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(subscription);
        }
        self.chart.teardown();
    }
}

fn themed_visuals(theme: Theme) -> egui::Visuals {
    let mut vis = theme.visuals();
    vis.window_corner_radius = egui::CornerRadius::same(8);
    vis.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.active.corner_radius = egui::CornerRadius::same(6);
    vis
}

impl eframe::App for PointDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(themed_visuals(self.theme));
        let now = Instant::now();
        self.table.expire(now);

        // --- Header panel ---
        let mut save_points = false;
        let mut load_points = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Point Dashboard");
                    ui.separator();

                    if ui.button("Save Points").clicked() {
                        save_points = true;
                    }
                    if ui.button("Load Points").clicked() {
                        load_points = true;
                    }
                    let clear_btn = ui.add_enabled(!self.store.is_empty(), egui::Button::new("Clear All"));
                    if clear_btn.clicked() {
                        self.store.set_points(Vec::new());
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = match self.theme {
                            Theme::Dark => "Light Mode",
                            Theme::Light => "Dark Mode",
                        };
                        if ui.button(theme_label).clicked() {
                            self.theme = self.theme.toggle();
                            tracing::debug!(theme = self.theme.label(), "theme changed");
                        }

                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        if save_points {
            self.save_points();
        }
        if load_points {
            self.load_points();
        }

        // --- Footer panel ---
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let count = self.store.len();
                    let label = if count == 1 { "1 point".to_string() } else { format!("{count} points") };
                    ui.label(egui::RichText::new(label).weak());

                    if let Some(point) = self.store.snapshot().hovered_point() {
                        ui.separator();
                        ui.label(egui::RichText::new(format!("Hovered: ({}, {})", point.x, point.y)).weak());
                    }

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        // --- Central panel: chart above, table below ---
        let mut table_action = TableAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let chart_height = (ui.available_height() * 0.62).max(360.0);
            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(10))
                .corner_radius(egui::CornerRadius::same(8))
                .show(ui, |ui| {
                    let added = self.chart.show(ui, &mut self.store, &self.theme, chart_height, now);
                    if let Some(id) = added {
                        self.table.mark_added(id, now);
                    }
                });

            ui.add_space(10.0);

            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(10))
                .corner_radius(egui::CornerRadius::same(8))
                .show(ui, |ui| {
                    table_action = self.table.show(ui, &mut self.store, &self.theme);
                });
        });

        self.handle_table_action(table_action);

        // --- Point modal ---
        if let Some(state) = self.modal.as_mut() {
            if let Some(result) = point_modal::show_point_modal(ctx, state) {
                let mode = state.mode.clone();
                self.modal = None;
                self.handle_modal_result(mode, result, now);
            }
        }

        if let Some(deadline) = self.table.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}
