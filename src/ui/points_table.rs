use std::time::{Duration, Instant};

use crate::render::timing::Delayed;
use crate::state::point::PointId;
use crate::state::point_store::PointStore;
use crate::state::theme::Theme;

/// Actions that the points table requests from the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    None,
    AddPoint,
    Edit(PointId),
    Delete(PointId),
    ExportCsv,
}

/// Table-local view state: which row the pointer is over and which point
/// was added most recently.
pub struct PointsTable {
    newest: Delayed<PointId>,
    hovered_row: Option<PointId>,
}

impl PointsTable {
    pub fn new(highlight: Duration) -> Self {
        Self {
            newest: Delayed::new(highlight),
            hovered_row: None,
        }
    }

    /// Highlight `id` as just added. Replaces any earlier highlight.
    pub fn mark_added(&mut self, id: PointId, now: Instant) {
        self.newest.schedule(id, now);
    }

    pub fn newest(&self) -> Option<&PointId> {
        self.newest.peek()
    }

    /// Drop the highlight once it has been shown long enough.
    pub fn expire(&mut self, now: Instant) {
        if let Some(id) = self.newest.take_due(now) {
            tracing::trace!(%id, "highlight expired");
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.newest.deadline()
    }

    /// Pointer is over `row` (or over no row). Dispatches only on changes;
    /// leaving clears the shared hover only if this table set it.
    pub fn row_hover(&mut self, row: Option<PointId>, store: &mut PointStore) {
        if row == self.hovered_row {
            return;
        }
        match &row {
            Some(id) => store.set_hovered(Some(id.clone())),
            None => {
                if store.hovered_id() == self.hovered_row.as_ref() {
                    store.set_hovered(None);
                }
            }
        }
        self.hovered_row = row;
    }

    /// Render the table. Hover intents go straight to the store; everything
    /// else comes back as a [`TableAction`].
    pub fn show(&mut self, ui: &mut egui::Ui, store: &mut PointStore, theme: &Theme) -> TableAction {
        use egui_extras::{Column, TableBuilder};

        let mut action = TableAction::None;

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Points Table").strong().size(16.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let export_btn = ui.add_enabled(
                    !store.is_empty(),
                    egui::Button::new("Export CSV").min_size(egui::vec2(0.0, 26.0)),
                );
                if export_btn.on_hover_text("Write all points to a CSV file").clicked() {
                    action = TableAction::ExportCsv;
                }
                let add_btn = egui::Button::new(egui::RichText::new("+ Add Point").strong())
                    .min_size(egui::vec2(0.0, 26.0));
                if ui.add(add_btn).clicked() {
                    action = TableAction::AddPoint;
                }
            });
        });
        ui.add_space(4.0);

        if store.is_empty() {
            ui.label(egui::RichText::new("No points yet. Click the chart or use \"+ Add Point\".").weak());
            self.row_hover(None, store);
            return action;
        }

        let newest = self.newest().cloned();
        let highlight = theme.just_added_row();
        let mut hovered_now: Option<PointId> = None;
        let max_height = ui.available_height();

        {
            let state = store.snapshot();
            let table = TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .sense(egui::Sense::hover())
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(90.0))
                .columns(Column::auto().at_least(70.0), 2)
                .column(Column::remainder().at_least(120.0))
                .min_scrolled_height(0.0)
                .max_scroll_height(max_height);

            table
                .header(20.0, |mut header| {
                    for title in ["ID", "X", "Y", "Actions"] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|body| {
                    body.rows(24.0, state.points.len(), |mut row| {
                        let point = &state.points[row.index()];
                        let is_newest = newest.as_ref() == Some(&point.id);
                        row.set_selected(state.is_hovered(&point.id));

                        let tint = |ui: &mut egui::Ui| {
                            if is_newest {
                                ui.painter().rect_filled(ui.max_rect(), 0.0, highlight);
                            }
                        };

                        row.col(|ui| {
                            tint(ui);
                            ui.label(egui::RichText::new(point.id.short(6)).monospace())
                                .on_hover_text(point.id.as_str());
                        });
                        row.col(|ui| {
                            tint(ui);
                            ui.label(point.x.to_string());
                        });
                        row.col(|ui| {
                            tint(ui);
                            ui.label(point.y.to_string());
                        });
                        row.col(|ui| {
                            tint(ui);
                            if ui.small_button("Edit").clicked() {
                                action = TableAction::Edit(point.id.clone());
                            }
                            if ui.small_button("Delete").clicked() {
                                action = TableAction::Delete(point.id.clone());
                            }
                        });

                        if row.response().hovered() {
                            hovered_now = Some(point.id.clone());
                        }
                    });
                });
        }

        self.row_hover(hovered_now, store);
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::point::Point;

    fn store() -> PointStore {
        PointStore::with_points(vec![Point::new("a", 1, 1), Point::new("b", 2, 2)])
    }

    #[test]
    fn row_hover_dispatches_on_change_only() {
        let mut store = store();
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let c = calls.clone();
        store.subscribe(move |_| c.set(c.get() + 1));
        let mut table = PointsTable::new(Duration::from_secs(3));

        table.row_hover(Some(PointId::new("a")), &mut store);
        table.row_hover(Some(PointId::new("a")), &mut store);
        assert_eq!(calls.get(), 1);
        assert_eq!(store.hovered_id(), Some(&PointId::new("a")));

        table.row_hover(Some(PointId::new("b")), &mut store);
        table.row_hover(None, &mut store);
        assert_eq!(calls.get(), 3);
        assert_eq!(store.hovered_id(), None);
    }

    #[test]
    fn leaving_table_keeps_chart_hover() {
        let mut store = store();
        let mut table = PointsTable::new(Duration::from_secs(3));
        table.row_hover(Some(PointId::new("a")), &mut store);
        store.set_hovered(Some(PointId::new("b")));
        table.row_hover(None, &mut store);
        assert_eq!(store.hovered_id(), Some(&PointId::new("b")));
    }

    #[test]
    fn newest_highlight_expires_and_is_superseded() {
        let t0 = Instant::now();
        let mut table = PointsTable::new(Duration::from_secs(3));
        table.mark_added(PointId::new("a"), t0);
        table.mark_added(PointId::new("b"), t0 + Duration::from_secs(1));
        assert_eq!(table.newest(), Some(&PointId::new("b")));

        table.expire(t0 + Duration::from_secs(3));
        assert_eq!(table.newest(), Some(&PointId::new("b")));
        table.expire(t0 + Duration::from_secs(4));
        assert_eq!(table.newest(), None);
        assert_eq!(table.next_deadline(), None);
    }

    #[test]
    fn show_renders_rows_without_pointer() {
        let ctx = egui::Context::default();
        let mut store = store();
        let mut table = PointsTable::new(Duration::from_secs(3));
        let theme = Theme::default();
        let mut action = TableAction::ExportCsv;

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = table.show(ui, &mut store, &theme);
            });
        });

        assert_eq!(action, TableAction::None);
        assert_eq!(store.hovered_id(), None);
        assert_eq!(store.len(), 2);
    }
}
