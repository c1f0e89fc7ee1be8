use crate::state::point::{Point, PointId};

/// Whether the modal creates a new point or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode {
    Add,
    Edit(PointId),
}

/// Persistent state for the point entry modal while it is open.
#[derive(Debug, Clone)]
pub struct PointModalState {
    pub mode: ModalMode,
    pub x_text: String,
    pub y_text: String,
}

impl PointModalState {
    /// Fields start at 0.
    pub fn add() -> Self {
        Self {
            mode: ModalMode::Add,
            x_text: "0".to_string(),
            y_text: "0".to_string(),
        }
    }

    /// Fields start at the point's current coordinates.
    pub fn edit(point: &Point) -> Self {
        Self {
            mode: ModalMode::Edit(point.id.clone()),
            x_text: point.x.to_string(),
            y_text: point.y.to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            ModalMode::Add => "Add Point",
            ModalMode::Edit(_) => "Edit Point",
        }
    }

    /// Current field values after numeric coercion.
    pub fn values(&self) -> (i64, i64) {
        (parse_coord(&self.x_text), parse_coord(&self.y_text))
    }
}

/// Result of the modal interaction each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalResult {
    Save { x: i64, y: i64 },
    Close,
}

/// Coerce field text to an integer coordinate. Unparsable or empty text
/// becomes 0; fractional values round half away from zero.
pub fn parse_coord(text: &str) -> i64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v.round() as i64,
        _ => 0,
    }
}

/// Show the point modal. Returns `Some(ModalResult)` when the user saves or
/// closes it, `None` while it is still open.
pub fn show_point_modal(ctx: &egui::Context, state: &mut PointModalState) -> Option<ModalResult> {
    let mut result = None;
    let mut open = true;

    egui::Window::new(state.title())
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("point_modal_fields")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("X Value").strong());
                    ui.add(egui::TextEdit::singleline(&mut state.x_text).desired_width(180.0));
                    ui.end_row();

                    ui.label(egui::RichText::new("Y Value").strong());
                    ui.add(egui::TextEdit::singleline(&mut state.y_text).desired_width(180.0));
                    ui.end_row();
                });

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                let save_btn = egui::Button::new(egui::RichText::new("Save").strong())
                    .min_size(egui::vec2(100.0, 32.0));
                if ui.add(save_btn).clicked() {
                    let (x, y) = state.values();
                    result = Some(ModalResult::Save { x, y });
                }
                if ui.add(egui::Button::new("Cancel").min_size(egui::vec2(100.0, 32.0))).clicked() {
                    result = Some(ModalResult::Close);
                }
            });

            if ui.input(|i| i.key_pressed(egui::Key::Enter)) && result.is_none() {
                let (x, y) = state.values();
                result = Some(ModalResult::Save { x, y });
            }
        });

    if !open || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result.get_or_insert(ModalResult::Close);
    }
    result
}
