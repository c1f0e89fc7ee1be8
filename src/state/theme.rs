use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    pub fn grid_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_premultiplied(100, 100, 100, 60),
            Theme::Light => Color32::from_rgba_premultiplied(180, 180, 180, 80),
        }
    }

    pub fn axis_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(170),
            Theme::Light => Color32::from_gray(70),
        }
    }

    /// Outline drawn around every point marker.
    pub fn point_stroke(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(235),
            Theme::Light => Color32::WHITE,
        }
    }

    /// Row tint for a freshly added point in the table.
    pub fn just_added_row(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_unmultiplied(60, 140, 60, 70),
            Theme::Light => Color32::from_rgb(232, 245, 232),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

/// Fill colors for the three point styles.
pub const POINT_DEFAULT_FILL: Color32 = Color32::from_rgb(0x88, 0x84, 0xd8);
pub const POINT_HOVER_FILL: Color32 = Color32::from_rgb(0x4e, 0xcd, 0xc4);
pub const POINT_DRAG_FILL: Color32 = Color32::from_rgb(0xff, 0x6b, 0x6b);
