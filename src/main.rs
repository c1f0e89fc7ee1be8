use eframe::egui;
use pointdash::app::PointDashApp;
use pointdash::config::DashboardConfig;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DashboardConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Point Dashboard")
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([640.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "pointdash",
        options,
        Box::new(|cc| Ok(Box::new(PointDashApp::new(cc, config)))),
    )
}
