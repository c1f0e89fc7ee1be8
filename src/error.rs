use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Failures of the file-facing parts of the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Reasons a chart frame could not be built. The previous frame stays on
/// screen when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("plot area is degenerate: width={width}, height={height}")]
    DegenerateSurface { width: f32, height: f32 },

    #[error("non-finite screen position for point {id}")]
    NonFinitePosition { id: String },
}
