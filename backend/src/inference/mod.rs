pub mod detector;

use std::path::Path;

pub use detector::DetectorModel;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Prediction called but the model is not loaded")]
    ModelNotLoaded,
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Model execution failed: {0}")]
    Model(#[from] candle_core::Error),
}

/// Outcome of the one-time model load at startup. `Unloaded` is terminal
/// for the process lifetime; the service keeps answering requests in
/// fallback mode and refuses uploads with 503.
pub enum ModelState {
    Loaded(DetectorModel),
    Unloaded,
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    /// Delegates to the detector when loaded. An `Unloaded` state yields
    /// `InferenceError::ModelNotLoaded`, never a fabricated verdict.
    pub fn predict(&self, file_path: &Path) -> Result<(&'static str, f32), InferenceError> {
        match self {
            ModelState::Loaded(model) => model.predict(file_path),
            ModelState::Unloaded => Err(InferenceError::ModelNotLoaded),
        }
    }
}

/// Maps the model's scalar output to the wire verdict: "Fake" at and above
/// the 0.5 threshold, confidence rescaled to a percentage rounded to two
/// decimals.
pub fn classify(p: f32) -> (&'static str, f32) {
    let label = if p >= 0.5 { "Fake" } else { "Real" };
    let confidence_percent = (p * 100.0 * 100.0).round() / 100.0;
    (label, confidence_percent)
}
