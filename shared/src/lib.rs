use serde::{Deserialize, Serialize};

/// Verdict returned for a successfully classified upload.
#[derive(Serialize, Deserialize, Clone)]
pub struct PredictionResponse {
    pub result: String,
    pub prediction_percentage: f32,
}
