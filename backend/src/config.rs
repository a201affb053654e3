use std::env;
use std::path::PathBuf;

/// Environment-derived settings, collected once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub upload_dir: PathBuf,
    pub model_path: PathBuf,
    pub cors_allowed_origins: Vec<String>,
    pub jwt_secret: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let upload_dir = env::var("DF_UPLOAD_FOLDER")
            .unwrap_or_else(|_| "uploads".to_string())
            .into();
        let model_path = env::var("DF_MODEL_PATH")
            .unwrap_or_else(|_| "deepfake_detector.safetensors".to_string())
            .into();
        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );
        let jwt_secret = env::var("DF_JWT_SECRET").ok().filter(|s| !s.is_empty());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8081);

        Self {
            upload_dir,
            model_path,
            cors_allowed_origins,
            jwt_secret,
            port,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
