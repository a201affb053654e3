use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionType};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use serde_json::json;
use shared::PredictionResponse;
use std::io::Write;

use crate::auth::AuthStatus;
use crate::inference::ModelState;
use crate::storage::LocalStorage;
use crate::validation::{allowed_file, sanitize_filename, ALLOWED_EXTENSIONS};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/upload").route(web::post().to(upload_file)))
        .service(web::resource("/uploads/{filepath:.*}").route(web::get().to(serve_upload)));
}

/// Handles file uploads.
/// - If the model is loaded, it predicts and saves the image permanently.
/// - If the model is NOT loaded, it rejects the upload without saving the file.
async fn upload_file(
    model: web::Data<ModelState>,
    storage: web::Data<LocalStorage>,
    auth: AuthStatus,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let Some(disposition) = field.content_disposition() else {
            continue;
        };
        if disposition.get_name() != Some("file") {
            continue;
        }
        let filename = disposition
            .get_filename()
            .unwrap_or_default()
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            data.write_all(&chunk?)?;
        }
        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Ok(HttpResponse::BadRequest()
            .json(json!({"error": "No file selected or file part is missing."})));
    };
    if filename.is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({"error": "No file selected or file part is missing."})));
    }

    if !allowed_file(&filename, &ALLOWED_EXTENSIONS) {
        return Ok(HttpResponse::BadRequest().json(json!({"error": "Invalid file type."})));
    }

    // Fallback mode: reject before anything is written to disk.
    if !model.is_loaded() {
        warn!("Upload rejected: model is not loaded. The server is in fallback mode.");
        return Ok(HttpResponse::ServiceUnavailable().json(json!({
            "error": "Our AI model is feeling lazy right now, please try again later."
        })));
    }

    let directory = match storage.destination_dir(auth.is_authenticated) {
        Ok(directory) => directory,
        Err(err) => {
            error!("Failed to create upload directory: {err}");
            return Ok(internal_error());
        }
    };

    let filename = sanitize_filename(&filename);
    let saved_path = match storage.save(&directory, &filename, &data) {
        Ok(path) => path,
        Err(err) => {
            error!("Failed to save upload '{filename}': {err}");
            return Ok(internal_error());
        }
    };
    info!("File saved permanently to {}", saved_path.display());

    match model.predict(&saved_path) {
        Ok((label, confidence)) => Ok(HttpResponse::Ok().json(PredictionResponse {
            result: label.to_string(),
            prediction_percentage: confidence,
        })),
        Err(err) => {
            // The saved file stays on disk for operator follow-up.
            error!(
                "An unexpected error occurred during prediction for {}: {err}",
                saved_path.display()
            );
            Ok(internal_error())
        }
    }
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({"error": "An internal server error occurred."}))
}

/// Serves a stored upload for inline display.
/// Example URL: http://localhost:8081/uploads/guest/my-image.jpg
async fn serve_upload(
    req: HttpRequest,
    storage: web::Data<LocalStorage>,
    filepath: web::Path<String>,
) -> HttpResponse {
    let Some(full_path) = storage.resolve(filepath.as_str()) else {
        return not_found();
    };

    match NamedFile::open_async(&full_path).await {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Inline,
                parameters: vec![],
            })
            .into_response(&req),
        Err(err) => {
            info!("Upload retrieval miss for '{}': {err}", filepath.as_str());
            not_found()
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": "File not found."}))
}
