use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use backend::auth::Authenticator;
use backend::config::Config;
use backend::inference::{DetectorModel, ModelState};
use backend::routes::configure_routes;
use backend::storage::LocalStorage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = std::env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    }

    let config = Config::from_env();

    // The model is loaded exactly once; a failure here leaves the service
    // in fallback mode rather than aborting startup.
    let model_state = if !config.model_path.exists() {
        log::warn!(
            "Model file not found at '{}'. Server will run in fallback mode.",
            config.model_path.display()
        );
        ModelState::Unloaded
    } else {
        match DetectorModel::load(&config.model_path) {
            Ok(model) => {
                log::info!(
                    "Model loaded successfully from '{}'.",
                    config.model_path.display()
                );
                ModelState::Loaded(model)
            }
            Err(err) => {
                log::error!(
                    "An error occurred while loading the model: {err}. Server will run in fallback mode."
                );
                ModelState::Unloaded
            }
        }
    };
    let model_state = web::Data::new(model_state);

    let storage = LocalStorage::new(&config.upload_dir);
    match storage.ensure_partitions() {
        Ok(()) => log::info!("Upload directories ensured at '{}'.", storage.root().display()),
        Err(err) => log::error!("Error creating upload directories: {err}"),
    }

    let authenticator = Authenticator::new(config.jwt_secret.as_deref());
    if config.jwt_secret.is_none() {
        log::warn!("DF_JWT_SECRET is not set; all uploads will be stored under the guest partition.");
    }

    log::info!("CORS configured for origins: {:?}", config.cors_allowed_origins);

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting server on {}", bind_address);

    let cors_origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);
        if cors_origins.iter().any(|origin| origin == "*") {
            cors = cors.allow_any_origin();
        } else {
            for origin in &cors_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        App::new()
            .wrap(cors)
            .app_data(model_state.clone())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(authenticator.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
