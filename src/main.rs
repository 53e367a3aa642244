use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use scholarflow::{
    ai::AiAdapter,
    config::AppConfig,
    db::store::MockStore,
    routes::{self, auxiliary, AppState},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    let secret_key = match &config.session_secret {
        Some(secret) => Key::from(secret.as_bytes()),
        None => {
            warn!("SESSION_SECRET_KEY not set, sessions will not survive a restart");
            Key::generate()
        }
    };

    let store = Arc::new(MockStore::seeded());
    let ai = AiAdapter::from_config(&config.ai);
    let state = web::Data::new(AppState::new(store, ai, config.site.clone()));

    info!(
        "Starting {} on http://{}:{}...",
        config.site.name, config.host, config.port
    );

    HttpServer::new(move || {
        let secret_key = secret_key.clone();

        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key)
                    .cookie_secure(false)
                    .cookie_path("/".to_string())
                    .cookie_name("scholarflow-session".to_string())
                    .cookie_http_only(true)
                    .cookie_same_site(actix_web::cookie::SameSite::Lax)
                    .build(),
            )
            .wrap(actix_web::middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
            .default_service(web::to(auxiliary::not_found_handler))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
