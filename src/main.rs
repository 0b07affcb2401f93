use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use spark_match::config::{Settings, StoreBackend};
use spark_match::routes::{self, AppState};
use spark_match::services::{MemoryStore, PostgresStore, ProfileStore, TokenService};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // SPARK_CONFIG points at a single settings file, otherwise config/ is layered
    let loaded = match std::env::var("SPARK_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    };
    let settings = loaded.map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Spark Match service...");

    let store: Arc<dyn ProfileStore> = match settings.database.backend {
        StoreBackend::Postgres => {
            let db = &settings.database;
            let postgres = PostgresStore::new(
                &db.url,
                db.max_connections.unwrap_or(10),
                db.min_connections.unwrap_or(1),
                db.acquire_timeout_secs.unwrap_or(5),
                db.idle_timeout_secs.unwrap_or(600),
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;
            Arc::new(postgres)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory profile store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let tokens = web::Data::new(TokenService::new(
        &settings.auth.secret,
        settings.auth.access_ttl_secs,
        settings.auth.refresh_ttl_secs,
    ));

    let app_state = web::Data::new(AppState::new(store));

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{} ({} workers)", host, port, workers);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(app_state.clone())
            .app_data(tokens.clone())
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(routes::handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
