use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use contest_backend::auth::jwks::JwksCache;
use contest_backend::cache::{CacheConfig, RedisCache};
use contest_backend::config::AppConfig;
use contest_backend::create_pool;
use contest_backend::events::EventBus;
use contest_backend::handlers;
use contest_backend::notify::NotificationDispatcher;
use contest_backend::notify::sms::SmsClient;
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database ready");

    let redis_cache = RedisCache::new(&config.redis_url)
        .await
        .expect("Failed to connect to Redis");
    let redis_data = web::Data::new(Arc::new(redis_cache));
    let cache_config = web::Data::new(CacheConfig::from_env());
    tracing::info!("Connected to Redis");

    let jwks_cache = web::Data::new(Arc::new(JwksCache::new(
        &config.supabase_project_ref,
        &config.supabase_anon_key,
    )));

    // Notifications are written off the request path.
    let (event_bus, receiver) = EventBus::new();
    let sms = SmsClient::new(config.brevo_api_key.clone(), &config.sms_sender);
    let dispatcher = NotificationDispatcher::new(db.clone(), sms);
    dispatcher.clone().spawn(receiver);

    let db_data = web::Data::new(db);
    let events_data = web::Data::new(event_bus);
    let dispatcher_data = web::Data::new(dispatcher);

    let bind_addr = config.bind_addr();
    let media_root = config.media_root.clone();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(cache_config.clone())
            .app_data(jwks_cache.clone())
            .app_data(events_data.clone())
            .app_data(dispatcher_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
            .service(Files::new("/media", media_root.clone()))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
