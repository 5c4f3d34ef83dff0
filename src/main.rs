use std::env;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use trip_advisor_api::db::mongo::{create_mongo_client, MongoStore};
use trip_advisor_api::db::store::{AccountStore, BookingStore, CatalogStore};
use trip_advisor_api::routes;
use trip_advisor_api::services::itinerary_service::ItineraryService;
use trip_advisor_api::services::planner::{OfflinePlanner, OpenRouterPlanner, PlanBackend};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let mongo_uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = create_mongo_client(&mongo_uri).await;
    log::info!("MongoDB connection established");

    let store = Arc::new(MongoStore::new(client));
    let catalog: Arc<dyn CatalogStore> = store.clone();
    let ledger: Arc<dyn BookingStore> = store.clone();
    let accounts: Arc<dyn AccountStore> = store;

    // Planner backend is picked once at startup: a missing OpenRouter key is
    // a supported offline mode, not an error.
    let backend: Arc<dyn PlanBackend> = match env::var("OPENROUTER_API_KEY") {
        Ok(key) if !key.trim().is_empty() => {
            let base_url = env::var("OPENROUTER_BASE_URL").ok();
            Arc::new(OpenRouterPlanner::new(key, base_url))
        }
        _ => {
            log::warn!("OPENROUTER_API_KEY not set; itinerary plans will use the offline template");
            Arc::new(OfflinePlanner)
        }
    };
    let planner = Arc::new(ItineraryService::new(backend));

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(ledger.clone()))
            .app_data(web::Data::new(accounts.clone()))
            .app_data(web::Data::new(planner.clone()))
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
