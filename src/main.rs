use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use trip_planner_api::db::{self, trip_store::MongoTripStore};
use trip_planner_api::routes;
use trip_planner_api::services::gemini_service::GeminiService;
use trip_planner_api::services::trip_generation_service::TripGenerator;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let mongo_uri = std::env::var("MONGODB_URI")
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "MONGODB_URI must be set"))?;
    let client = db::mongo::create_mongo_client(&mongo_uri)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let gemini =
        GeminiService::new().map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    info!("Using generation model {}", gemini.model());

    let generator = web::Data::new(TripGenerator::new(
        gemini.clone(),
        MongoTripStore::new(client.clone()),
    ));
    let gemini = web::Data::new(gemini);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(web::Data::new(client.clone()))
            .app_data(generator.clone())
            .app_data(gemini.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .configure(routes::account::configure)
                    .configure(routes::trip::configure::<GeminiService, MongoTripStore>)
                    .configure(routes::relay::configure::<GeminiService>),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
