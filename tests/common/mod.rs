#![allow(dead_code)]

use actix_web::{web, App};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trip_planner_api::db::memory_store::MemoryTripStore;
use trip_planner_api::middleware::auth::generate_token;
use trip_planner_api::routes;
use trip_planner_api::services::gemini_service::GeminiService;
use trip_planner_api::services::retry::RetryPolicy;
use trip_planner_api::services::trip_generation_service::TripGenerator;

pub const MODEL: &str = "gemini-2.0-flash";
pub const ENDPOINT: &str = "/models/gemini-2.0-flash:generateContent";

pub type TestGenerator = TripGenerator<GeminiService, MemoryTripStore>;

pub struct TestApp {
    pub server: MockServer,
    pub generator: web::Data<TestGenerator>,
    pub gemini: web::Data<GeminiService>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_store(MemoryTripStore::new()).await
    }

    pub async fn with_store(store: MemoryTripStore) -> Self {
        let server = MockServer::start().await;
        let gemini = GeminiService::with_api_key("test-key", MODEL).with_base_url(server.uri());

        let generator = TripGenerator::new(gemini.clone(), store)
            .with_policy(RetryPolicy::new(3, Duration::from_millis(10)));

        Self {
            server,
            generator: web::Data::new(generator),
            gemini: web::Data::new(gemini),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.generator.clone())
            .app_data(self.gemini.clone())
            .service(
                web::scope("/api")
                    .configure(routes::trip::configure::<GeminiService, MemoryTripStore>)
                    .configure(routes::relay::configure::<GeminiService>),
            )
    }

    /// Every generation call answers with `text` as the first candidate.
    pub async fn model_replies(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(model_reply(text))
            .mount(&self.server)
            .await;
    }
}

pub fn model_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
    }))
}

pub fn bearer(user_id: &str) -> (&'static str, String) {
    let token = generate_token(&format!("{}@example.com", user_id), user_id)
        .expect("token should be issued");
    ("Authorization", format!("Bearer {}", token))
}

pub fn trip_request() -> Value {
    json!({
        "destination": "Lisbon, Portugal",
        "day_count": 2,
        "budget": "Moderate",
        "companion": "Couple"
    })
}

pub fn trip_payload() -> String {
    json!({
        "travelPlan": {
            "hotelOptions": [{
                "hotelName": "Casa Azul",
                "hotelAddress": "Rua Augusta 1",
                "price": "$120 per night",
                "geoCoordinates": {"latitude": 38.71, "longitude": -9.14},
                "rating": 4.5,
                "description": "Near the river"
            }],
            "itinerary": {
                "day1": [
                    {"placeName": "Belem Tower", "timeToTravel": "2 hours"},
                    {"placeName": "Jeronimos Monastery", "timeToTravel": "1.5 hours"},
                    {"placeName": "LX Factory", "timeToTravel": "3 hours"}
                ],
                "day2": [
                    {"placeName": "Sintra", "timeToTravel": "a while"}
                ]
            }
        }
    })
    .to_string()
}
