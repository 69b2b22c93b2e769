use actix_web::{error::InternalError, http::StatusCode, web, HttpResponse, Responder};
use log::{error, warn};
use serde::Serialize;
use serde_json::json;

use crate::db::trip_store::{StoreError, TripStore};
use crate::middleware::auth::AuthMiddleware;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::generation::GenerationError;
use crate::models::schedule::DaySchedule;
use crate::models::trip::{SavedTrip, Trip, TripRequest, TripResponse};
use crate::services::gemini_service::TextGeneration;
use crate::services::schedule_service::compute_schedule;
use crate::services::trip_generation_service::TripGenerator;
use crate::services::trip_service::{find_trip, list_trips};

const EXHAUSTED_MESSAGE: &str =
    "Failed to generate trip after multiple attempts. Please try again later.";

#[derive(Serialize)]
struct GenerateResponse {
    trip: Trip,
    trip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

#[derive(Serialize)]
struct ScheduleResponse {
    trip_id: String,
    days: Vec<DaySchedule>,
}

fn generation_error_response(err: &GenerationError) -> HttpResponse {
    let (status, message) = match err {
        GenerationError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        GenerationError::Unauthenticated => (
            StatusCode::UNAUTHORIZED,
            "You must be logged in to generate and save your trip.".to_string(),
        ),
        GenerationError::ExhaustedRetries { .. } => {
            (StatusCode::BAD_GATEWAY, EXHAUSTED_MESSAGE.to_string())
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate trip".to_string(),
        ),
    };

    HttpResponse::build(status).json(json!({ "error": message }))
}

fn store_error_response(err: &StoreError) -> HttpResponse {
    match err {
        StoreError::InvalidId(_) => HttpResponse::BadRequest().body("Invalid ID"),
        _ => {
            error!("Failed to retrieve trip: {}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve trip")
        }
    }
}

// Malformed bodies get the same `{ "error": ... }` shape as other failures
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}

async fn load_trip<S: TripStore>(
    store: &S,
    caller: &AuthenticatedUser,
    trip_id: &str,
) -> Result<SavedTrip, HttpResponse> {
    match find_trip(store, caller, trip_id).await {
        Ok(Some(saved)) => Ok(saved),
        Ok(None) => Err(HttpResponse::NotFound().body("Trip not found")),
        Err(err) => Err(store_error_response(&err)),
    }
}

/*
    /api/trips/generate
*/
pub async fn generate<G, S>(
    generator: web::Data<TripGenerator<G, S>>,
    caller: Option<AuthenticatedUser>,
    input: web::Json<TripRequest>,
) -> impl Responder
where
    G: TextGeneration + 'static,
    S: TripStore + 'static,
{
    match generator.generate(caller.as_ref(), input.into_inner()).await {
        Ok(generated) => {
            let warning = generated.warning.map(|w| match w {
                GenerationError::PersistenceFailure(msg) => msg,
                other => {
                    warn!("Returning trip with warning: {}", other);
                    "Trip generated with warnings".to_string()
                }
            });
            HttpResponse::Created().json(GenerateResponse {
                trip: generated.trip,
                trip_id: generated.trip_id,
                warning,
            })
        }
        Err(err) => generation_error_response(&err),
    }
}

/*
    /api/trips (signed-out callers get an empty list)
*/
pub async fn list<G, S>(
    generator: web::Data<TripGenerator<G, S>>,
    caller: Option<AuthenticatedUser>,
) -> impl Responder
where
    G: TextGeneration + 'static,
    S: TripStore + 'static,
{
    let trips: Vec<TripResponse> = list_trips(generator.store(), caller.as_ref())
        .await
        .into_iter()
        .map(TripResponse::from)
        .collect();

    HttpResponse::Ok().json(trips)
}

/*
    /api/trips/{id}
*/
pub async fn get_by_id<G, S>(
    generator: web::Data<TripGenerator<G, S>>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> impl Responder
where
    G: TextGeneration + 'static,
    S: TripStore + 'static,
{
    match load_trip(generator.store(), &caller, &path.into_inner()).await {
        Ok(saved) => HttpResponse::Ok().json(TripResponse::from(saved)),
        Err(resp) => resp,
    }
}

/*
    /api/trips/{id}/schedule
*/
pub async fn schedule<G, S>(
    generator: web::Data<TripGenerator<G, S>>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> impl Responder
where
    G: TextGeneration + 'static,
    S: TripStore + 'static,
{
    let trip_id = path.into_inner();
    match load_trip(generator.store(), &caller, &trip_id).await {
        Ok(saved) => HttpResponse::Ok().json(ScheduleResponse {
            trip_id,
            days: compute_schedule(&saved.trip.itinerary),
        }),
        Err(resp) => resp,
    }
}

pub fn configure<G, S>(cfg: &mut web::ServiceConfig)
where
    G: TextGeneration + 'static,
    S: TripStore + 'static,
{
    cfg.service(
        web::scope("/trips")
            .app_data(json_config())
            .route("", web::get().to(list::<G, S>))
            .route("/generate", web::post().to(generate::<G, S>))
            // Protected routes
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .route("/{id}", web::get().to(get_by_id::<G, S>))
                    .route("/{id}/schedule", web::get().to(schedule::<G, S>)),
            ),
    );
}
