use log::{debug, error, info, warn};

use crate::db::trip_store::TripStore;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::generation::GenerationError;
use crate::models::trip::{Trip, TripRequest};
use crate::services::gemini_service::TextGeneration;
use crate::services::retry::{retry_with, RetryError, RetryPolicy};

const SAVE_WARNING: &str = "Trip generated but could not be saved";

/// A freshly generated trip and the outcome of persisting it.
#[derive(Debug)]
pub struct GeneratedTrip {
    pub trip: Trip,
    /// Id assigned by the store, `None` when saving failed.
    pub trip_id: Option<String>,
    /// Non-fatal problem the caller should surface, e.g. a failed save.
    pub warning: Option<GenerationError>,
}

pub struct TripGenerator<G, S> {
    generator: G,
    store: S,
    policy: RetryPolicy,
}

impl<G, S> TripGenerator<G, S>
where
    G: TextGeneration,
    S: TripStore,
{
    pub fn new(generator: G, store: S) -> Self {
        Self {
            generator,
            store,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Validates the request, asks the model for a trip until a usable payload
    /// arrives or the retry policy runs out, then saves the result once.
    pub async fn generate(
        &self,
        caller: Option<&AuthenticatedUser>,
        request: TripRequest,
    ) -> Result<GeneratedTrip, GenerationError> {
        request.validate().map_err(GenerationError::InvalidRequest)?;
        let caller = caller.ok_or(GenerationError::Unauthenticated)?;

        info!(
            "Generating {}-day trip to {} for user {}",
            request.day_count, request.destination, caller.user_id
        );

        let prompt = build_prompt(&request);
        let prompt = prompt.as_str();
        let generator = &self.generator;
        let request_ref = &request;

        let outcome = retry_with(&self.policy, GenerationError::is_retryable, |attempt| async move {
            debug!("Trip generation attempt {}", attempt);
            let text = generator.generate_text(prompt).await?;
            Trip::from_payload(request_ref.clone(), &text)
        })
        .await;

        let trip = match outcome {
            Ok(trip) => trip,
            Err(RetryError::Aborted(err)) => return Err(err),
            Err(RetryError::Exhausted { attempts, last }) => {
                error!("All {} trip generation attempts failed: {}", attempts, last);
                return Err(GenerationError::ExhaustedRetries {
                    attempts,
                    last: Box::new(last),
                });
            }
        };

        match self.store.save(&caller.user_id, &trip).await {
            Ok(trip_id) => {
                info!("Saved trip {} for user {}", trip_id, caller.user_id);
                Ok(GeneratedTrip {
                    trip,
                    trip_id: Some(trip_id),
                    warning: None,
                })
            }
            Err(err) => {
                // Store errors stay in the log; the caller only gets the fixed warning
                warn!("{}: {}", SAVE_WARNING, err);
                Ok(GeneratedTrip {
                    trip,
                    trip_id: None,
                    warning: Some(GenerationError::PersistenceFailure(SAVE_WARNING.to_string())),
                })
            }
        }
    }
}

/// Prompt asking for hotel options and a day-by-day itinerary as raw JSON.
pub fn build_prompt(request: &TripRequest) -> String {
    let days = if request.day_count == 1 { "day" } else { "days" };
    let companion = request
        .companion
        .map(|companion| companion.description())
        .unwrap_or("a traveler");
    let budget = request
        .budget
        .map(|budget| budget.label())
        .unwrap_or("Moderate");

    format!(
        "Generate a travel plan for the location: {destination}, for {count} {days} for {companion}, with a {budget} budget.

1. Provide a list of hotel options under \"hotelOptions\". Each hotel should include:
   - hotelName
   - hotelAddress
   - price
   - hotelImageURL
   - geoCoordinates (latitude, longitude)
   - rating
   - description

2. Also suggest an \"itinerary\" for {count} {days}, keyed by day (\"day1\", \"day2\", ...). For each day, list 2-3 major activities/places with:
   - placeName
   - placeDetails
   - placeImageURL
   - geoCoordinates
   - ticketPricing
   - timeToTravel
   - bestTimeToVisit

Output everything strictly in valid JSON format.
Do NOT include any explanation or markdown formatting, only raw JSON.
",
        destination = request.destination.trim(),
        count = request.day_count,
    )
}
