use tokio::sync::RwLock;

use crate::db::trip_store::{parse_trip_id, StoreError, TripStore};
use crate::models::trip::{SavedTrip, Trip};

/// In-memory trip storage for tests and local development.
#[derive(Default)]
pub struct MemoryTripStore {
    trips: RwLock<Vec<SavedTrip>>,
    reject_writes: bool,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `save` always fails, for exercising persistence warnings.
    pub fn rejecting_writes() -> Self {
        Self {
            trips: RwLock::default(),
            reject_writes: true,
        }
    }

    pub async fn len(&self) -> usize {
        self.trips.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trips.read().await.is_empty()
    }
}

impl TripStore for MemoryTripStore {
    async fn save(&self, user_id: &str, trip: &Trip) -> Result<String, StoreError> {
        if self.reject_writes {
            return Err(StoreError::Unavailable("writes are disabled".to_string()));
        }

        let saved = SavedTrip::new(user_id, trip.clone());
        let id = saved.id.unwrap_or_default().to_hex();
        self.trips.write().await.push(saved);
        Ok(id)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<SavedTrip>, StoreError> {
        Ok(self
            .trips
            .read()
            .await
            .iter()
            .rev()
            .filter(|saved| saved.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, user_id: &str, trip_id: &str) -> Result<Option<SavedTrip>, StoreError> {
        let id = parse_trip_id(trip_id)?;

        Ok(self
            .trips
            .read()
            .await
            .iter()
            .find(|saved| saved.id == Some(id) && saved.user_id == user_id)
            .cloned())
    }
}
