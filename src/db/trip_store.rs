use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::db::mongo::DATABASE;
use crate::models::trip::{SavedTrip, Trip};

const COLLECTION: &str = "Trips";

#[derive(Debug)]
pub enum StoreError {
    Database(mongodb::error::Error),
    InvalidId(String),
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "Database error: {}", err),
            StoreError::InvalidId(id) => write!(f, "Invalid trip id: {}", id),
            StoreError::Unavailable(msg) => write!(f, "Trip store unavailable: {}", msg),
        }
    }
}

impl Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err)
    }
}

pub(crate) fn parse_trip_id(trip_id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(trip_id).map_err(|_| StoreError::InvalidId(trip_id.to_string()))
}

/// Persistence for generated trips, always scoped to one user.
pub trait TripStore {
    /// Stores the trip with a creation timestamp and returns its id.
    async fn save(&self, user_id: &str, trip: &Trip) -> Result<String, StoreError>;

    /// The user's trips, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<SavedTrip>, StoreError>;

    async fn get(&self, user_id: &str, trip_id: &str) -> Result<Option<SavedTrip>, StoreError>;
}

#[derive(Clone)]
pub struct MongoTripStore {
    client: Arc<Client>,
}

impl MongoTripStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    fn collection(&self) -> Collection<SavedTrip> {
        self.client.database(DATABASE).collection(COLLECTION)
    }
}

impl TripStore for MongoTripStore {
    async fn save(&self, user_id: &str, trip: &Trip) -> Result<String, StoreError> {
        let saved = SavedTrip::new(user_id, trip.clone());
        let id = saved.id.unwrap_or_default();

        self.collection().insert_one(&saved).await?;
        Ok(id.to_hex())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<SavedTrip>, StoreError> {
        // ObjectIds grow with insertion time
        let cursor = self
            .collection()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn get(&self, user_id: &str, trip_id: &str) -> Result<Option<SavedTrip>, StoreError> {
        let id = parse_trip_id(trip_id)?;

        Ok(self
            .collection()
            .find_one(doc! { "_id": id, "user_id": user_id })
            .await?)
    }
}
