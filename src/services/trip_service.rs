use log::error;

use crate::db::trip_store::{StoreError, TripStore};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::trip::SavedTrip;

/// The caller's saved trips, newest first.
///
/// Anonymous callers get an empty list rather than an error, and a failing
/// store degrades to an empty list as well.
pub async fn list_trips<S: TripStore>(
    store: &S,
    caller: Option<&AuthenticatedUser>,
) -> Vec<SavedTrip> {
    let Some(caller) = caller else {
        return Vec::new();
    };

    match store.list(&caller.user_id).await {
        Ok(trips) => trips,
        Err(err) => {
            error!("Failed to list trips for user {}: {}", caller.user_id, err);
            Vec::new()
        }
    }
}

pub async fn find_trip<S: TripStore>(
    store: &S,
    caller: &AuthenticatedUser,
    trip_id: &str,
) -> Result<Option<SavedTrip>, StoreError> {
    store.get(&caller.user_id, trip_id).await
}
