pub mod generation;
pub mod itinerary;
pub mod place;
pub mod schedule;
pub mod transforms;
pub mod trip;
pub mod user;
