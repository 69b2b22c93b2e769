pub mod gemini_service;
pub mod retry;
pub mod schedule_service;
pub mod trip_generation_service;
pub mod trip_service;
