pub mod memory_store;
pub mod mongo;
pub mod trip_store;
