pub mod account;
pub mod health;
pub mod relay;
pub mod trip;
