pub mod auth;
pub mod events;
pub mod sweeper;
pub mod tasks;
