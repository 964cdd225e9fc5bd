pub mod config;
pub mod events;
pub mod scheduler;
pub mod state;
pub mod view_model;
