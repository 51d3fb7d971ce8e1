// src/events/handlers/mod.rs

mod favorites_activity_handler;

pub use favorites_activity_handler::register_favorites_activity_handlers;
