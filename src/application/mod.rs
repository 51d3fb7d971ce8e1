// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits ABOVE the services
// - Provides the boundary between UI (CLI) and services
// - Translates domain records into DTOs

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod highlight;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use highlight::{highlight, HighlightSegment};
pub use state::AppState;
