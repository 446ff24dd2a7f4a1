// src/application/mod.rs
//
// Application Layer
//
// - Sits above the services; wires them into one AppState
// - Translates domain results into DTOs and structured errors
// - No transport: hosts (HTTP, CLI, desktop) call into this layer

pub mod dto;
pub mod error_handling;
pub mod state;

pub use dto::*;
pub use error_handling::{handle_result, ErrorResponse};
pub use state::AppState;
