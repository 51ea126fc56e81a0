//! Core types for the enhanced_input component
//!
//! This crate provides the fundamental types shared by the rest of the
//! workspace: EntityId (with the name-to-identifier derivation rule),
//! Context, ServiceCall, and EntityState.

mod context;
mod entity_id;
mod service_call;
mod state;

pub use context::Context;
pub use entity_id::{EntityId, EntityIdError};
pub use service_call::ServiceCall;
pub use state::EntityState;
