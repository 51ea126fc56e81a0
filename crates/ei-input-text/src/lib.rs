//! Long text input entities for the enhanced_input domain
//!
//! Exposes a user-creatable/deletable entity type holding a title and an
//! arbitrary text body, persisted across restarts. Entities are created
//! and removed through the `create_input_text` and `delete_input_text`
//! services; stored records are reconciled against the live entity set
//! at setup.

mod component;
mod error;
mod manager;
mod record;
mod service;
mod store;

pub use component::{setup, InputTextComponent};
pub use error::InputTextError;
pub use manager::InputTextManager;
pub use record::Record;
pub use service::register_input_text_services;
pub use store::RecordStore;

/// Domain prefix for all long text input entities
pub const DOMAIN: &str = "enhanced_input";

/// Service that creates or updates a long text input
pub const SERVICE_CREATE_INPUT_TEXT: &str = "create_input_text";

/// Service that deletes a long text input
pub const SERVICE_DELETE_INPUT_TEXT: &str = "delete_input_text";

/// Name used when `create_input_text` is called without one
pub const DEFAULT_NAME: &str = "Enhanced Input";

/// Storage key for the persisted record blob
pub const STORAGE_KEY: &str = "enhanced_input_storage";

/// Storage format version
pub const STORAGE_VERSION: u32 = 1;
