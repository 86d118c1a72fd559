//! Operation handlers.
//!
//! Each handler takes the shared [`AppState`](crate::AppState), the resolved
//! [`App`](strata_persistence::tenant::App) and the request input, and
//! returns an [`ApiResponse`](crate::responses::ApiResponse) or a
//! [`RestError`](crate::RestError). Both render as axum responses.
//!
//! - [`create`] - Create a single object
//! - [`read`] - Read a single object
//! - [`update`] - Update a single object
//! - [`delete`] - Delete a single object
//! - [`batch`] - Batch read, create, update and delete

pub mod batch;
pub mod create;
pub mod delete;
pub mod read;
pub mod update;

// Re-export handlers for convenience
pub use batch::{batch_create, batch_delete, batch_read, batch_update};
pub use create::create_object;
pub use delete::delete_object;
pub use read::read_object;
pub use update::update_object;
