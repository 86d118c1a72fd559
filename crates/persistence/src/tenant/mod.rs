//! Tenant (app) support.
//!
//! Every object belongs to exactly one app. Apps that share a physical
//! partition with other apps additionally stamp a shard key onto their
//! objects so the storage engine can route them.
//!
//! # Core Types
//!
//! - [`AppId`] - Opaque app identifier
//! - [`App`] - The app record: sharing flag and registered custom types

mod app;
mod id;

pub use app::App;
pub use id::{APP_ID_PREFIX, AppId};
