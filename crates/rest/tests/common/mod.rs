//! Common test utilities for API testing.
//!
//! - [`harness`] - State builder over the in-memory backend
//! - [`fixtures`] - Request bodies and objects

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
