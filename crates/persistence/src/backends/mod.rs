//! Storage backend implementations.
//!
//! Each backend implements [`ObjectStorage`](crate::core::ObjectStorage) and
//! is gated behind a feature flag.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | `memory` | Process-local maps, for tests and embedding |

#[cfg(feature = "memory")]
pub mod memory;
