//! Tenant resolution for incoming requests.
//!
//! Every request operates on exactly one app. Authenticated principals
//! resolve to their own app; anonymous requests resolve to the root app.

mod resolver;

pub use resolver::{Principal, StorageTenantResolver, TenantResolver};
