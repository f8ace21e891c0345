//! Infrastructure layer: persistence gateway and application services.

pub mod services;
pub mod store;
