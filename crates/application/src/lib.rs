//! Ferrous Lookup Application Layer
//!
//! Ports the engine depends on, the caching services built on them, and the
//! lookup / inspection use cases.
pub mod ports;
pub mod services;
pub mod use_cases;
