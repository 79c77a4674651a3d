//! Live DNS resolution against upstream servers.

pub mod upstream;

pub use upstream::{parse_server, UpstreamResolver};
