pub mod config;
pub mod logging;
pub mod store;

pub use config::load_config;
pub use logging::init_logging;
pub use store::init_store;
