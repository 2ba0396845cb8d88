pub mod analysis;
pub mod collector;
pub mod config;
pub mod logging;
pub mod normalize;
pub mod retry;
pub mod routing;
pub mod scheduler;
pub mod store;
