pub mod candidates;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod rankings;
pub mod resolver;
pub mod sources;
pub mod types;
pub mod validate;
