//! HTTP request handlers for the explorer.

pub mod api;
pub mod error;
pub mod export;
pub mod health;
pub mod page;
pub mod params;
pub mod render;

pub use error::ApiError;
pub use params::ExplorerParams;
