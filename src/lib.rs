pub mod api;
pub mod services;
pub mod types;
