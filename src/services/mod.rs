pub mod config;
pub mod listing;
pub mod matching;
pub mod registry;
pub mod resolver;
