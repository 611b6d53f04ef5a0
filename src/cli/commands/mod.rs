pub mod config;
pub mod generate;
pub mod relevance;
pub mod sanitize;
