pub mod adapters;
pub mod config;
pub mod error;
pub mod flows;
pub mod messages;
pub mod prompts;
