pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod notify;
pub mod synthesizer;
pub mod view;
