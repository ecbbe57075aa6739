pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod upstream;
