pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod data_models;
pub mod snippet;
pub mod state;
pub mod store;
