pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod revenue;
pub mod server;
pub mod stripe;
pub mod web;
