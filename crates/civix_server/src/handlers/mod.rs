pub mod config;
pub mod discovery;
pub mod health;
pub mod requests;
pub mod services;
