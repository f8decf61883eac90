//! services/client/src/lib.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod state;
pub mod views;
