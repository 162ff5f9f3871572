//! # Fundbridge API Library
//!
//! This library provides the core functionality for the Fundbridge API
//! service, connecting vendors seeking capital with investors: accounts,
//! vendor identity with QR verification, documents and the investment ledger.

pub mod artifacts;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pdf;
pub mod qr;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;
