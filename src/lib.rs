//! codemint - barcode and QR code image service
//!
//! # Architecture
//! - `services`: request validation and image encoding
//! - `audit`: best-effort generation log (queue + background writer)
//! - `storage`: database connection, schema reconciliation, audit sink
//! - `api`: HTTP pages, JSON API and middleware
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: startup, shutdown and execution modes
//! - `system`: logging

pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
