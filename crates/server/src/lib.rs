//! HTTP server for the assessment platform.
//!
//! Wires the SeaORM persistence layer to the axum routers. Binary
//! startup lives in `main.rs`; everything else is exported here so
//! integration tests can drive the same code paths.

pub mod api;
pub mod db;
pub mod entity;
pub mod grading;
pub mod randomizer;
pub mod repository;
