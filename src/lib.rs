// src/lib.rs

pub mod allocator;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;

// Re-export specific items for convenience if needed
pub use routes::create_router;
