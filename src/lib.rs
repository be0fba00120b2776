//! # FGC Dashboard
//!
//! Backend for a fighting-game tournament dashboard. Proxies the start.gg
//! GraphQL API and reshapes its results for the front end.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (games, tournaments, player summaries)
//! - **startgg**: GraphQL queries, response shapes, and the HTTP client
//! - **normalize**: Tournament payloads into per-game tournament records
//! - **aggregate**: Standings into ranked player summaries
//! - **calculate**: Win rate, achievements, and the earnings estimate
//! - **pipeline**: Lookup, fetch, and reshape in one call
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod startgg;

pub use models::*;
