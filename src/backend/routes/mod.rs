//! Routes Module
//!
//! - **`router`** - Main router creation (layers, static files, fallback)
//! - **`api_routes`** - Public and authenticated REST endpoints

/// Main router
pub mod router;

/// REST endpoint table
pub mod api_routes;

pub use router::create_router;
