//! HTTP API mirroring the PHAROS REST surface.
//!
//! ## Modules
//!
//! - `handlers` - One handler per device endpoint plus `/`, `/info`, `/health`, `/docs`
//! - `routes` - Axum router and the route table served at `/docs`
//! - `middleware` - Request metrics
//! - `body` - Parsing of raw PUT bodies
//! - `models` - Request/response types

pub mod body;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

pub use handlers::LaserApiState;
pub use routes::laser_routes;
