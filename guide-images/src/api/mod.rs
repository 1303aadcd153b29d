//! HTTP API handlers for guide-images
//!
//! - `POST /images` - image discovery for one place
//! - `GET /health` - liveness and source availability

pub mod health;
pub mod images;

pub use health::health_routes;
pub use images::image_routes;
