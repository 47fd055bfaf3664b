//! # rolodex-server
//!
//! The HTTP surface of the Rolodex admin backend: session endpoints,
//! schema and data inspection behind a bearer-token boundary, client
//! and commission management, and the embedded dashboard page.

pub mod assets;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod server;
pub mod state;
pub mod store;

pub use routes::create_router;
pub use server::serve;
pub use state::AppState;
