//! Feature request board served over HTTP.
//!
//! Users submit feature requests scoped to a product, vote them up or down,
//! and view them ranked by votes. All state lives in process memory and
//! resets on restart.
//!
//! - [`model`] defines the feature request, its review status, and vote directions.
//! - [`store`] owns every request behind a single lock and performs all mutation.
//! - [`routes`] translates the JSON API into store calls and maps outcomes to
//!   status codes via [`error::ApiError`].
//! - [`server`] binds the listener and runs the router until shutdown.
//! - [`cli`] and [`client`] provide the command line and a terminal client
//!   for a running server.

pub mod cli;
pub mod client;
pub mod error;
pub mod model;
pub mod routes;
pub mod server;
pub mod store;
