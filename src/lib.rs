// Library exports for dayframe
// This allows integration tests to drive the store, viewer and routes directly

pub mod config;
pub mod day;
pub mod db;
pub mod error;
pub mod record;
pub mod routes;
pub mod state;
pub mod store;
pub mod unsplash;
pub mod viewer;
