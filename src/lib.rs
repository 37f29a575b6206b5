//! Library exports for campusgate, shared between the binaries and tests.

pub mod cleanup;
pub mod config;
pub mod firebase;
pub mod navigation;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
