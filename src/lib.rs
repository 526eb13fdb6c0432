//! Job Board
//!
//! Listing filters, job posting validation and submission against a remote
//! jobs REST API, plus the routes of a small backend-for-frontend that
//! exposes them over HTTP.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
