// src/lib.rs

//! Release Radar Library
//!
//! Finds beer releases in the coming week on a release calendar page (or
//! the product API) and posts them to a chat webhook.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
