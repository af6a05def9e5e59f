//! Transport to the library backend REST API

pub mod client;

pub use client::ApiClient;
