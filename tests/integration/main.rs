//! HTTP-level integration tests driving the router over in-memory stores.

mod file_test;
mod health_test;
mod helpers;
