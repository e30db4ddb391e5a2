//! Integration tests with a mock HTTP server

mod executor;
mod mock_server;
mod services;
mod streaming;
