//! WebSocket layer: upgrade handling and the socket-backed channel member.
//!
//! Every path not claimed by the REST API is a potential channel endpoint.
//! The handler resolves the path, upgrades the connection and hands the
//! socket to a [`crate::relay::Session`].

pub mod connection;
pub mod handler;
