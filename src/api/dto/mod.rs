//! Data Transfer Objects for REST response serialization.

pub mod channel_dto;

pub use channel_dto::*;
