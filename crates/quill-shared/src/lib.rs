//! # Quill Shared
//!
//! Wire types shared by the API server and its clients: request and
//! response DTOs plus the response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, PageResponse};
