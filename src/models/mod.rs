//! Data models for the Gemini Generative Language API.
//!
//! Request and response bodies for content generation (`gemini`). Cache creation
//! bodies live next to the client in `crate::gemini::cache_models`.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod gemini;

pub use gemini::{Content, GenerateContentRequest, GenerateContentResponse, Part, SystemInstruction};
