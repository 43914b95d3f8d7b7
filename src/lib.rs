// gemdoc - Document question answering with Gemini
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod gemini;
pub mod models;
pub mod responder;
pub mod session;
pub mod shell;
pub mod utils;
