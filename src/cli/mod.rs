// CLI module for gemdoc
// Author: kelexine (https://github.com/kelexine)

use crate::error::{GemdocError, Result};
use crate::gemini::ApiKey;
use clap::Parser;
use dialoguer::Password;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const API_KEY_PROMPT: &str = "Gemini API Key";

/// gemdoc - ask Gemini questions about a document
#[derive(Parser, Debug)]
#[command(name = "gemdoc", version, about, long_about = None)]
pub struct Args {
    /// Document to upload (.pdf, .md, .mmd)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// System prompt for the model
    #[arg(short, long, default_value = "")]
    pub system: String,

    /// Gemini API key (prompted for when absent)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model to use, overriding the configuration
    #[arg(short, long)]
    pub model: Option<String>,

    /// Never create a context cache; always resend the document
    #[arg(long)]
    pub no_cache: bool,

    /// Configuration file (default: ~/.gemdoc/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Ask for the API key. On a terminal the key is read without echo; otherwise
/// it is the next line of `input`.
pub async fn read_api_key<R: AsyncBufRead + Unpin>(
    input: &mut R,
    interactive: bool,
) -> Result<ApiKey> {
    if interactive {
        let key = tokio::task::spawn_blocking(|| {
            Password::new()
                .with_prompt(API_KEY_PROMPT)
                .allow_empty_password(true)
                .interact()
        })
        .await
        .map_err(|e| GemdocError::InvalidRequest(format!("API key prompt failed: {}", e)))?
        .map_err(|e| GemdocError::InvalidRequest(format!("Failed to read API key: {}", e)))?;
        return Ok(ApiKey::new(key));
    }

    print!("{}: ", API_KEY_PROMPT);
    std::io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line).await?;
    Ok(ApiKey::new(line))
}
