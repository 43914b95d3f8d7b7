// gemdoc - Document question answering with Gemini
// Author: kelexine (https://github.com/kelexine)

use anyhow::{bail, Result};
use clap::Parser;
use gemdoc::cli::{read_api_key, Args};
use gemdoc::config::AppConfig;
use gemdoc::document::Upload;
use gemdoc::gemini::{ApiKey, GeminiClient};
use gemdoc::session::{Assistant, Session};
use gemdoc::shell::Shell;
use gemdoc::utils::logging;
use std::io::IsTerminal;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(model) = &args.model {
        config.gemini.model = model.clone();
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting gemdoc v{}", env!("CARGO_PKG_VERSION"));

    let mut input = BufReader::new(tokio::io::stdin());

    // Phase 3: Resolve the API key (flag, GEMINI_API_KEY, or prompt)
    let api_key = match args.api_key {
        Some(key) => ApiKey::new(key),
        None => read_api_key(&mut input, std::io::stdin().is_terminal()).await?,
    };
    if api_key.is_empty() {
        bail!("Please add your Gemini API key to continue.");
    }

    // Phase 4: Build the client and the assistant
    let client = GeminiClient::new(&config.gemini, api_key)?;
    info!("Using {} at {}", config.gemini.model, client.base_url());
    let assistant = Assistant::from_config(client, &config);

    let mut shell = Shell::new(
        assistant,
        Session::with_system_prompt(args.system),
        std::io::stdout(),
    );
    if let Some(path) = &args.file {
        let upload = Upload::from_path(path).await?;
        println!("Uploaded {} ({} bytes)", upload.file_name, upload.bytes.len());
        shell = shell.with_upload(upload);
    }

    println!("Ask a question about the document, or /help for commands.");

    // Phase 5: Interactive loop
    shell.run(&mut input).await?;

    info!("Session ended");
    Ok(())
}
