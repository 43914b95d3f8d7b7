// Interactive terminal shell
// Author: kelexine (https://github.com/kelexine)

use crate::document::{PdfExtractor, Upload};
use crate::error::Result;
use crate::gemini::GenerativeService;
use crate::responder::TerminalRenderer;
use crate::session::{Assistant, Session};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask a question about the current upload.
    Ask(String),
    /// Replace the current upload.
    File(PathBuf),
    /// Overwrite the system instruction (empty clears it).
    System(String),
    History,
    Stats,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if !line.starts_with('/') {
            return Command::Ask(line.to_string());
        }

        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match name {
            "/file" if !rest.is_empty() => Command::File(PathBuf::from(rest)),
            "/system" => Command::System(rest.to_string()),
            "/history" => Command::History,
            "/stats" => Command::Stats,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Unknown(name.to_string()),
        }
    }
}

const HELP: &str = "Commands:
  /file <path>     upload a document (.pdf, .md, .mmd)
  /system <text>   set the system prompt (empty to clear)
  /history         show the conversation
  /stats           show cache statistics
  /quit            exit
Anything else is a question about the uploaded document.";

/// Line-oriented front-end: reads commands, prints answers as they stream.
pub struct Shell<S, W, P = crate::document::LopdfExtractor> {
    assistant: Assistant<S, P>,
    session: Session,
    upload: Option<Upload>,
    out: W,
}

impl<S, W, P> Shell<S, W, P>
where
    S: GenerativeService,
    W: Write,
    P: PdfExtractor,
{
    pub fn new(assistant: Assistant<S, P>, session: Session, out: W) -> Self {
        Self {
            assistant,
            session,
            upload: None,
            out,
        }
    }

    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read lines from `input` until `/quit` or end of input.
    ///
    /// A failed turn is reported and the shell keeps going.
    pub async fn run<I: AsyncBufRead + Unpin>(&mut self, input: I) -> Result<()> {
        let mut lines = input.lines();

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };

            match Command::parse(&line) {
                Command::Quit => break,
                command => {
                    if let Err(e) = self.handle(command).await {
                        error!("Turn failed: {}", e);
                        writeln!(self.out, "Error: {}", e)?;
                    }
                }
            }
        }

        Ok(())
    }

    async fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Ask(question) => self.ask(&question).await,
            Command::File(path) => {
                let upload = Upload::from_path(&path).await?;
                writeln!(self.out, "Uploaded {} ({} bytes)", upload.file_name, upload.bytes.len())?;
                self.upload = Some(upload);
                Ok(())
            }
            Command::System(text) => {
                self.session.set_system_prompt(text);
                if self.session.system_prompt().is_empty() {
                    writeln!(self.out, "System prompt cleared")?;
                } else {
                    writeln!(self.out, "System prompt updated")?;
                }
                Ok(())
            }
            Command::History => {
                for message in self.session.conversation().messages() {
                    writeln!(self.out, "[{}] {}", message.role(), message.content())?;
                }
                Ok(())
            }
            Command::Stats => {
                let stats = self.assistant.cache_stats().await;
                writeln!(
                    self.out,
                    "caches created: {}, fallbacks: {}, skipped: {}",
                    stats.creates, stats.fallbacks, stats.skipped
                )?;
                Ok(())
            }
            Command::Help => {
                writeln!(self.out, "{}", HELP)?;
                Ok(())
            }
            Command::Unknown(name) => {
                writeln!(self.out, "Unknown command {}, try /help", name)?;
                Ok(())
            }
            Command::Empty | Command::Quit => Ok(()),
        }
    }

    async fn ask(&mut self, question: &str) -> Result<()> {
        let Some(upload) = self.upload.as_ref() else {
            writeln!(self.out, "Upload a document first with /file <path>")?;
            return Ok(());
        };

        let mut renderer = TerminalRenderer::new(&mut self.out);
        let outcome = self
            .assistant
            .ask(&mut self.session, upload, question, &mut renderer)
            .await;
        // Terminate the streamed line even when the turn failed part way
        writeln!(self.out)?;

        let outcome = outcome?;
        debug!("Turn complete (cached: {})", outcome.cached);
        Ok(())
    }
}
