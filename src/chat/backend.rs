use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::{debug, info};

use super::{ChatMessage, Role};
use crate::utils::AppConfig;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no assistant backend configured; set `backend_command` in {0}")]
    NotConfigured(String),
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("backend I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode conversation: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("backend exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },
    #[error("backend returned an empty reply")]
    EmptyReply,
}

/// Produces the assistant's reply for a conversation history.
pub trait AssistantBackend: Send + Sync {
    fn send_message(&self, history: &[ChatMessage]) -> Result<String, BackendError>;
}

#[derive(Serialize)]
struct BackendRequest<'a> {
    messages: Vec<StoredMessage<'a>>,
}

#[derive(Serialize)]
struct StoredMessage<'a> {
    role: Role,
    content: &'a str,
}

/// Serializes the history into the JSON request read by backend programs:
/// `{"messages":[{"role":"user","content":"..."}]}`.
pub fn encode_history(history: &[ChatMessage]) -> Result<String, BackendError> {
    let request = BackendRequest {
        messages: history
            .iter()
            .map(|message| StoredMessage {
                role: message.role,
                content: &message.content,
            })
            .collect(),
    };
    Ok(serde_json::to_string(&request)?)
}

/// Runs an external program per request: the encoded history goes to its
/// stdin and its stdout is the reply.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
}

impl CommandBackend {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl AssistantBackend for CommandBackend {
    fn send_message(&self, history: &[ChatMessage]) -> Result<String, BackendError> {
        let payload = encode_history(history)?;
        debug!(program = %self.program, messages = history.len(), "sending conversation");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(payload.as_bytes()) {
                Ok(()) => {}
                // The program may answer without reading the conversation.
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    debug!("backend closed stdin before reading the request");
                }
                Err(err) => return Err(err.into()),
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(BackendError::Exit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let reply = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if reply.is_empty() {
            return Err(BackendError::EmptyReply);
        }
        info!(bytes = reply.len(), "assistant reply received");
        Ok(reply)
    }
}

/// Builds the backend described by the configuration.
pub fn backend_from_config(config: &AppConfig) -> Result<Box<dyn AssistantBackend>, BackendError> {
    let program = config.backend_command.trim();
    if program.is_empty() {
        let location = AppConfig::config_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "the configuration file".to_string());
        return Err(BackendError::NotConfigured(location));
    }
    Ok(Box::new(CommandBackend::new(
        program,
        config.backend_args.clone(),
    )))
}
