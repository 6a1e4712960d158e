use async_trait::async_trait;
use handler_core::{Attachment, CodeGenerator, FileSet};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::client::ChatClient;
use crate::error::{GenerationError, GenerationResult};
use crate::fallback;
use crate::prompts;
use crate::types::ChatMessage;

pub const MODIFY_PARSE_FAILURE: &str = "Failed to parse modification response";

/// [`CodeGenerator`] backed by a chat completions model.
pub struct LlmCodeGenerator {
    client: ChatClient,
}

impl LlmCodeGenerator {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    async fn request_files(&self, system: &str, prompt: String) -> GenerationResult<FileSet> {
        let reply = self
            .client
            .chat_completion(vec![ChatMessage::system(system), ChatMessage::user(prompt)])
            .await?;
        parse_reply(&reply)
    }
}

#[async_trait]
impl CodeGenerator for LlmCodeGenerator {
    async fn generate(&self, brief: &str, attachments: &[Attachment], checks: &[String]) -> FileSet {
        let prompt = prompts::create_prompt(brief, attachments, checks);

        match self.request_files(prompts::CREATE_SYSTEM_PROMPT, prompt).await {
            Ok(files) => {
                info!(files = files.len(), model = %self.client.model(), "Generated application files");
                debug!(paths = ?files.paths().collect::<Vec<_>>(), "Generated paths");
                files
            }
            Err(e) => {
                warn!(error = %e, "Error generating code, using default application");
                fallback::default_files(brief)
            }
        }
    }

    async fn modify(&self, instruction: &str, repo_name: &str, checks: &[String]) -> FileSet {
        let prompt = prompts::modify_prompt(instruction, repo_name, checks);

        match self.request_files(prompts::MODIFY_SYSTEM_PROMPT, prompt).await {
            Ok(files) => {
                info!(files = files.len(), repo = %repo_name, "Generated modified files");
                files
            }
            Err(e) if e.is_parse_failure() => {
                warn!(repo = %repo_name, error = %e, "Modification reply was not a file map");
                FileSet::error(MODIFY_PARSE_FAILURE)
            }
            Err(e) => {
                warn!(repo = %repo_name, error = %e, "Error modifying code");
                FileSet::error(format!("Modification failed: {}", e))
            }
        }
    }
}

/// Parse a model reply into a [`FileSet`].
///
/// The reply must be a JSON object of path to content, optionally wrapped in a
/// fenced code block. Non-string values are stored as pretty-printed JSON.
pub fn parse_reply(reply: &str) -> GenerationResult<FileSet> {
    let object = serde_json::from_str::<Map<String, Value>>(reply.trim())
        .ok()
        .or_else(|| {
            let body = fenced_body(reply)?;
            serde_json::from_str::<Map<String, Value>>(body).ok()
        })
        .ok_or_else(|| GenerationError::UnparseableReply(preview(reply)))?;

    if object.is_empty() {
        return Err(GenerationError::UnparseableReply("empty file map".to_string()));
    }

    let mut files = FileSet::new();
    for (path, value) in object {
        let content = match value {
            Value::String(text) => text,
            other => serde_json::to_string_pretty(&other)?,
        };
        files.insert(path, content);
    }

    Ok(files)
}

fn fenced_body(reply: &str) -> Option<&str> {
    let fence = Regex::new(r"(?s)```(?:json)?\s*\n?(\{.*\})\s*```").ok()?;
    let caps = fence.captures(reply)?;
    Some(caps.get(1)?.as_str())
}

fn preview(reply: &str) -> String {
    let head: String = reply.chars().take(80).collect();
    if head.len() < reply.len() {
        format!("{}...", head)
    } else {
        head
    }
}
