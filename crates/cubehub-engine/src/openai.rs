//! OpenAI chat-completions backend for [`ImageReader`]
//!
//! Sends the prompt and image as one user message and forces a strict
//! function tool; the reply is the arguments of the first tool call.

#![allow(clippy::result_large_err)]

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cubehub_core::errors::{ExError, ExErrorKind, Result};
use cubehub_core::image_reader::{ImageReader, ImageRequest, ImageSource, ToolSchema};
use cubehub_core_types::Sensitive;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{build_client, decode_json, ensure_success, from_reqwest, DEFAULT_TIMEOUT};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str = "You classify images of game cards. \
Always answer by calling the provided tool with arguments that match its schema.";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Sensitive<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Sensitive::new(api_key.into()),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    tools: Vec<Tool>,
    tool_choice: &'static str,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Value,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ToolFunction,
}

#[derive(Debug, Serialize)]
struct ToolFunction {
    name: String,
    description: String,
    strict: bool,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: ToolCallFunction,
}

#[derive(Debug, Deserialize)]
struct ToolCallFunction {
    arguments: String,
}

fn image_url(image: &ImageSource) -> String {
    match image {
        ImageSource::Url(url) => url.clone(),
        ImageSource::Bytes(bytes) => format!("data:image/png;base64,{}", STANDARD.encode(bytes)),
    }
}

fn tool(schema: &ToolSchema) -> Tool {
    Tool {
        kind: "function",
        function: ToolFunction {
            name: schema.name.clone(),
            description: schema.description.clone(),
            strict: true,
            parameters: schema.parameters.clone(),
        },
    }
}

fn chat_request(model: &str, request: &ImageRequest) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message {
                role: "system",
                content: Value::String(SYSTEM_PROMPT.to_string()),
            },
            Message {
                role: "user",
                content: serde_json::json!([
                    {"type": "text", "text": request.prompt},
                    {
                        "type": "image_url",
                        "image_url": {"url": image_url(&request.image), "detail": "high"}
                    }
                ]),
            },
        ],
        tools: vec![tool(&request.schema)],
        tool_choice: "required",
    }
}

fn first_tool_arguments(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .flat_map(|choice| choice.message.tool_calls)
        .map(|call| call.function.arguments)
        .next()
        .ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("generate")
                .with_message("no tool call found")
        })
}

pub struct OpenAiImageReader {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiImageReader {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            config,
        })
    }
}

impl ImageReader for OpenAiImageReader {
    fn generate(&self, request: &ImageRequest) -> Result<String> {
        const OP: &str = "generate";
        tracing::debug!(model = %self.config.model, tool = %request.schema.name, "Calling image classifier");

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose())
            .json(&chat_request(&self.config.model, request))
            .send()
            .map_err(|e| from_reqwest(OP, e))?;
        let body = ensure_success(OP, response)?
            .text()
            .map_err(|e| from_reqwest(OP, e))?;
        first_tool_arguments(decode_json(OP, &body)?)
    }
}
