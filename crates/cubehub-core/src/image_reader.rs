//! Image classification interface.
//!
//! A classifier receives an image, a prompt and a tool schema, and answers
//! with the JSON arguments of the tool call it chose.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ExError;

/// Where the image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    /// Raw PNG bytes
    Bytes(Vec<u8>),
}

/// Function-style tool the classifier must call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub image: ImageSource,
    pub schema: ToolSchema,
}

#[allow(clippy::result_large_err)]
pub trait ImageReader {
    /// Return the tool-call arguments JSON for `request`.
    ///
    /// # Errors
    ///
    /// `ExternalService`/`Timeout` when the call fails, `InvalidInput` when
    /// the response carries no tool call.
    fn generate(&self, request: &ImageRequest) -> Result<String, ExError>;
}
