//! Chat completion response types.
//!
//! - <https://openrouter.ai/docs/api-reference/overview#responses>
//! - <https://platform.openai.com/docs/api-reference/chat/object>

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::de::{
    null_as_default, object_or_default, objects_or_default, optional_objects, Object,
};
use super::tools::ToolCall;
use crate::errors::MalformedResponseError;

/// Reason the model stopped generating tokens for a choice.
///
/// This is an open set. The associated constants cover the reasons
/// documented today; any other string sent by the API is kept verbatim so
/// newer reasons decode without a client update.
///
/// - <https://openrouter.ai/docs/api-reference/overview#finish-reason>
///
/// ```
/// use openrouter_client::FinishReason;
///
/// let reason: FinishReason = serde_json::from_str(r#""stop""#).unwrap();
/// assert_eq!(reason, FinishReason::STOP);
///
/// let reason: FinishReason = serde_json::from_str(r#""model_overloaded""#).unwrap();
/// assert_eq!(reason.as_str(), "model_overloaded");
/// assert!(!reason.is_known());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FinishReason(Cow<'static, str>);

impl FinishReason {
    /// The model hit a natural stop point or a provided stop sequence.
    pub const STOP: FinishReason = FinishReason(Cow::Borrowed("stop"));
    /// The maximum number of tokens specified in the request was reached.
    pub const LENGTH: FinishReason = FinishReason(Cow::Borrowed("length"));
    /// Content was omitted due to a content filter flag.
    pub const CONTENT_FILTER: FinishReason = FinishReason(Cow::Borrowed("content_filter"));
    /// The model called a tool.
    pub const TOOL_CALLS: FinishReason = FinishReason(Cow::Borrowed("tool_calls"));
    /// The model returned an error.
    pub const ERROR: FinishReason = FinishReason(Cow::Borrowed("error"));

    /// The documented reasons.
    pub const KNOWN: &'static [FinishReason] = &[
        Self::STOP,
        Self::LENGTH,
        Self::CONTENT_FILTER,
        Self::TOOL_CALLS,
        Self::ERROR,
    ];

    /// Wraps a raw reason string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    /// Returns the raw reason string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is one of the documented reasons.
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(self)
    }

    /// Returns true if the API sent no reason (`null` or an empty string).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FinishReason {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for FinishReason {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for FinishReason {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for FinishReason {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FinishReason {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for FinishReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FinishReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` is sent for choices that have not finished yet.
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(Self::new).unwrap_or_default())
    }
}

/// Chat completion response from the OpenRouter API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// A unique identifier for the chat completion.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Completion choices, in the order returned by the API.
    #[serde(default, deserialize_with = "objects_or_default")]
    pub choices: Vec<Choice>,

    /// Usage statistics for the request.
    #[serde(default, deserialize_with = "object_or_default")]
    pub usage: Usage,

    /// Unix timestamp (seconds) of when the completion was created.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: i64,

    /// The model used for the completion.
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,

    /// The object type, `chat.completion`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub object: String,
}

impl ChatCompletionResponse {
    /// Decodes a response body.
    ///
    /// Absent fields take their zero value. Fails only when the body is not a
    /// JSON object of the expected shape; no cross-field checks are made.
    pub fn from_slice(body: &[u8]) -> Result<Self, MalformedResponseError> {
        let Object(response) = serde_json::from_slice::<Object<Self>>(body)?;
        Ok(response)
    }

    /// Returns the content of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }

    /// Returns the finish reason of the first choice.
    pub fn finish_reason(&self) -> Option<&FinishReason> {
        self.choices.first().map(|c| &c.finish_reason)
    }

    /// Returns the creation time, if `created` is a representable timestamp.
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.created, 0)
    }
}

impl FromStr for ChatCompletionResponse {
    type Err = MalformedResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

/// One candidate completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Why the model stopped generating tokens.
    #[serde(default)]
    pub finish_reason: FinishReason,

    /// The message generated by the model.
    #[serde(default, deserialize_with = "object_or_default")]
    pub message: ChatMessage,
}

/// Token usage for a request.
///
/// `total_tokens` is expected to equal `prompt_tokens + completion_tokens`,
/// but that is the API's promise and is not checked while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt_tokens: u64,

    /// Tokens in the generated completion.
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_tokens: u64,

    /// Total tokens used (prompt + completion).
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tokens: u64,
}

impl Usage {
    /// Returns true if `total_tokens == prompt_tokens + completion_tokens`.
    pub fn is_consistent(&self) -> bool {
        self.prompt_tokens
            .checked_add(self.completion_tokens)
            .is_some_and(|sum| sum == self.total_tokens)
    }
}

/// A chat message produced by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    /// Author role, usually `assistant`.
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,

    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Participant name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// ID of the tool call this message answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Tool calls requested by the model.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_objects"
    )]
    pub tool_calls: Option<Vec<ToolCall>>,
}
