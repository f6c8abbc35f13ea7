//! Tool call types carried by assistant messages.

use serde::{Deserialize, Serialize};

use super::de::object_or_default;

/// Tool call from the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolCall {
    /// Unique tool call ID.
    pub id: String,

    /// Tool type (always "function" today).
    #[serde(rename = "type")]
    pub type_: String,

    /// Function call details.
    #[serde(deserialize_with = "object_or_default")]
    pub function: FunctionCall,
}

/// Function call details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionCall {
    /// Function name.
    pub name: String,

    /// Function arguments as JSON string.
    pub arguments: String,
}

impl FunctionCall {
    /// Parses the arguments as a specific type.
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}
