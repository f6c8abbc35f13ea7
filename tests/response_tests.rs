//! Tests for response decoding through the public API.

use openrouter_client::{ChatCompletionResponse, FinishReason, MalformedResponseError};
use pretty_assertions::assert_eq;

#[test]
fn test_decode_reference_response() {
    let body = r#"{"id":"abc","object":"chat.completion","created":1700000000,"model":"gpt-x","choices":[{"finish_reason":"stop","message":{}}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;

    let response = ChatCompletionResponse::from_slice(body.as_bytes()).unwrap();

    assert_eq!(response.id, "abc");
    assert_eq!(response.object, "chat.completion");
    assert_eq!(response.created, 1_700_000_000);
    assert_eq!(response.model, "gpt-x");
    assert_eq!(response.choices.len(), 1);
    assert_eq!(response.choices[0].finish_reason, FinishReason::STOP);
    assert_eq!(response.usage.prompt_tokens, 10);
    assert_eq!(response.usage.completion_tokens, 5);
    assert_eq!(response.usage.total_tokens, 15);
}

#[test]
fn test_unknown_finish_reason_is_preserved() {
    let body = r#"{"choices":[{"finish_reason":"unknown_future_value","message":{}}]}"#;
    let response: ChatCompletionResponse = body.parse().unwrap();

    let reason = &response.choices[0].finish_reason;
    assert_eq!(reason.as_str(), "unknown_future_value");
    assert!(!reason.is_known());
}

#[test]
fn test_choices_omitted_decodes_empty() {
    let response: ChatCompletionResponse = r#"{"id":"gen-1","model":"m"}"#.parse().unwrap();
    assert!(response.choices.is_empty());
    assert_eq!(response.finish_reason(), None);
}

#[test]
fn test_choice_order_is_preserved() {
    let body = r#"{"choices":[
        {"finish_reason":"length","message":{"content":"first"}},
        {"finish_reason":"stop","message":{"content":"second"}},
        {"finish_reason":"content_filter","message":{"content":"third"}}
    ]}"#;
    let response: ChatCompletionResponse = body.parse().unwrap();

    let contents: Vec<_> = response
        .choices
        .iter()
        .map(|c| c.message.content.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
    assert_eq!(response.content(), Some("first"));
}

#[test]
fn test_token_count_as_string_is_malformed() {
    let result: Result<ChatCompletionResponse, MalformedResponseError> =
        r#"{"usage":{"prompt_tokens":"not-a-number"}}"#.parse();

    let err = result.unwrap_err();
    assert!(err.message.contains("invalid type"));
    assert_eq!(err.line, 1);
}

#[test]
fn test_nested_arrays_are_malformed() {
    for body in [
        r#"{"usage":[10,5,15]}"#,
        r#"{"choices":[["stop",{}]]}"#,
        r#"{"choices":[{"finish_reason":"stop","message":["assistant","hi"]}]}"#,
    ] {
        let result: Result<ChatCompletionResponse, MalformedResponseError> = body.parse();
        let err = result.unwrap_err();
        assert!(err.message.contains("invalid type: sequence"), "{}", err.message);
    }
}

#[test]
fn test_finish_reason_round_trip() {
    let samples = [
        String::new(),
        "stop".to_string(),
        "tool_calls".to_string(),
        "unknown_future_value".to_string(),
        "\u{0}control\u{1f}".to_string(),
        "emoji 🚀 and \"quotes\"".to_string(),
        "x".repeat(4096),
    ];

    for raw in samples {
        let reason = FinishReason::new(raw.clone());
        let encoded = serde_json::to_string(&reason).unwrap();
        let decoded: FinishReason = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.as_str(), raw);
        assert_eq!(decoded, reason);
    }
}

#[test]
fn test_named_constants() {
    let names: Vec<_> = FinishReason::KNOWN.iter().map(FinishReason::as_str).collect();
    assert_eq!(
        names,
        vec!["stop", "length", "content_filter", "tool_calls", "error"]
    );
}
