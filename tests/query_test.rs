#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use docmind_extract::query::{
    answer_from_response, error_for_status, interpret_reply, prepare, Action, MessagesRequest,
    ModelConfig, QueryError, QueryReply, QueryRequest, NO_ANSWER,
};
use docmind_extract::{extract_html, ErrorCode, MAX_CHARS};

fn page_text() -> String {
    let html = format!(
        "<body><nav>Home</nav><article><h1>Tides</h1><p>{}</p></article><footer>Contact</footer></body>",
        "Tides are caused by the gravitational pull of the moon and the sun. ".repeat(3)
    );
    let result = extract_html(&html, None, None);
    assert!(result.is_success());
    result.text().to_string()
}

#[test]
fn extracted_text_flows_into_every_action() {
    let text = page_text();
    for action in Action::ALL {
        let request = QueryRequest::new(text.clone(), action).with_question("What causes tides?");
        let prepared = prepare(&request).expect("valid request");
        assert_eq!(prepared.action, action);
        assert!(prepared.prompt.contains(&text));
        assert!(!prepared.truncated);
    }
}

#[test]
fn request_json_matches_wire_shape() {
    let request: QueryRequest = serde_json::from_str(&format!(
        r#"{{"text":{},"action":"ask","question":"What causes tides?"}}"#,
        serde_json::to_string(&page_text()).expect("string")
    ))
    .expect("request json");

    let prepared = prepare(&request).expect("valid request");
    assert!(prepared.prompt.ends_with("\n\nQuestion: What causes tides?"));

    let body = serde_json::to_value(MessagesRequest::new(&ModelConfig::new("test-key"), &prepared))
        .expect("body json");
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
    assert!(body["system"].as_str().is_some_and(|s| s.contains(NO_ANSWER)));
}

#[test]
fn oversized_text_is_rebounded() {
    let request = QueryRequest::new("q".repeat(MAX_CHARS * 2), Action::Summarize);
    let prepared = prepare(&request).expect("valid request");
    assert!(prepared.truncated);
    assert_eq!(prepared.prompt.matches('q').count(), MAX_CHARS);
}

#[test]
fn short_text_and_blank_question_are_rejected() {
    let err = prepare(&QueryRequest::new("short", Action::Summarize)).expect_err("too short");
    assert_eq!(err.error, ErrorCode::InsufficientText);
    assert_eq!(err.status(), 400);

    let err = prepare(&QueryRequest::new(page_text(), Action::Ask).with_question("\t"))
        .expect_err("blank question");
    assert_eq!(err.message.as_deref(), Some("Question is required"));
}

#[test]
fn model_round_trip_to_popup() {
    let response = serde_json::json!({
        "content": [{"type": "text", "text": NO_ANSWER}],
        "stop_reason": "end_turn"
    });
    let reply = QueryReply::from(answer_from_response(response));
    assert_eq!(reply.status(), 200);

    let body = serde_json::to_string(&reply).expect("reply json");
    assert_eq!(interpret_reply(reply.status(), &body), Ok(NO_ANSWER.to_string()));
}

#[test]
fn rate_limit_round_trip_to_popup() {
    let reply = QueryReply::Error(error_for_status(429, Some("rate limit exceeded".into())));
    assert_eq!(reply.status(), 429);

    let body = serde_json::to_string(&reply).expect("reply json");
    assert_eq!(body, r#"{"error":"RATE_LIMITED"}"#);
    assert_eq!(interpret_reply(reply.status(), &body), Err(ErrorCode::RateLimited));
}

#[test]
fn provider_failure_round_trip_to_popup() {
    let err = error_for_status(503, Some("overloaded".into()));
    assert_eq!(err, QueryError::with_message(ErrorCode::ApiError, "overloaded"));

    let reply = QueryReply::Error(err);
    let body = serde_json::to_string(&reply).expect("reply json");
    assert_eq!(interpret_reply(reply.status(), &body), Err(ErrorCode::ApiError));
}
