//! Reference LangNet records: one populated instance of each message kind.
//! Constructors with time fields take the timestamp to stamp into them.

use std::collections::BTreeMap;

use crate::messages::*;

fn strings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

pub fn search_request() -> SearchRequest {
    SearchRequest {
        query: "protocol buffers python zig".into(),
        page_number: 1,
        results_per_page: 20,
    }
}

pub fn search_response() -> SearchResponse {
    let results = [
        (
            "result-1",
            "Protocol Buffers Documentation",
            "https://protobuf.dev",
            "Official Protocol Buffers documentation",
            [("source", "official"), ("language", "multiple")],
        ),
        (
            "result-2",
            "Zig Programming Language",
            "https://ziglang.org",
            "Official Zig programming language website",
            [("source", "official"), ("language", "zig")],
        ),
        (
            "result-3",
            "Python Protocol Buffers Guide",
            "https://developers.google.com/protocol-buffers/docs/pythontutorial",
            "Using Protocol Buffers with Python",
            [("source", "google"), ("language", "python")],
        ),
    ];
    SearchResponse {
        results: results
            .iter()
            .map(|(id, title, url, snippet, metadata)| SearchResult {
                id: (*id).into(),
                title: (*title).into(),
                url: (*url).into(),
                snippet: (*snippet).into(),
                metadata: strings(metadata),
            })
            .collect(),
        total_results: 3,
        page_number: 1,
    }
}

pub fn user(now: Timestamp) -> User {
    User {
        id: "user-123".into(),
        username: "testuser".into(),
        email: "test@example.com".into(),
        roles: vec!["user".into(), "admin".into()],
        preferences: strings(&[("theme", "dark"), ("language", "en")]),
        created_at: Some(now.clone()),
        updated_at: Some(now),
    }
}

pub fn config(now: Timestamp) -> Config {
    Config {
        settings: strings(&[
            ("api_endpoint", "https://api.example.com"),
            ("timeout", "30"),
            ("retries", "3"),
        ]),
        enabled_features: vec!["search".into(), "users".into(), "analytics".into()],
        last_updated: Some(now),
    }
}

pub fn batch() -> Batch {
    Batch {
        batch_id: "batch-2025-01-15".into(),
        searches: (0..3)
            .map(|i| SearchRequest {
                query: format!("search query {i}"),
                page_number: 1,
                results_per_page: 10,
            })
            .collect(),
        users: (0..2)
            .map(|i| User {
                id: format!("batch-user-{i}"),
                username: format!("user{i}"),
                email: format!("user{i}@example.com"),
                roles: vec!["user".into()],
                ..Default::default()
            })
            .collect(),
        events: Vec::new(),
    }
}

pub fn event(now: Timestamp) -> Event {
    Event {
        event_type: EventType::Search,
        id: "event-123".into(),
        data: strings(&[("query", "test"), ("results", "3")]),
        occurred_at: Some(now),
        source: "python-writer".into(),
    }
}

pub fn api_request(now: Timestamp) -> ApiRequest {
    ApiRequest {
        request_id: "req-123".into(),
        sent_at: Some(now),
        payload: Some(ApiRequestPayload::Search(search_request())),
    }
}

pub fn api_response(now: Timestamp) -> ApiResponse {
    ApiResponse {
        request_id: "req-123".into(),
        received_at: Some(now),
        payload: Some(ApiResponsePayload::SearchResponse(search_response())),
    }
}

pub fn error_response(now: Timestamp) -> ApiError {
    ApiError {
        code: "NOT_FOUND".into(),
        message: "Resource not found".into(),
        details: strings(&[("resource_id", "xyz-123")]),
        timestamp: Some(now),
    }
}
