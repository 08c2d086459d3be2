//! The LangNet schema.
//!
//! Search, user, configuration and event records exchanged between the
//! LangNet writer and reader, all in the `langnet` package.

use crate::builder::{EnumBuilder, MessageBuilder};
use crate::descriptor::FieldDescriptor;
use crate::error::SchemaError;
use crate::kind::{FieldType, ScalarKind};
use crate::registry::{Registry, RegistryBuilder};

pub const TIMESTAMP: &str = "langnet.Timestamp";
pub const SEARCH_REQUEST: &str = "langnet.SearchRequest";
pub const SEARCH_RESULT: &str = "langnet.SearchResult";
pub const SEARCH_RESPONSE: &str = "langnet.SearchResponse";
pub const USER: &str = "langnet.User";
pub const API_REQUEST: &str = "langnet.ApiRequest";
pub const API_RESPONSE: &str = "langnet.ApiResponse";
pub const CONFIG: &str = "langnet.Config";
pub const BATCH: &str = "langnet.Batch";
pub const EVENT: &str = "langnet.Event";
pub const EVENT_TYPE: &str = "langnet.Event.EventType";
pub const ERROR: &str = "langnet.Error";

fn string(name: &str, number: u32) -> FieldDescriptor {
    FieldDescriptor::new(name, number, ScalarKind::String)
}

fn int32(name: &str, number: u32) -> FieldDescriptor {
    FieldDescriptor::new(name, number, ScalarKind::Int32)
}

fn message(name: &str, number: u32, type_name: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, number, FieldType::message(type_name))
}

fn string_map(name: &str, number: u32) -> FieldDescriptor {
    string(name, number).map(ScalarKind::String)
}

/// Definitions of every LangNet type, for callers that layer extra types on top.
pub fn definitions() -> RegistryBuilder {
    Registry::builder()
        .message(
            MessageBuilder::new(TIMESTAMP)
                .field(FieldDescriptor::new("seconds", 1, ScalarKind::Int64))
                .field(int32("nanos", 2)),
        )
        .message(
            MessageBuilder::new(SEARCH_REQUEST)
                .field(string("query", 1))
                .field(int32("page_number", 2))
                .field(int32("results_per_page", 3)),
        )
        .message(
            MessageBuilder::new(SEARCH_RESULT)
                .field(string("id", 1))
                .field(string("title", 2))
                .field(string("url", 3))
                .field(string("snippet", 4))
                .field(string_map("metadata", 5)),
        )
        .message(
            MessageBuilder::new(SEARCH_RESPONSE)
                .field(message("results", 1, SEARCH_RESULT).repeated())
                .field(int32("total_results", 2))
                .field(int32("page_number", 3)),
        )
        .message(
            MessageBuilder::new(USER)
                .field(string("id", 1))
                .field(string("username", 2))
                .field(string("email", 3))
                .field(string("roles", 4).repeated())
                .field(string_map("preferences", 5))
                .field(message("created_at", 6, TIMESTAMP))
                .field(message("updated_at", 7, TIMESTAMP)),
        )
        .message(
            MessageBuilder::new(API_REQUEST)
                .field(string("request_id", 1))
                .field(message("sent_at", 2, TIMESTAMP))
                .oneof(
                    "payload",
                    vec![
                        message("search", 3, SEARCH_REQUEST),
                        message("user", 4, USER),
                        message("config", 5, CONFIG),
                    ],
                ),
        )
        .message(
            MessageBuilder::new(API_RESPONSE)
                .field(string("request_id", 1))
                .field(message("received_at", 2, TIMESTAMP))
                .oneof(
                    "payload",
                    vec![
                        message("search_response", 3, SEARCH_RESPONSE),
                        message("user", 4, USER),
                        message("error", 5, ERROR),
                    ],
                ),
        )
        .message(
            MessageBuilder::new(CONFIG)
                .field(string_map("settings", 1))
                .field(string("enabled_features", 2).repeated())
                .field(message("last_updated", 3, TIMESTAMP)),
        )
        .message(
            MessageBuilder::new(BATCH)
                .field(string("batch_id", 1))
                .field(message("searches", 2, SEARCH_REQUEST).repeated())
                .field(message("users", 3, USER).repeated())
                .field(message("events", 4, EVENT).repeated()),
        )
        .enumeration(
            EnumBuilder::new(EVENT_TYPE)
                .value("UNKNOWN", 0)
                .value("SEARCH", 1)
                .value("CLICK", 2)
                .value("VIEW", 3)
                .value("PURCHASE", 4),
        )
        .message(
            MessageBuilder::new(EVENT)
                .field(FieldDescriptor::new("type", 1, FieldType::enumeration(EVENT_TYPE)))
                .field(string("id", 2))
                .field(string_map("data", 3))
                .field(message("occurred_at", 4, TIMESTAMP))
                .field(string("source", 5)),
        )
        .message(
            MessageBuilder::new(ERROR)
                .field(string("code", 1))
                .field(string("message", 2))
                .field(string_map("details", 3))
                .field(message("timestamp", 4, TIMESTAMP)),
        )
}

/// Builds the LangNet registry.
pub fn registry() -> Result<Registry, SchemaError> {
    definitions().build()
}
