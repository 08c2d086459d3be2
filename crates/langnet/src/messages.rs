//! The LangNet records.

use std::collections::BTreeMap;

use langnet_codec::{Message, Value};
use langnet_schema::langnet;

use crate::record::record;
use crate::{Field, Record, RecordError};

record! {
    /// Seconds and nanoseconds since the Unix epoch.
    pub struct Timestamp = langnet::TIMESTAMP {
        1 => pub seconds: i64,
        2 => pub nanos: i32,
    }
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }
}

record! {
    pub struct SearchRequest = langnet::SEARCH_REQUEST {
        1 => pub query: String,
        2 => pub page_number: i32,
        3 => pub results_per_page: i32,
    }
}

record! {
    pub struct SearchResult = langnet::SEARCH_RESULT {
        1 => pub id: String,
        2 => pub title: String,
        3 => pub url: String,
        4 => pub snippet: String,
        5 => pub metadata: BTreeMap<String, String>,
    }
}

record! {
    pub struct SearchResponse = langnet::SEARCH_RESPONSE {
        1 => pub results: Vec<SearchResult>,
        2 => pub total_results: i32,
        3 => pub page_number: i32,
    }
}

record! {
    pub struct User = langnet::USER {
        1 => pub id: String,
        2 => pub username: String,
        3 => pub email: String,
        4 => pub roles: Vec<String>,
        5 => pub preferences: BTreeMap<String, String>,
        6 => pub created_at: Option<Timestamp>,
        7 => pub updated_at: Option<Timestamp>,
    }
}

record! {
    pub struct Config = langnet::CONFIG {
        1 => pub settings: BTreeMap<String, String>,
        2 => pub enabled_features: Vec<String>,
        3 => pub last_updated: Option<Timestamp>,
    }
}

record! {
    pub struct Batch = langnet::BATCH {
        1 => pub batch_id: String,
        2 => pub searches: Vec<SearchRequest>,
        3 => pub users: Vec<User>,
        4 => pub events: Vec<Event>,
    }
}

record! {
    pub struct Event = langnet::EVENT {
        /// Stored in the `type` field.
        1 => pub event_type: EventType,
        2 => pub id: String,
        3 => pub data: BTreeMap<String, String>,
        4 => pub occurred_at: Option<Timestamp>,
        5 => pub source: String,
    }
}

record! {
    /// Failure reported in an [`ApiResponse`].
    pub struct ApiError = langnet::ERROR {
        1 => pub code: String,
        2 => pub message: String,
        3 => pub details: BTreeMap<String, String>,
        4 => pub timestamp: Option<Timestamp>,
    }
}

/// Kind of an [`Event`].
///
/// Numbers outside the declared set survive decoding as
/// [`EventType::Unrecognized`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EventType {
    #[default]
    Unknown,
    Search,
    Click,
    View,
    Purchase,
    Unrecognized(i32),
}

impl From<i32> for EventType {
    fn from(n: i32) -> Self {
        match n {
            0 => Self::Unknown,
            1 => Self::Search,
            2 => Self::Click,
            3 => Self::View,
            4 => Self::Purchase,
            n => Self::Unrecognized(n),
        }
    }
}

impl From<EventType> for i32 {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Unknown => 0,
            EventType::Search => 1,
            EventType::Click => 2,
            EventType::View => 3,
            EventType::Purchase => 4,
            EventType::Unrecognized(n) => n,
        }
    }
}

impl Field for EventType {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError> {
        let value = message.get(tag)?;
        match value.as_enum() {
            Some(n) => Ok(n.into()),
            None => Err(RecordError::Value(langnet_codec::ValueError::TypeMismatch {
                field: message.field(tag)?.name.clone(),
                expected: langnet::EVENT_TYPE.to_owned(),
                actual: value.kind_name(),
            })),
        }
    }

    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError> {
        Ok(message.set(tag, Value::Enum((*self).into()))?)
    }
}

/// The `payload` oneof of an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequestPayload {
    Search(SearchRequest),
    User(User),
    Config(Config),
}

/// Envelope for a request; at most one payload is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    pub request_id: String,
    pub sent_at: Option<Timestamp>,
    pub payload: Option<ApiRequestPayload>,
}

impl Record for ApiRequest {
    const TYPE_NAME: &'static str = langnet::API_REQUEST;

    fn write_fields(&self, message: &mut Message) -> Result<(), RecordError> {
        self.request_id.write(message, 1)?;
        self.sent_at.write(message, 2)?;
        let registry = message.registry().clone();
        let (tag, nested) = match &self.payload {
            Some(ApiRequestPayload::Search(r)) => (3, r.to_message(&registry)?),
            Some(ApiRequestPayload::User(r)) => (4, r.to_message(&registry)?),
            Some(ApiRequestPayload::Config(r)) => (5, r.to_message(&registry)?),
            None => return Ok(()),
        };
        Ok(message.set(tag, nested)?)
    }

    fn read_fields(message: &Message) -> Result<Self, RecordError> {
        let payload = match message.which_oneof("payload")?.map(|f| f.number) {
            Some(3) => Option::<SearchRequest>::read(message, 3)?.map(ApiRequestPayload::Search),
            Some(4) => Option::<User>::read(message, 4)?.map(ApiRequestPayload::User),
            Some(5) => Option::<Config>::read(message, 5)?.map(ApiRequestPayload::Config),
            _ => None,
        };
        Ok(Self {
            request_id: Field::read(message, 1)?,
            sent_at: Field::read(message, 2)?,
            payload,
        })
    }
}

/// The `payload` oneof of an [`ApiResponse`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponsePayload {
    SearchResponse(SearchResponse),
    User(User),
    Error(ApiError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub request_id: String,
    pub received_at: Option<Timestamp>,
    pub payload: Option<ApiResponsePayload>,
}

impl Record for ApiResponse {
    const TYPE_NAME: &'static str = langnet::API_RESPONSE;

    fn write_fields(&self, message: &mut Message) -> Result<(), RecordError> {
        self.request_id.write(message, 1)?;
        self.received_at.write(message, 2)?;
        let registry = message.registry().clone();
        let (tag, nested) = match &self.payload {
            Some(ApiResponsePayload::SearchResponse(r)) => (3, r.to_message(&registry)?),
            Some(ApiResponsePayload::User(r)) => (4, r.to_message(&registry)?),
            Some(ApiResponsePayload::Error(r)) => (5, r.to_message(&registry)?),
            None => return Ok(()),
        };
        Ok(message.set(tag, nested)?)
    }

    fn read_fields(message: &Message) -> Result<Self, RecordError> {
        let payload = match message.which_oneof("payload")?.map(|f| f.number) {
            Some(3) => Option::<SearchResponse>::read(message, 3)?
                .map(ApiResponsePayload::SearchResponse),
            Some(4) => Option::<User>::read(message, 4)?.map(ApiResponsePayload::User),
            Some(5) => Option::<ApiError>::read(message, 5)?.map(ApiResponsePayload::Error),
            _ => None,
        };
        Ok(Self {
            request_id: Field::read(message, 1)?,
            received_at: Field::read(message, 2)?,
            payload,
        })
    }
}
