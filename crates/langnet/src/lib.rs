//! Typed LangNet records.
//!
//! Each record is a plain struct converted to and from a
//! [`langnet_codec::Message`] of the LangNet registry, so it shares the
//! binary and JSON encodings of the dynamic value model.
//!
//! ```
//! use langnet::{Record, SearchRequest};
//!
//! let registry = langnet::registry().unwrap();
//! let request = SearchRequest {
//!     query: "rust".into(),
//!     page_number: 1,
//!     results_per_page: 10,
//! };
//! let bytes = request.encode_binary(&registry).unwrap();
//! assert_eq!(SearchRequest::decode_binary(&registry, &bytes).unwrap(), request);
//! assert_eq!(
//!     request.encode_json(&registry).unwrap(),
//!     r#"{"query":"rust","pageNumber":1,"resultsPerPage":10}"#
//! );
//! ```

mod error;
mod field;
mod messages;
mod record;

pub mod samples;

pub use error::RecordError;
pub use field::Field;
pub use langnet_schema::langnet::registry;
pub use messages::{
    ApiError, ApiRequest, ApiRequestPayload, ApiResponse, ApiResponsePayload, Batch, Config,
    Event, EventType, SearchRequest, SearchResponse, SearchResult, Timestamp, User,
};
pub use record::Record;
