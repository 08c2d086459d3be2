//! Encoder and decoder options.
//!
//! Both structs deserialize from JSON or TOML with every key optional, so a
//! host can keep codec settings next to the rest of its configuration:
//!
//! ```
//! use langnet_codec::{FieldNaming, JsonOptions};
//!
//! let opts: JsonOptions =
//!     serde_json::from_str(r#"{"field_names": "proto", "pretty": true}"#).unwrap();
//! assert_eq!(opts.field_names, FieldNaming::Proto);
//! assert!(opts.ignore_unknown_fields);
//! ```

use serde::Deserialize;

/// Default nesting limit for both decoders.
pub const DEFAULT_RECURSION_LIMIT: usize = 100;

/// Binary codec options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BinaryOptions {
    /// Pack repeated numeric fields that do not override packing themselves.
    pub pack_repeated: bool,
    /// Maximum nesting depth accepted by the decoder.
    pub recursion_limit: usize,
}

impl Default for BinaryOptions {
    fn default() -> Self {
        Self {
            pack_repeated: true,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

/// Which field name the JSON encoder writes as the object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNaming {
    /// The declared schema name, e.g. `page_number`.
    Proto,
    /// The camelCase name, e.g. `pageNumber`.
    #[default]
    CamelCase,
}

/// JSON codec options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    pub field_names: FieldNaming,
    /// Write absent and default-valued fields with their default.
    pub emit_defaults: bool,
    /// Write enums as integers instead of symbolic names.
    pub enums_as_ints: bool,
    /// Indent the output.
    pub pretty: bool,
    /// Skip object keys that match no field instead of failing.
    pub ignore_unknown_fields: bool,
    /// Maximum nesting depth accepted by the decoder.
    pub recursion_limit: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            field_names: FieldNaming::default(),
            emit_defaults: false,
            enums_as_ints: false,
            pretty: false,
            ignore_unknown_fields: true,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl JsonOptions {
    /// Options that keep declared field names in the output.
    pub fn preserving_field_names() -> Self {
        Self {
            field_names: FieldNaming::Proto,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_load_from_toml() {
        let opts: BinaryOptions = toml::from_str("pack_repeated = false").unwrap();
        assert!(!opts.pack_repeated);
        assert_eq!(opts.recursion_limit, DEFAULT_RECURSION_LIMIT);

        let opts: JsonOptions = toml::from_str(
            "field_names = \"camel_case\"\nemit_defaults = true\nignore_unknown_fields = false",
        )
        .unwrap();
        assert_eq!(opts.field_names, FieldNaming::CamelCase);
        assert!(opts.emit_defaults);
        assert!(!opts.ignore_unknown_fields);
        assert!(!opts.pretty);
    }
}
