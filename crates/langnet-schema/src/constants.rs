//! Wire-level limits on field tags.

use std::ops::RangeInclusive;

/// Largest usable field tag (2^29 - 1); the header keeps three bits for the wire kind.
pub const MAX_TAG: u32 = 536_870_911;

/// Tags held back for the implementation and rejected at registration.
pub const RESERVED_TAGS: RangeInclusive<u32> = 19_000..=19_999;
