//! Identifiers for income and expense records.

use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The number of random base-36 characters appended to the timestamp.
const RANDOM_SUFFIX_LENGTH: usize = 8;

/// A unique identifier for a record.
///
/// Generated identifiers are the creation time in milliseconds encoded in
/// base 36 followed by a random base-36 suffix, e.g. `"lnz5v2kq4f7d0x1a"`.
/// Identifiers only contain ASCII letters, digits, `-` and `_` so they can be
/// used in URL paths as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new random ID for a record created at `now`.
    pub fn generate(now: OffsetDateTime) -> Self {
        Self::generate_with(now, &mut rand::thread_rng())
    }

    fn generate_with(now: OffsetDateTime, rng: &mut impl Rng) -> Self {
        let millis = (now.unix_timestamp_nanos() / 1_000_000).max(0) as u128;
        let suffix: String = (0..RANDOM_SUFFIX_LENGTH)
            .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
            .collect();

        Self(format!("{}{suffix}", to_base36(millis)))
    }

    /// Parse an existing ID, e.g. one read from an imported file.
    ///
    /// Returns `None` if `id` is empty or contains characters other than
    /// ASCII letters, digits, `-` and `_`.
    pub fn parse(id: &str) -> Option<Self> {
        let is_valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        is_valid.then(|| Self(id.to_owned()))
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut digits = Vec::new();

    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }

    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use time::macros::datetime;

    use super::{RecordId, to_base36};

    #[test]
    fn base36_encodes_numbers() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_295), "zz");
    }

    #[test]
    fn generated_ids_start_with_timestamp() {
        let now = datetime!(2023-10-20 10:00:00 UTC);
        let millis = (now.unix_timestamp_nanos() / 1_000_000) as u128;

        let id = RecordId::generate(now);

        assert!(id.as_str().starts_with(&to_base36(millis)));
        assert_eq!(id.as_str().len(), to_base36(millis).len() + 8);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let now = datetime!(2023-10-20 10:00:00 UTC);

        let ids: HashSet<_> = (0..100).map(|_| RecordId::generate(now)).collect();

        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn generated_ids_are_valid() {
        let id = RecordId::generate(datetime!(2025-01-01 00:00:00 UTC));

        assert_eq!(RecordId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn parse_rejects_unsafe_ids() {
        assert_eq!(RecordId::parse(""), None);
        assert_eq!(RecordId::parse("abc/def"), None);
        assert_eq!(RecordId::parse("abc def"), None);
        assert!(RecordId::parse("lnz5v2kq-4f7d_0x1a").is_some());
    }
}
