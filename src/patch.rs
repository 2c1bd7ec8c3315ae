//! Partial-update helpers.
//!
//! Patches enumerate the fields a caller may change. Each field is an
//! `Option`: absent leaves the record untouched. Nullable record fields use
//! `Option<Option<T>>` so an explicit `null` (clear) is distinguishable from
//! an absent key.

use serde::{Deserialize, Deserializer};

/// Deserializes a present key (including `null`) as `Some(..)`.
///
/// Pair with `#[serde(default)]` so a missing key stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Writes `value` into `slot` if present.
pub(crate) fn apply<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
