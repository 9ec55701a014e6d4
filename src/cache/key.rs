//! Cache key derivation.
//!
//! A recall notification only carries the identifying metadata of the
//! withdrawn message, so the key is built from metadata alone and must come
//! out identical for the send event and the later recall event.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key correlating a recall with the message it withdraws.
///
/// Two keys are equal only when sequence ids, internal ids and time all
/// match. Reusing ids and timestamps on purpose can still collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    ids: Box<[i32]>,
    internal_ids: Box<[i32]>,
    time: i64,
}

impl CacheKey {
    /// Derive a key from a message's identifying fields.
    pub fn derive(ids: &[i32], internal_ids: &[i32], time: i64) -> Self {
        Self {
            ids: ids.into(),
            internal_ids: internal_ids.into(),
            time,
        }
    }

    pub fn ids(&self) -> &[i32] {
        &self.ids
    }

    pub fn internal_ids(&self) -> &[i32] {
        &self.internal_ids
    }

    pub fn time(&self) -> i64 {
        self.time
    }
}

/// Renders `5.6,9,,1000` style keys for logs.
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.ids)?;
        f.write_str(",")?;
        write_joined(f, &self.internal_ids)?;
        write!(f, ",,{}", self.time)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, values: &[i32]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write!(f, "{}", v)?;
    }
    Ok(())
}

/// Identifying fields of a message, as carried by both send and recall events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSource {
    /// Ordered sequence ids.
    #[serde(default)]
    pub ids: Vec<i32>,

    /// Ordered internal ids.
    #[serde(default)]
    pub internal_ids: Vec<i32>,

    /// Server timestamp in seconds.
    pub time: i64,
}

impl MessageSource {
    pub fn new(ids: impl Into<Vec<i32>>, internal_ids: impl Into<Vec<i32>>, time: i64) -> Self {
        Self {
            ids: ids.into(),
            internal_ids: internal_ids.into(),
            time,
        }
    }

    /// Derive the cache key for this message.
    #[inline]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::derive(&self.ids, &self.internal_ids, self.time)
    }
}
