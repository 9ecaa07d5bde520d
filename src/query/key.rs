// SPDX-License-Identifier: MIT
//! Composite cache keys for the query layer.

use std::fmt;

/// Identifies one cached read operation: ordered segments, operation name
/// first, parameters after. Invalidation matches on key prefixes, so
/// `["repositories"]` covers both the list and every per-id detail key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Append one segment.
    pub fn push(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    /// Append a segment when present; optional parameters stay out of the
    /// key entirely rather than encoding as a placeholder.
    pub fn push_opt(self, segment: Option<impl ToString>) -> Self {
        match segment {
            Some(s) => self.push(s),
            None => self,
        }
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
