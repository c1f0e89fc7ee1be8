use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_POINT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Stable identifier of a point. Never reused once generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(String);

impl PointId {
    /// Wrap an existing id (loaded from a file or written by hand in tests).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id: wall-clock millis plus a process-wide monotonic
    /// sequence, so two ids generated in the same millisecond still differ.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = NEXT_POINT_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("point-{millis}-{}", to_base36(seq)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last `n` characters, used for compact table display. Generated ids
    /// share the `point-` prefix, so the tail is the distinctive part.
    pub fn short(&self, n: usize) -> &str {
        let len = self.0.chars().count();
        if len <= n {
            return &self.0;
        }
        match self.0.char_indices().nth(len - n) {
            Some((idx, _)) => &self.0[idx..],
            None => &self.0,
        }
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

/// A user-authored point in data space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(id: impl Into<PointId>, x: i64, y: i64) -> Self {
        Self { id: id.into(), x, y }
    }

    /// Create a point with a freshly generated id.
    pub fn with_generated_id(x: i64, y: i64) -> Self {
        Self { id: PointId::generate(), x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = PointId::generate();
        let b = PointId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("point-"));
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn short_id_keeps_tail() {
        let id = PointId::new("point-1700000000123-a");
        assert_eq!(id.short(6), "0123-a");
        assert_eq!(PointId::new("abc").short(6), "abc");
    }

    #[test]
    fn point_serializes_flat() {
        let p = Point::new("p1", 3, -4);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"id":"p1","x":3,"y":-4}"#);
    }
}
