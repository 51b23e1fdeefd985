//! Shaping of structured arguments into wire-ready query parameters and
//! virtual-file-system paths.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::prelude::*;

/// A single query-parameter value prior to wire encoding.
///
/// Integers are rendered as decimal text so that values above 2^53 survive
/// consumers that parse numbers as doubles. Dates are rendered as
/// microseconds-since-epoch, the wire protocol's time unit.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(DateTime<Utc>),
}

impl ParamValue {
    pub fn encode(&self) -> String {
        match self {
            ParamValue::Bool(v) => v.to_string(),
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Float(v) => v.to_string(),
            ParamValue::Str(v) => v.clone(),
            ParamValue::Date(v) => (v.timestamp_millis() * 1000).to_string(),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(v: DateTime<Utc>) -> Self {
        ParamValue::Date(v)
    }
}

/// Insertion-ordered query parameters. Absent values are omitted entirely,
/// never encoded as an empty string or `"null"`.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(IndexMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    pub fn set_opt(self, key: &str, value: Option<impl Into<ParamValue>>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Encodes every value into its wire text form.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), value.encode()))
            .collect()
    }
}

/// Mount under which a virtual-file-system path is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathType {
    Os,
    Tsk,
    Ntfs,
    Registry,
    Temp,
}

impl PathType {
    pub fn mount_prefix(&self) -> &'static str {
        match self {
            PathType::Os => "fs/os",
            PathType::Tsk => "fs/tsk",
            PathType::Ntfs => "fs/ntfs",
            PathType::Registry => "registry",
            PathType::Temp => "temp",
        }
    }
}

/// Percent-encodes each `/`-separated segment of `path`, leaving the
/// separators intact. Backslashes, question marks and other characters that
/// would break URL parsing are encoded away; the transport's standard decoding
/// reconstructs the original path exactly.
pub fn encode_path_segments(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Builds the canonical VFS path `/{mount}{path}` for the given path type.
///
/// A leading `/` is always enforced: platform-style paths lacking a leading
/// separator (e.g. a Windows drive letter) are normalized by prepending one.
pub fn vfs_path(path_type: PathType, path: &str, url_encode: bool) -> String {
    let mut path = if url_encode {
        encode_path_segments(path)
    } else {
        path.to_owned()
    };

    if !path.starts_with('/') {
        path.insert(0, '/');
    }

    format!("/{}{}", path_type.mount_prefix(), path)
}
