//! Purpose: serde `with`-style adapter pinning mapping keys as data, not field names.
//! Exports: `serialize`, `deserialize`.
//! Role: Annotation point for mapping fields (`#[serde(with = "jnode::json::verbatim")]`).
//! Invariants: Serialization passes keys through untouched on both the plain and
//! camel engine paths.
//! Invariants: The adapter is write-only; the read direction always fails and the
//! facade reports it as `ErrorKind::Unsupported`.

use serde::de::{self, Deserializer};
use serde::ser::{Serialize, Serializer};

pub fn serialize<T, S>(map: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize + ?Sized,
    S: Serializer,
{
    map.serialize(serializer)
}

pub fn deserialize<'de, D, T>(_deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    Err(de::Error::custom("verbatim-key map conversion is write-only"))
}
