//! Purpose: Single seam for serde_json engine details shared by the node facade.
//! Exports: `verbatim` (write-only map adapter), `MAX_DEPTH`, casing/camel/limits/hash internals.
//! Role: Keeps engine quirks (casing adapters, depth caps, deep hashing) out of callsites.
//! Invariants: Structural field names are the only names subject to casing transforms.
//! Invariants: Mapping keys pass through every path in this module verbatim.
pub(crate) mod camel;
pub(crate) mod casing;
pub(crate) mod hash;
pub(crate) mod limits;
pub mod verbatim;

pub use self::limits::MAX_DEPTH;
