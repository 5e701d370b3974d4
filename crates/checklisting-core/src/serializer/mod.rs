//! Result serializers
//!
//! Two renderings of a result tree: indented human-readable lines and the
//! JSON wire format shared with remote checklists.

mod human;
mod json;

pub use human::{HumanReadableSerializer, Lines};
pub use json::{unrecognized, Decoded, JsonDeserializer, JsonSerializer};
