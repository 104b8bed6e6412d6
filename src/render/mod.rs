//! Rendering of structures, links and rankings.

mod json;
mod text;

pub use json::{links_to_json, to_json, JsonFormat, LinksDocument};
pub use text::{links_to_text, outline_to_text};
