//! Rendering of extracted content to output formats.

mod html;
mod json;

pub use html::{escape_html, table_fragment, table_to_html};
pub use json::{to_json, JsonFormat};
