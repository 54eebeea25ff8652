// file: src/render/mod.rs
// description: presentation of search results as HTML and terminal text
// reference: internal module structure

pub mod answer;
pub mod page;

pub use answer::{annotate_html, annotate_plain};
pub use page::{FormState, render_page};

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
