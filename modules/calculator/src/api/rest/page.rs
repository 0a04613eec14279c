//! The single-page calculator form served at `GET /`.

use axum::body::Bytes;

const TEMPLATE: &str = include_str!("calculator.html");
const TITLE_PLACEHOLDER: &str = "{{title}}";

/// Render the calculator page with `title` substituted (HTML-escaped).
#[must_use]
pub fn render(title: &str) -> String {
    TEMPLATE.replace(TITLE_PLACEHOLDER, &escape_html(title))
}

/// Page rendered once at router construction and shared by every request.
#[derive(Debug, Clone)]
pub struct RenderedPage(Bytes);

impl RenderedPage {
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self(Bytes::from(render(title)))
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
