//! # Content Rendering
//!
//! Documents are served according to their [`DocKind`]:
//!
//! - `.md` / `.mkd` → HTML via `pulldown-cmark`, served as `text/html`
//! - anything else → the raw text, served as `text/plain`
//!
//! The markdown conversion is used as-is; this module only picks which
//! renderer applies and labels the output with its content type.

use crate::model::DocKind;
use pulldown_cmark::{html, Options, Parser};

pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";

/// Rendered output handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

pub trait Renderer {
    fn render(&self, content: &str) -> Rendered;
}

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, content: &str) -> Rendered {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let parser = Parser::new_ext(content, options);

        let mut body = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut body, parser);

        Rendered {
            content_type: TEXT_HTML,
            body,
        }
    }
}

pub struct PlainTextRenderer;

impl Renderer for PlainTextRenderer {
    fn render(&self, content: &str) -> Rendered {
        Rendered {
            content_type: TEXT_PLAIN,
            body: content.to_string(),
        }
    }
}

impl DocKind {
    pub fn renderer(self) -> &'static dyn Renderer {
        match self {
            DocKind::Markdown => &MarkdownRenderer,
            DocKind::PlainText => &PlainTextRenderer,
        }
    }
}

pub fn render(kind: DocKind, content: &str) -> Rendered {
    kind.renderer().render(content)
}
