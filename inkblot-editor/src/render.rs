//! Markdown to HTML.
//!
//! Uses comrak (CommonMark + GitHub Flavored Markdown). Raw HTML in the
//! source is omitted and unsafe link schemes are dropped unless
//! `allow_raw_html` is set.

use comrak::{markdown_to_html, Options};
use serde::{Deserialize, Serialize};

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Turn bare URLs into links.
    pub linkify: bool,
    /// Smart quotes, dashes and ellipses.
    pub typographer: bool,
    /// Pass raw HTML through untouched.
    pub allow_raw_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            linkify: true,
            typographer: true,
            allow_raw_html: false,
        }
    }
}

/// Pure markdown renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Renders `markdown` to an HTML fragment.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.tasklist = true;
        options.extension.autolink = self.options.linkify;
        options.parse.smart = self.options.typographer;
        options.render.unsafe_ = self.options.allow_raw_html;
        markdown_to_html(markdown, &options)
    }
}
