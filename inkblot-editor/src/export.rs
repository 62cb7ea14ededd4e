//! Print document assembly for PDF export.
//!
//! The preview HTML is wrapped in a standalone page that embeds the same
//! stylesheet as the live preview, so the PDF matches what is on screen.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Stylesheet shared by the preview pane and exported PDFs.
pub const PREVIEW_CSS: &str = include_str!("../assets/preview.css");

/// Paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[serde(alias = "A4")]
    A4,
    #[serde(alias = "Letter")]
    Letter,
}

impl PageSize {
    /// CSS `@page size` keyword.
    #[must_use]
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::Letter => "letter",
        }
    }
}

/// Page setup for export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    pub page_size: PageSize,
    /// Uniform margin on all four sides, in inches.
    pub margin_inches: f32,
    /// Print background colors and images.
    pub print_background: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        // ~20mm margins
        Self {
            page_size: PageSize::A4,
            margin_inches: 0.79,
            print_background: true,
        }
    }
}

impl PdfOptions {
    /// `@page` rule and color-adjust hints carrying these options into CSS.
    #[must_use]
    pub fn page_css(&self) -> String {
        let adjust = if self.print_background { "exact" } else { "economy" };
        format!(
            "@page {{ size: {}; margin: {}in; }}\n\
             html, body {{ -webkit-print-color-adjust: {adjust}; print-color-adjust: {adjust}; }}",
            self.page_size.css_name(),
            self.margin_inches,
        )
    }
}

/// Wraps rendered preview HTML into a complete printable document.
#[must_use]
pub fn wrap_for_print(body_html: &str, stylesheet: &str, options: &PdfOptions) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>{stylesheet}</style>
  <style>{page}</style>
</head>
<body>
  <div class="preview-content">{body_html}</div>
</body>
</html>"#,
        page = options.page_css(),
    )
}

/// Adds the `@page` rule for `options` to a document that has none.
///
/// Documents from [`wrap_for_print`] already carry it and are returned as is.
#[must_use]
pub fn with_page_setup<'a>(html: &'a str, options: &PdfOptions) -> Cow<'a, str> {
    if html.contains("@page") {
        return Cow::Borrowed(html);
    }
    let style = format!("<style>{}</style>", options.page_css());
    match html.find("</head>") {
        Some(at) => Cow::Owned(format!("{}{style}\n{}", &html[..at], &html[at..])),
        None => Cow::Owned(format!("{style}\n{html}")),
    }
}
