//! The bundled markup renderer.

use crate::error::RenderError;
use crate::key::Flavor;
use crate::traits::MarkupRenderer;

/// Renders page source verbatim inside a `<pre>` block.
///
/// Stands in for a real markup engine: output is escaped HTML, and the
/// navigation flavor adds a header linking back to the page index. Sources
/// containing NUL bytes or invalid UTF-8 are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreformattedRenderer;

impl MarkupRenderer for PreformattedRenderer {
    fn render(&self, title: &str, source: &[u8], flavor: Flavor) -> Result<String, RenderError> {
        let text = std::str::from_utf8(source)
            .map_err(|e| RenderError::failed(title, format!("source is not UTF-8: {e}")))?;
        if let Some(offset) = text.find('\0') {
            return Err(RenderError::failed(
                title,
                format!("NUL byte at offset {offset}"),
            ));
        }

        let mut html = String::with_capacity(text.len() + 128);
        if flavor == Flavor::Navigation {
            html.push_str("<nav class=\"folio-nav\"><a href=\"./\">Index</a> / <span class=\"folio-title\">");
            escape_into(&mut html, title);
            html.push_str("</span></nav>\n");
        }
        html.push_str("<pre class=\"folio-page\">");
        escape_into(&mut html, text);
        html.push_str("</pre>\n");
        Ok(html)
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_wraps_escaped_source() {
        let html = PreformattedRenderer
            .render("intro", b"a < b & \"c\"", Flavor::Plain)
            .unwrap();
        assert_eq!(
            html,
            "<pre class=\"folio-page\">a &lt; b &amp; &quot;c&quot;</pre>\n"
        );
    }

    #[test]
    fn navigation_adds_header() {
        let html = PreformattedRenderer
            .render("<intro>", b"Hello", Flavor::Navigation)
            .unwrap();
        assert!(html.starts_with("<nav class=\"folio-nav\">"));
        assert!(html.contains("&lt;intro&gt;"));
        assert!(html.ends_with("<pre class=\"folio-page\">Hello</pre>\n"));
    }

    #[test]
    fn nul_byte_is_a_failure() {
        let err = PreformattedRenderer
            .render("intro", b"bad\0page", Flavor::Plain)
            .unwrap_err();
        assert!(matches!(err, RenderError::Failed { ref title, .. } if title == "intro"));
    }

    #[test]
    fn invalid_utf8_is_a_failure() {
        assert!(PreformattedRenderer
            .render("intro", &[0xFF, 0xFE], Flavor::Plain)
            .is_err());
    }
}
