//! Markdown page template.

use folio_core::collaborator::PageTemplateRenderer;
use folio_core::page::{BODY_FIELD, PageRecord};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use pulldown_cmark_escape::escape_html;

/// Renders a page as an HTML `<section>`: the title as a heading and the
/// `body` field as Markdown. Raw HTML inside the body is escaped, not
/// passed through.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownTemplate {
    options: Options,
}

impl MarkdownTemplate {
    /// Creates a template with tables, strikethrough and task lists enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl Default for MarkdownTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTemplateRenderer for MarkdownTemplate {
    fn render(&self, page: &PageRecord) -> String {
        let mut kind = String::with_capacity(page.kind.len());
        // Writing into a String cannot fail.
        let _ = escape_html(&mut kind, &page.kind);
        let mut out = format!(
            r#"<section class="page page-{kind}" data-page-id="{}">"#,
            page.id
        );
        if let Some(title) = page.title() {
            let heading = [
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H2,
                    id: None,
                    classes: Vec::new(),
                    attrs: Vec::new(),
                }),
                Event::Text(title.into()),
                Event::End(TagEnd::Heading(HeadingLevel::H2)),
            ];
            html::push_html(&mut out, heading.into_iter());
        }
        if let Some(body) = page.fields.get(BODY_FIELD).and_then(|v| v.as_str()) {
            let events = Parser::new_ext(body, self.options).map(|event| match event {
                Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
                other => other,
            });
            html::push_html(&mut out, events);
        }
        out.push_str("</section>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::page::TITLE_FIELD;
    use serde_json::Value;

    fn page_with(kind: &str, fields: &[(&str, &str)]) -> PageRecord {
        let mut page = PageRecord::new(kind);
        for (key, value) in fields {
            page.fields.insert((*key).to_owned(), Value::from(*value));
        }
        page
    }

    #[test]
    fn test_render_wraps_page_in_section_with_kind_class() {
        let page = page_with("cover", &[]);

        let markup = MarkdownTemplate::new().render(&page);

        assert_eq!(
            markup,
            format!(r#"<section class="page page-cover" data-page-id="{}"></section>"#, page.id)
        );
    }

    #[test]
    fn test_render_title_and_markdown_body() {
        // Arrange
        let page = page_with(
            "text",
            &[(TITLE_FIELD, "Day one"), (BODY_FIELD, "Arrived in **Porto**.")],
        );

        // Act
        let markup = MarkdownTemplate::new().render(&page);

        // Assert
        assert!(markup.contains("<h2>Day one</h2>"));
        assert!(markup.contains("<p>Arrived in <strong>Porto</strong>.</p>"));
        assert!(markup.ends_with("</section>"));
    }

    #[test]
    fn test_render_escapes_title_and_raw_html() {
        // Arrange
        let page = page_with(
            "text",
            &[(TITLE_FIELD, "Fish & <Chips>"), (BODY_FIELD, "<script>x</script>")],
        );

        // Act
        let markup = MarkdownTemplate::new().render(&page);

        // Assert
        assert!(markup.contains("<h2>Fish &amp; &lt;Chips&gt;</h2>"));
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_escapes_kind_inside_class_attribute() {
        let page = page_with(r#"x" onclick="y"#, &[]);

        let markup = MarkdownTemplate::new().render(&page);

        assert!(markup.starts_with(r#"<section class="page page-x&quot; onclick=&quot;y""#));
    }

    #[test]
    fn test_render_does_not_mutate_page() {
        let page = page_with("text", &[(BODY_FIELD, "# Heading")]);
        let before = page.clone();

        let _ = MarkdownTemplate::new().render(&page);

        assert_eq!(page, before);
    }
}
