//! Template double with predictable markup.

use folio_core::collaborator::PageTemplateRenderer;
use folio_core::page::PageRecord;

/// Renders a page as `<kind>` or `<kind>:<title>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTemplate;

impl PageTemplateRenderer for StaticTemplate {
    fn render(&self, page: &PageRecord) -> String {
        match page.title() {
            Some(title) => format!("{}:{title}", page.kind),
            None => page.kind.clone(),
        }
    }
}
