//! The editor's flattened step projection of the page list.
//!
//! Two fixed steps come first, then one step per visible page, then a fixed
//! closing step. Hidden pages are left out of the sequence, but the
//! remaining steps keep raw page-list indices as their targets.

use folio_core::page::PageRecord;
use serde::Serialize;

/// Id of the opening setup step.
pub const SETUP_STEP_ID: &str = "setup";

/// Id of the page-management step.
pub const MANAGE_PAGES_STEP_ID: &str = "manage-pages";

/// Id of the closing step.
pub const FINISH_STEP_ID: &str = "finish";

/// Number of steps that do not correspond to a page.
pub const FIXED_STEP_COUNT: usize = 3;

/// One entry in the editor's navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Stable identifier.
    pub id: String,
    /// Label shown in the editor.
    pub display_name: String,
    /// Page-list position this step edits; `None` for the fixed steps.
    pub source_index: Option<usize>,
    /// Page-list position the renderer should show while this step is
    /// active. Not adjusted for hidden pages.
    pub target_index: usize,
}

impl Step {
    fn fixed(id: &str, display_name: &str, target_index: usize) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            source_index: None,
            target_index,
        }
    }

    fn for_page(index: usize, page: &PageRecord) -> Self {
        Self {
            id: format!("page-{}", page.id),
            display_name: page.title().unwrap_or(&page.kind).to_owned(),
            source_index: Some(index),
            target_index: index,
        }
    }
}

/// Derives the step list for `pages`.
///
/// Pure and deterministic: the same pages always produce the same steps.
#[must_use]
pub fn plan(pages: &[PageRecord]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(pages.len() + FIXED_STEP_COUNT);
    steps.push(Step::fixed(SETUP_STEP_ID, "Setup", 0));
    steps.push(Step::fixed(MANAGE_PAGES_STEP_ID, "Manage pages", 0));
    steps.extend(
        pages
            .iter()
            .enumerate()
            .filter(|(_, page)| !page.hidden)
            .map(|(index, page)| Step::for_page(index, page)),
    );
    steps.push(Step::fixed(
        FINISH_STEP_ID,
        "Finish",
        pages.len().saturating_sub(1),
    ));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn page(kind: &str, hidden: bool) -> PageRecord {
        let mut page = PageRecord::new(kind);
        page.hidden = hidden;
        page
    }

    #[test]
    fn test_plan_empty_list_yields_fixed_steps_only() {
        // Act
        let steps = plan(&[]);

        // Assert
        let ids: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, [SETUP_STEP_ID, MANAGE_PAGES_STEP_ID, FINISH_STEP_ID]);
        assert!(steps.iter().all(|s| s.target_index == 0));
        assert!(steps.iter().all(|s| s.source_index.is_none()));
    }

    #[test]
    fn test_plan_size_is_fixed_steps_plus_visible_pages() {
        for total in 0..6_usize {
            // Every hidden/visible combination of `total` pages.
            for mask in 0..(1_u32 << total) {
                // Arrange
                let pages: Vec<PageRecord> = (0..total)
                    .map(|i| page("text", mask & (1 << i) != 0))
                    .collect();
                let hidden = mask.count_ones() as usize;

                // Act
                let steps = plan(&pages);

                // Assert
                assert_eq!(steps.len(), FIXED_STEP_COUNT + total - hidden);
            }
        }
    }

    #[test]
    fn test_plan_keeps_raw_indices_after_hidden_pages() {
        // Arrange
        let pages = vec![
            page("cover", true),
            page("map", false),
            page("text", true),
            page("gallery", false),
        ];

        // Act
        let steps = plan(&pages);

        // Assert
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[2].source_index, Some(1));
        assert_eq!(steps[2].target_index, 1);
        assert_eq!(steps[3].source_index, Some(3));
        assert_eq!(steps[3].target_index, 3);
        assert_eq!(steps[4].id, FINISH_STEP_ID);
        assert_eq!(steps[4].target_index, 3);
    }

    #[test]
    fn test_plan_labels_pages_by_title_then_kind() {
        // Arrange
        let mut titled = page("map", false);
        titled
            .fields
            .insert("title".to_owned(), Value::from("Road to Sintra"));
        let pages = vec![titled.clone(), page("gallery", false)];

        // Act
        let steps = plan(&pages);

        // Assert
        assert_eq!(steps[2].display_name, "Road to Sintra");
        assert_eq!(steps[2].id, format!("page-{}", titled.id));
        assert_eq!(steps[3].display_name, "gallery");
    }

    #[test]
    fn test_plan_serializes_camel_case() {
        let steps = plan(&[page("cover", false)]);

        let value = serde_json::to_value(&steps[2]).unwrap();

        assert_eq!(value["sourceIndex"], 0);
        assert_eq!(value["targetIndex"], 0);
        assert_eq!(value["displayName"], "cover");
    }
}
