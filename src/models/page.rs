//! Page model: a titled grid of cells laid out row-major.

use serde::{Deserialize, Serialize};

use super::{Link, LinkCell};

pub const DEFAULT_COLUMNS: usize = 4;
pub const DEFAULT_ROWS: usize = 4;
pub const DEFAULT_PAGE_BACKGROUND: &str = "#000000";
pub const DEFAULT_PAGE_FOREGROUND: &str = "#FFFFFF";

/// One page of a board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "RawPage")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub background_color: String,
    pub foreground_color: String,
    pub background_image: String,
    pub columns: usize,
    pub cells: Vec<LinkCell>,
}

/// Stored page shape. Older boards keep a flat `links` list instead of cells.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    background_color: Option<String>,
    #[serde(default)]
    foreground_color: Option<String>,
    #[serde(default)]
    background_image: String,
    #[serde(default)]
    columns: Option<usize>,
    #[serde(default)]
    cells: Option<Vec<LinkCell>>,
    #[serde(default)]
    links: Option<Vec<Link>>,
}

impl From<RawPage> for Page {
    fn from(raw: RawPage) -> Self {
        let cells = match (raw.cells, raw.links) {
            (Some(cells), _) => cells,
            (None, Some(links)) => links.into_iter().map(LinkCell::from_link).collect(),
            (None, None) => Vec::new(),
        };

        Page {
            id: raw
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: raw.title,
            background_color: raw
                .background_color
                .unwrap_or_else(|| DEFAULT_PAGE_BACKGROUND.to_string()),
            foreground_color: raw
                .foreground_color
                .unwrap_or_else(|| DEFAULT_PAGE_FOREGROUND.to_string()),
            background_image: raw.background_image,
            columns: raw.columns.unwrap_or(DEFAULT_COLUMNS).max(1),
            cells,
        }
    }
}

impl Page {
    /// Create a page of `rows` x `columns` empty cells.
    pub fn new(rows: usize, columns: usize) -> Self {
        let columns = columns.max(1);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: String::new(),
            background_color: DEFAULT_PAGE_BACKGROUND.to_string(),
            foreground_color: DEFAULT_PAGE_FOREGROUND.to_string(),
            background_image: String::new(),
            columns,
            cells: (0..rows * columns).map(|_| LinkCell::new()).collect(),
        }
    }

    pub fn cell(&self, cell_id: &str) -> Option<&LinkCell> {
        self.cells.iter().find(|c| c.id == cell_id)
    }

    pub fn cell_mut(&mut self, cell_id: &str) -> Option<&mut LinkCell> {
        self.cells.iter_mut().find(|c| c.id == cell_id)
    }

    /// True when any cell spans more than one grid slot.
    pub fn has_spanning_cells(&self) -> bool {
        self.cells.iter().any(LinkCell::is_spanning)
    }

    /// Apply an appearance update. Absent fields are left unchanged.
    pub fn apply(&mut self, update: &PageAppearance) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(color) = &update.background_color {
            self.background_color = color.clone();
        }
        if let Some(color) = &update.foreground_color {
            self.foreground_color = color.clone();
        }
        if let Some(image) = &update.background_image {
            self.background_image = image.clone();
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLUMNS)
    }
}

/// Editable page appearance fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAppearance {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub foreground_color: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_shape() {
        let page = Page::default();
        assert_eq!(page.columns, DEFAULT_COLUMNS);
        assert_eq!(page.cells.len(), DEFAULT_ROWS * DEFAULT_COLUMNS);
        assert!(page.cells.iter().all(LinkCell::is_empty));
    }

    #[test]
    fn test_legacy_links_become_cells() {
        let page: Page = serde_json::from_str(
            r#"{"id":"p1","columns":2,"links":[
                {"id":"a","uri":"https://a.example","clickCount":3},
                {"id":"b","title":"B"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(page.cells.len(), 2);
        assert_eq!(page.cells[0].links[0].id, "a");
        assert_eq!(page.cells[0].links[0].click_count, 3);
        assert_eq!(page.cells[0].weights, vec![1.0]);
        assert!(!page.cells[0].rotation_enabled);
        assert_eq!(page.cells[1].links[0].title, "B");
    }

    #[test]
    fn test_zero_columns_clamped() {
        let page: Page = serde_json::from_str(r#"{"id":"p1","columns":0,"cells":[]}"#).unwrap();
        assert_eq!(page.columns, 1);
    }

    #[test]
    fn test_serialize_uses_cells() {
        let page = Page::new(1, 2);
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["cells"].as_array().unwrap().len(), 2);
        assert!(value.get("links").is_none());
        assert_eq!(value["foregroundColor"], DEFAULT_PAGE_FOREGROUND);
    }

    #[test]
    fn test_apply_appearance() {
        let mut page = Page::new(1, 1);
        page.apply(&PageAppearance {
            title: Some("Resources".to_string()),
            background_image: Some("https://i.example.com/bg.png".to_string()),
            ..Default::default()
        });
        assert_eq!(page.title, "Resources");
        assert_eq!(page.background_color, DEFAULT_PAGE_BACKGROUND);
        assert_eq!(page.background_image, "https://i.example.com/bg.png");
    }
}
