//! Render views handed to viewers: one chosen variant per cell.

use serde::Serialize;

use super::Link;

/// A page as a viewer sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub page_index: usize,
    pub page_id: String,
    pub title: String,
    pub background_color: String,
    pub foreground_color: String,
    pub background_image: String,
    pub columns: usize,
    pub cells: Vec<CellView>,
}

/// One rendered cell with the variant picked for this render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub cell_id: String,
    pub row: usize,
    pub col: usize,
    pub display_name: String,
    pub link: Option<Link>,
}
