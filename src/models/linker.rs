//! Board model: the whole persisted document for one post.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Link, LinkCell, Page};
use crate::errors::AppError;

/// A link board. Only the first page is shown today but every page is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Linker {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Linker {
    /// A fresh board with one default page.
    pub fn new() -> Self {
        Self {
            id: new_id(),
            pages: vec![Page::default()],
        }
    }

    pub fn page(&self, index: usize) -> Result<&Page, AppError> {
        self.pages
            .get(index)
            .ok_or_else(|| AppError::NotFound(format!("Page {} not found", index)))
    }

    pub fn page_mut(&mut self, index: usize) -> Result<&mut Page, AppError> {
        self.pages
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("Page {} not found", index)))
    }

    /// Find a cell on any page.
    pub fn cell_mut(&mut self, cell_id: &str) -> Result<&mut LinkCell, AppError> {
        self.pages
            .iter_mut()
            .find_map(|p| p.cell_mut(cell_id))
            .ok_or_else(|| AppError::NotFound(format!("Cell {} not found", cell_id)))
    }

    pub fn cell(&self, cell_id: &str) -> Result<&LinkCell, AppError> {
        self.pages
            .iter()
            .find_map(|p| p.cell(cell_id))
            .ok_or_else(|| AppError::NotFound(format!("Cell {} not found", cell_id)))
    }

    /// Count one click on a variant and return the clicked link.
    pub fn record_click(&mut self, cell_id: &str, link_id: &str) -> Result<Link, AppError> {
        let cell = self.cell_mut(cell_id)?;
        let link = cell
            .link_mut(link_id)
            .ok_or_else(|| AppError::NotFound(format!("Link {} not found", link_id)))?;
        link.click_count = link.click_count.saturating_add(1);
        Ok(link.clone())
    }

    /// Zero every click and impression counter on the board.
    pub fn reset_counters(&mut self) {
        for page in &mut self.pages {
            for cell in &mut page.cells {
                cell.reset_counters();
            }
        }
    }

    /// Check a board submitted from outside before it replaces a stored one.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.pages.is_empty() {
            return Err(AppError::Validation(
                "A board needs at least one page".to_string(),
            ));
        }

        for (page_index, page) in self.pages.iter().enumerate() {
            let mut cell_ids = HashSet::new();
            for cell in &page.cells {
                if !cell_ids.insert(cell.id.as_str()) {
                    return Err(AppError::Validation(format!(
                        "Duplicate cell id {} on page {}",
                        cell.id, page_index
                    )));
                }

                let mut link_ids = HashSet::new();
                for link in &cell.links {
                    if !link_ids.insert(link.id.as_str()) {
                        return Err(AppError::Validation(format!(
                            "Duplicate link id {} in cell {}",
                            link.id, cell.id
                        )));
                    }
                    if !(0.0..=1.0).contains(&link.background_opacity) {
                        return Err(AppError::Validation(format!(
                            "Background opacity of link {} must be between 0 and 1",
                            link.id
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for Linker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_has_one_page() {
        let board = Linker::new();
        assert_eq!(board.pages.len(), 1);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_record_click_increments() {
        let mut board = Linker::new();
        let cell_id = board.pages[0].cells[2].id.clone();
        let link_id = board.pages[0].cells[2].links[0].id.clone();

        board.record_click(&cell_id, &link_id).unwrap();
        let clicked = board.record_click(&cell_id, &link_id).unwrap();

        assert_eq!(clicked.click_count, 2);
        assert_eq!(board.pages[0].cells[2].links[0].click_count, 2);
    }

    #[test]
    fn test_record_click_unknown_ids() {
        let mut board = Linker::new();
        let cell_id = board.pages[0].cells[0].id.clone();
        assert!(matches!(
            board.record_click("nope", "nope"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            board.record_click(&cell_id, "nope"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_boards() {
        let mut board = Linker::new();
        board.pages.clear();
        assert!(board.validate().is_err());

        let mut board = Linker::new();
        let duplicate = board.pages[0].cells[0].clone();
        board.pages[0].cells.push(duplicate);
        assert!(board.validate().is_err());

        let mut board = Linker::new();
        board.pages[0].cells[0].links[0].background_opacity = 1.5;
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_reset_counters() {
        let mut board = Linker::new();
        board.pages[0].cells[0].links[0].click_count = 9;
        board.pages[0].cells[0].impression_count = 20;

        board.reset_counters();

        assert_eq!(board.pages[0].cells[0].links[0].click_count, 0);
        assert_eq!(board.pages[0].cells[0].impression_count, 0);
    }

    #[test]
    fn test_board_json_round_trip_keeps_ids() {
        let board = Linker::new();
        let json = serde_json::to_string(&board).unwrap();
        let parsed: Linker = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }
}
