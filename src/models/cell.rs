//! Cell model: a grid position holding one or more rotating link variants.

use serde::{Deserialize, Deserializer, Serialize};

use super::Link;
use crate::errors::AppError;
use crate::rotation::{effective_weight, DEFAULT_WEIGHT};

/// A board cell. `weights` always has the same length as `links`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "RawLinkCell")]
pub struct LinkCell {
    pub id: String,
    pub links: Vec<Link>,
    pub weights: Vec<f64>,
    pub rotation_enabled: bool,
    pub display_name: String,
    pub impression_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u32>,
}

/// Stored shape of a cell, before weights are reconciled with variants.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLinkCell {
    id: String,
    #[serde(default)]
    links: Vec<Link>,
    #[serde(default, deserialize_with = "lenient_weights")]
    weights: Vec<f64>,
    #[serde(default)]
    rotation_enabled: bool,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    impression_count: u64,
    #[serde(default)]
    row: Option<u32>,
    #[serde(default)]
    col: Option<u32>,
    #[serde(default)]
    row_span: Option<u32>,
    #[serde(default)]
    col_span: Option<u32>,
}

impl From<RawLinkCell> for LinkCell {
    fn from(raw: RawLinkCell) -> Self {
        let mut cell = LinkCell {
            id: raw.id,
            links: raw.links,
            weights: raw.weights,
            rotation_enabled: raw.rotation_enabled,
            display_name: raw.display_name,
            impression_count: raw.impression_count,
            row: raw.row,
            col: raw.col,
            row_span: raw.row_span,
            col_span: raw.col_span,
        };
        cell.reconcile_weights();
        cell
    }
}

/// Accepts any JSON array for weights; entries that are not usable numbers
/// become the default weight.
fn lenient_weights<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|value| {
            value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
                .map(effective_weight)
                .unwrap_or(DEFAULT_WEIGHT)
        })
        .collect())
}

impl LinkCell {
    /// Create a cell with a single blank variant.
    pub fn new() -> Self {
        Self::from_link(Link::new())
    }

    /// Wrap an existing link as a single-variant cell.
    pub fn from_link(link: Link) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            links: vec![link],
            weights: vec![DEFAULT_WEIGHT],
            rotation_enabled: false,
            display_name: String::new(),
            impression_count: 0,
            row: None,
            col: None,
            row_span: None,
            col_span: None,
        }
    }

    /// Pad or truncate `weights` so it matches `links`.
    pub fn reconcile_weights(&mut self) {
        self.weights.resize(self.links.len(), DEFAULT_WEIGHT);
    }

    /// True when no variant has anything to show.
    pub fn is_empty(&self) -> bool {
        self.links.iter().all(Link::is_empty)
    }

    /// True when the cell occupies more than one grid slot.
    pub fn is_spanning(&self) -> bool {
        self.row_span.unwrap_or(1) > 1 || self.col_span.unwrap_or(1) > 1
    }

    pub fn total_clicks(&self) -> u64 {
        self.links
            .iter()
            .fold(0, |total, l| total.saturating_add(l.click_count))
    }

    pub fn link_mut(&mut self, link_id: &str) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.id == link_id)
    }

    /// Append a blank variant with the default weight.
    pub fn add_variant(&mut self) -> &Link {
        self.links.push(Link::new());
        self.weights.push(DEFAULT_WEIGHT);
        &self.links[self.links.len() - 1]
    }

    /// Remove a variant and its weight. The last remaining variant is
    /// replaced by a blank one so the cell never ends up without content slots.
    pub fn remove_variant(&mut self, link_id: &str) -> Result<Link, AppError> {
        let position = self
            .links
            .iter()
            .position(|l| l.id == link_id)
            .ok_or_else(|| AppError::NotFound(format!("Link {} not found", link_id)))?;

        let removed = self.links.remove(position);
        self.weights.remove(position);

        if self.links.is_empty() {
            self.links.push(Link::new());
            self.weights.push(DEFAULT_WEIGHT);
        }

        Ok(removed)
    }

    /// Replace all weights. The list must line up with the variants.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<(), AppError> {
        if weights.len() != self.links.len() {
            return Err(AppError::Validation(format!(
                "Expected {} weights, got {}",
                self.links.len(),
                weights.len()
            )));
        }
        self.weights = weights.iter().copied().map(effective_weight).collect();
        Ok(())
    }

    /// Zero the impression counter and every variant's click counter.
    pub fn reset_counters(&mut self) {
        self.impression_count = 0;
        for link in &mut self.links {
            link.click_count = 0;
        }
    }
}

impl Default for LinkCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body for updating cell settings. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub rotation_enabled: Option<bool>,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

impl LinkCell {
    /// Apply a settings update. Weights are checked before anything changes.
    pub fn apply(&mut self, update: &UpdateCellRequest) -> Result<(), AppError> {
        if let Some(weights) = &update.weights {
            self.set_weights(weights)?;
        }
        if let Some(name) = &update.display_name {
            self.display_name = name.clone();
        }
        if let Some(enabled) = update.rotation_enabled {
            self.rotation_enabled = enabled;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_weights_are_padded() {
        let cell: LinkCell = serde_json::from_str(
            r#"{"id":"c1","links":[{"id":"a"},{"id":"b"},{"id":"c"}],"weights":[2]}"#,
        )
        .unwrap();
        assert_eq!(cell.weights, vec![2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_extra_weights_are_truncated() {
        let cell: LinkCell =
            serde_json::from_str(r#"{"id":"c1","links":[{"id":"a"}],"weights":[3, 4, 5]}"#)
                .unwrap();
        assert_eq!(cell.weights, vec![3.0]);
    }

    #[test]
    fn test_malformed_weights_become_default() {
        let cell: LinkCell = serde_json::from_str(
            r#"{"id":"c1","links":[{"id":"a"},{"id":"b"},{"id":"c"},{"id":"d"}],
                "weights":["abc", -4, null, "2.5"]}"#,
        )
        .unwrap();
        assert_eq!(cell.weights, vec![1.0, 1.0, 1.0, 2.5]);
    }

    #[test]
    fn test_null_weights_field() {
        let cell: LinkCell =
            serde_json::from_str(r#"{"id":"c1","links":[{"id":"a"}],"weights":null}"#).unwrap();
        assert_eq!(cell.weights, vec![1.0]);
    }

    #[test]
    fn test_remove_last_variant_leaves_blank() {
        let mut cell = LinkCell::new();
        let only = cell.links[0].id.clone();

        let removed = cell.remove_variant(&only).unwrap();
        assert_eq!(removed.id, only);
        assert_eq!(cell.links.len(), 1);
        assert_ne!(cell.links[0].id, only);
        assert_eq!(cell.weights, vec![DEFAULT_WEIGHT]);
    }

    #[test]
    fn test_remove_unknown_variant() {
        let mut cell = LinkCell::new();
        assert!(matches!(
            cell.remove_variant("missing"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_add_variant_keeps_weights_parallel() {
        let mut cell = LinkCell::new();
        cell.add_variant();
        cell.add_variant();
        assert_eq!(cell.links.len(), 3);
        assert_eq!(cell.weights.len(), 3);
    }

    #[test]
    fn test_total_clicks_saturates() {
        let mut cell = LinkCell::new();
        cell.add_variant();
        cell.links[0].click_count = u64::MAX;
        cell.links[1].click_count = 3;
        assert_eq!(cell.total_clicks(), u64::MAX);
    }

    #[test]
    fn test_set_weights_length_mismatch() {
        let mut cell = LinkCell::new();
        assert!(cell.set_weights(&[1.0, 2.0]).is_err());
        cell.set_weights(&[f64::NAN]).unwrap();
        assert_eq!(cell.weights, vec![1.0]);
    }

    #[test]
    fn test_apply_rejects_bad_weights_without_partial_update() {
        let mut cell = LinkCell::new();
        let result = cell.apply(&UpdateCellRequest {
            display_name: Some("Renamed".to_string()),
            rotation_enabled: Some(true),
            weights: Some(vec![1.0, 1.0]),
        });
        assert!(result.is_err());
        assert_eq!(cell.display_name, "");
        assert!(!cell.rotation_enabled);
    }

    #[test]
    fn test_spanning() {
        let mut cell = LinkCell::new();
        assert!(!cell.is_spanning());
        cell.col_span = Some(1);
        assert!(!cell.is_spanning());
        cell.row_span = Some(2);
        assert!(cell.is_spanning());
    }
}
