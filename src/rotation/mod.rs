//! Weighted A/B rotation between the link variants of a cell.

use rand::Rng;
use serde::Serialize;

use crate::grid::position;
use crate::models::{CellView, Link, LinkCell, Page, PageView};

/// Weight used for missing or unusable weight values.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Errors from the low-level selection primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationError {
    /// Nothing to choose from
    NoVariants,
}

impl std::fmt::Display for RotationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationError::NoVariants => write!(f, "Cannot select from an empty variant list"),
        }
    }
}

impl std::error::Error for RotationError {}

/// Coerce NaN, infinite and negative weights to the default.
pub fn effective_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight >= 0.0 {
        weight
    } else {
        DEFAULT_WEIGHT
    }
}

/// Roulette-wheel pick over `weights`, walking in list order.
///
/// Each entry owns the half-open interval `[before, before + weight)` of the
/// cumulative total, so a zero weight is never picked while some weight is
/// positive. An all-zero list falls back to a uniform pick.
pub fn weighted_index<R: Rng>(weights: &[f64], rng: &mut R) -> Result<usize, RotationError> {
    if weights.is_empty() {
        return Err(RotationError::NoVariants);
    }

    let total: f64 = weights.iter().copied().map(effective_weight).sum();
    if total <= 0.0 {
        return Ok(rng.gen_range(0..weights.len()));
    }

    let target = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, weight) in weights.iter().copied().map(effective_weight).enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = i;
        if target < cumulative {
            return Ok(i);
        }
    }

    // Float rounding can leave the target just past the final boundary.
    Ok(last_positive)
}

/// Indices of variants that count for rotation, with their weights.
fn active_variants(cell: &LinkCell) -> Vec<(usize, f64)> {
    cell.links
        .iter()
        .enumerate()
        .filter(|(_, link)| !link.is_empty())
        .map(|(i, _)| {
            let weight = cell.weights.get(i).copied().unwrap_or(DEFAULT_WEIGHT);
            (i, effective_weight(weight))
        })
        .collect()
}

/// Index of the variant to show, using the given random source.
pub fn select_index_with<R: Rng>(cell: &LinkCell, rng: &mut R) -> Option<usize> {
    if cell.links.is_empty() {
        return None;
    }
    if !cell.rotation_enabled || cell.links.len() == 1 {
        return Some(0);
    }

    let active = active_variants(cell);
    match active.len() {
        0 => Some(0),
        1 => Some(active[0].0),
        _ => {
            let weights: Vec<f64> = active.iter().map(|(_, w)| *w).collect();
            let picked = weighted_index(&weights, rng).unwrap_or(0);
            Some(active[picked].0)
        }
    }
}

/// Pick the variant to show, using the given random source.
pub fn select_variant_with<'a, R: Rng>(cell: &'a LinkCell, rng: &mut R) -> Option<&'a Link> {
    select_index_with(cell, rng).map(|i| &cell.links[i])
}

/// Pick the variant to show for one render.
pub fn select_variant(cell: &LinkCell) -> Option<&Link> {
    select_variant_with(cell, &mut rand::thread_rng())
}

/// Share of renders a variant is expected to get, in percent.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantProbability {
    pub variant_id: String,
    pub probability: f64,
}

/// Describe the rotation odds of every variant, rounded to two decimals.
///
/// Mirrors [`select_index_with`]: empty variants get 0 while others are
/// active, and a disabled or single-variant cell always shows the first one.
pub fn calculate_variant_probabilities(cell: &LinkCell) -> Vec<VariantProbability> {
    let mut shares = vec![0.0; cell.links.len()];

    if !cell.links.is_empty() {
        let active = active_variants(cell);
        if !cell.rotation_enabled || cell.links.len() == 1 || active.is_empty() {
            shares[0] = 100.0;
        } else {
            let total: f64 = active.iter().map(|(_, w)| *w).sum();
            for (i, weight) in &active {
                shares[*i] = if total > 0.0 {
                    weight / total * 100.0
                } else {
                    100.0 / active.len() as f64
                };
            }
        }
    }

    cell.links
        .iter()
        .zip(shares)
        .map(|(link, share)| VariantProbability {
            variant_id: link.id.clone(),
            probability: round_to(share, 2),
        })
        .collect()
}

/// Render a page for one viewer and count an impression on every cell that
/// showed something.
pub fn render_page_with<R: Rng>(page: &mut Page, page_index: usize, rng: &mut R) -> PageView {
    let columns = page.columns;
    let mut cells = Vec::with_capacity(page.cells.len());

    for (i, cell) in page.cells.iter_mut().enumerate() {
        let link = select_variant_with(cell, rng).cloned();
        if link.as_ref().is_some_and(|l| !l.is_empty()) {
            cell.impression_count = cell.impression_count.saturating_add(1);
        }
        let (row, col) = position(i, columns);
        cells.push(CellView {
            cell_id: cell.id.clone(),
            row,
            col,
            display_name: cell.display_name.clone(),
            link,
        });
    }

    PageView {
        page_index,
        page_id: page.id.clone(),
        title: page.title.clone(),
        background_color: page.background_color.clone(),
        foreground_color: page.foreground_color.clone(),
        background_image: page.background_image.clone(),
        columns,
        cells,
    }
}

pub fn render_page(page: &mut Page, page_index: usize) -> PageView {
    render_page_with(page, page_index, &mut rand::thread_rng())
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
