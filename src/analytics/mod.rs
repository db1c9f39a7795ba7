//! Read-only click and impression reporting over a board.
//!
//! Nothing here mutates the board or fails: empty boards, missing pages and
//! boards without clicks produce `None` or empty collections.

use serde::Serialize;

use crate::grid::position;
use crate::models::{Link, Linker, Page};
use crate::rotation::round_to;

/// How clicks are spread across links.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PopularityDistribution {
    Even,
    Sparse,
    Concentrated,
}

impl PopularityDistribution {
    /// Classify by coefficient of variation (stddev / mean).
    pub fn from_coefficient(cv: f64) -> Self {
        if cv < 0.5 {
            PopularityDistribution::Even
        } else if cv <= 1.5 {
            PopularityDistribution::Sparse
        } else {
            PopularityDistribution::Concentrated
        }
    }
}

/// Click totals for one page broken down by grid row and column.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub page_index: usize,
    pub total_clicks: u64,
    pub clicks_per_row: Vec<u64>,
    pub clicks_per_column: Vec<u64>,
    pub average_clicks_per_link: f64,
}

/// Per-page overview line.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub page_index: usize,
    pub title: String,
    pub total_clicks: u64,
    pub link_count: usize,
    pub average_clicks_per_link: f64,
    pub top_link: Option<Link>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub total_clicks: u64,
    pub total_links: usize,
    /// Clicks per non-empty link, as a percentage
    pub click_through_rate: f64,
    pub distribution: PopularityDistribution,
}

/// One heatmap point.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub cell_id: String,
    pub row: usize,
    pub col: usize,
    pub clicks: u64,
    pub title: String,
}

/// Everything the analytics panel shows for a board.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_clicks: u64,
    pub top_link: Option<Link>,
    pub current_page: Option<PageStats>,
    pub most_active_row: Option<usize>,
    pub most_active_column: Option<usize>,
    pub pages: Vec<PageSummary>,
    pub engagement: Option<EngagementMetrics>,
}

fn page_links(page: &Page) -> impl Iterator<Item = &Link> {
    page.cells.iter().flat_map(|cell| cell.links.iter())
}

fn board_links(linker: &Linker) -> impl Iterator<Item = &Link> {
    linker.pages.iter().flat_map(page_links)
}

/// Highest click count among non-empty links; the first one wins ties.
fn top_of<'a>(links: impl Iterator<Item = &'a Link>) -> Option<&'a Link> {
    let mut best: Option<&Link> = None;
    for link in links.filter(|l| !l.is_empty() && l.click_count > 0) {
        match best {
            Some(current) if current.click_count >= link.click_count => {}
            _ => best = Some(link),
        }
    }
    best
}

/// Counters are stored as given, so sums saturate instead of overflowing.
fn click_sum(counts: impl IntoIterator<Item = u64>) -> u64 {
    counts.into_iter().fold(0, u64::saturating_add)
}

fn average(total: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to(total as f64 / count as f64, 1)
}

/// Sum of every link's clicks across all pages.
pub fn total_clicks(linker: &Linker) -> u64 {
    click_sum(board_links(linker).map(|l| l.click_count))
}

/// Most clicked non-empty link on the board, `None` when nothing was clicked.
pub fn top_link(linker: &Linker) -> Option<&Link> {
    top_of(board_links(linker))
}

/// Row and column breakdown for one page.
pub fn current_page_stats(linker: &Linker, page_index: usize) -> Option<PageStats> {
    let page = linker.pages.get(page_index)?;
    let columns = page.columns.max(1);
    let rows = crate::grid::rows(page.cells.len(), columns);

    let mut clicks_per_row = vec![0u64; rows];
    let mut clicks_per_column = vec![0u64; if rows == 0 { 0 } else { columns }];
    for (i, cell) in page.cells.iter().enumerate() {
        let (row, col) = position(i, columns);
        let clicks = cell.total_clicks();
        clicks_per_row[row] = clicks_per_row[row].saturating_add(clicks);
        clicks_per_column[col] = clicks_per_column[col].saturating_add(clicks);
    }

    let total_clicks = click_sum(clicks_per_row.iter().copied());
    let link_count = page_links(page).filter(|l| !l.is_empty()).count();

    Some(PageStats {
        page_index,
        total_clicks,
        clicks_per_row,
        clicks_per_column,
        average_clicks_per_link: average(total_clicks, link_count),
    })
}

fn argmax(values: &[u64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, value) in values.iter().enumerate() {
        match best {
            Some(b) if values[b] >= *value => {}
            _ => best = Some(i),
        }
    }
    best
}

pub fn most_active_row(stats: &PageStats) -> Option<usize> {
    argmax(&stats.clicks_per_row)
}

pub fn most_active_column(stats: &PageStats) -> Option<usize> {
    argmax(&stats.clicks_per_column)
}

/// Totals and top link for every page.
pub fn per_page_summary(linker: &Linker) -> Vec<PageSummary> {
    linker
        .pages
        .iter()
        .enumerate()
        .map(|(page_index, page)| {
            let total_clicks = click_sum(page_links(page).map(|l| l.click_count));
            let link_count = page_links(page).filter(|l| !l.is_empty()).count();
            PageSummary {
                page_index,
                title: page.title.clone(),
                total_clicks,
                link_count,
                average_clicks_per_link: average(total_clicks, link_count),
                top_link: top_of(page_links(page)).cloned(),
            }
        })
        .collect()
}

/// Click-through rate and how evenly clicks spread, `None` without links.
pub fn engagement_metrics(linker: &Linker) -> Option<EngagementMetrics> {
    let links: Vec<&Link> = board_links(linker).filter(|l| !l.is_empty()).collect();
    if links.is_empty() {
        return None;
    }

    let total_clicks = click_sum(links.iter().map(|l| l.click_count));
    let clicked: Vec<f64> = links
        .iter()
        .filter(|l| l.click_count > 0)
        .map(|l| l.click_count as f64)
        .collect();

    Some(EngagementMetrics {
        total_clicks,
        total_links: links.len(),
        click_through_rate: round_to(total_clicks as f64 / links.len() as f64 * 100.0, 1),
        distribution: PopularityDistribution::from_coefficient(coefficient_of_variation(&clicked)),
    })
}

/// Sample standard deviation over mean. Fewer than two samples have no spread.
fn coefficient_of_variation(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt() / mean
}

/// Click heat per non-empty cell, in index order.
pub fn heatmap(page: &Page) -> Vec<HeatmapCell> {
    page.cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(i, cell)| {
            let (row, col) = position(i, page.columns);
            let title = if cell.display_name.is_empty() {
                cell.links
                    .iter()
                    .find(|l| !l.is_empty())
                    .map(|l| l.title.clone())
                    .unwrap_or_default()
            } else {
                cell.display_name.clone()
            };
            HeatmapCell {
                cell_id: cell.id.clone(),
                row,
                col,
                clicks: cell.total_clicks(),
                title,
            }
        })
        .collect()
}

/// Build the full report for a board, focused on one page.
pub fn report(linker: &Linker, page_index: usize) -> AnalyticsReport {
    let current_page = current_page_stats(linker, page_index);
    AnalyticsReport {
        total_clicks: total_clicks(linker),
        top_link: top_link(linker).cloned(),
        most_active_row: current_page.as_ref().and_then(most_active_row),
        most_active_column: current_page.as_ref().and_then(most_active_column),
        current_page,
        pages: per_page_summary(linker),
        engagement: engagement_metrics(linker),
    }
}
