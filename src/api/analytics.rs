//! Analytics endpoints.

use axum::extract::{Path, Query, State};

use super::{edit_board, success, ApiResult, BoardQuery};
use crate::analytics::{heatmap, report, AnalyticsReport, HeatmapCell};
use crate::store::load_board;
use crate::AppState;

/// GET /api/boards/{post_id}/analytics - Click report, focused on `?page=`.
pub async fn get_analytics(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<AnalyticsReport> {
    let board = load_board(state.repo.as_ref(), &query.key(&post_id)).await?;
    success(report(&board, query.page_index()))
}

/// GET /api/boards/{post_id}/pages/{page}/heatmap - Clicks by grid position.
///
/// A page that does not exist has no heat.
pub async fn get_heatmap(
    State(state): State<AppState>,
    Path((post_id, page_index)): Path<(String, usize)>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Vec<HeatmapCell>> {
    let board = load_board(state.repo.as_ref(), &query.key(&post_id)).await?;
    success(board.pages.get(page_index).map(heatmap).unwrap_or_default())
}

/// POST /api/boards/{post_id}/analytics/reset - Zero all counters.
pub async fn reset_analytics(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<AnalyticsReport> {
    let key = query.key(&post_id);
    let page_index = query.page_index();
    let summary = edit_board(&state, &key, |board| {
        board.reset_counters();
        Ok(report(board, page_index))
    })
    .await?;
    tracing::info!("Reset analytics for {}", key);
    success(summary)
}
