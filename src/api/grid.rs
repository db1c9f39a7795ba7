//! Page structure and appearance endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{edit_board, success, ApiResult, BoardQuery};
use crate::models::{Page, PageAppearance};
use crate::AppState;

/// POST /api/boards/{post_id}/pages/{page}/rows - Append an empty row.
pub async fn add_row(
    State(state): State<AppState>,
    Path((post_id, page_index)): Path<(String, usize)>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Page> {
    let key = query.key(&post_id);
    let page = edit_board(&state, &key, |board| {
        let page = board.page_mut(page_index)?;
        page.add_row()?;
        Ok(page.clone())
    })
    .await?;
    tracing::debug!("Added row to {} page {}", key, page_index);
    success(page)
}

/// DELETE /api/boards/{post_id}/pages/{page}/rows/{row} - Remove a row.
pub async fn remove_row(
    State(state): State<AppState>,
    Path((post_id, page_index, row)): Path<(String, usize, usize)>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Page> {
    let key = query.key(&post_id);
    let page = edit_board(&state, &key, |board| {
        let page = board.page_mut(page_index)?;
        page.remove_row(row)?;
        Ok(page.clone())
    })
    .await?;
    tracing::debug!("Removed row {} from {} page {}", row, key, page_index);
    success(page)
}

/// POST /api/boards/{post_id}/pages/{page}/columns - Append an empty column.
pub async fn add_column(
    State(state): State<AppState>,
    Path((post_id, page_index)): Path<(String, usize)>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Page> {
    let key = query.key(&post_id);
    let page = edit_board(&state, &key, |board| {
        let page = board.page_mut(page_index)?;
        page.add_column()?;
        Ok(page.clone())
    })
    .await?;
    tracing::debug!("Added column to {} page {}", key, page_index);
    success(page)
}

/// DELETE /api/boards/{post_id}/pages/{page}/columns/{col} - Remove a column.
pub async fn remove_column(
    State(state): State<AppState>,
    Path((post_id, page_index, col)): Path<(String, usize, usize)>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Page> {
    let key = query.key(&post_id);
    let page = edit_board(&state, &key, |board| {
        let page = board.page_mut(page_index)?;
        page.remove_column(col)?;
        Ok(page.clone())
    })
    .await?;
    tracing::debug!("Removed column {} from {} page {}", col, key, page_index);
    success(page)
}

/// PUT /api/boards/{post_id}/pages/{page} - Update title, colors and background.
pub async fn update_page(
    State(state): State<AppState>,
    Path((post_id, page_index)): Path<(String, usize)>,
    Query(query): Query<BoardQuery>,
    Json(request): Json<PageAppearance>,
) -> ApiResult<Page> {
    let key = query.key(&post_id);
    let page = edit_board(&state, &key, |board| {
        let page = board.page_mut(page_index)?;
        page.apply(&request);
        Ok(page.clone())
    })
    .await?;
    success(page)
}
