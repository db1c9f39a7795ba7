//! Board API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use super::{edit_board, success, ApiResult, BoardQuery};
use crate::errors::AppError;
use crate::models::{Link, Linker, PageView};
use crate::rotation::render_page;
use crate::store::{load_board, load_or_create_board, save_board, BoardStore};
use crate::AppState;

/// A stored board together with where it lives.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    pub key: String,
    pub updated_at: Option<String>,
    pub board: Linker,
}

/// GET /api/boards/{post_id} - Get the full board for a post.
///
/// The first request for a post creates and stores its board.
pub async fn get_board(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<BoardDocument> {
    let key = query.key(&post_id);
    let board = load_or_create_board(state.repo.as_ref(), &key).await?;
    let updated_at = state.repo.updated_at(&key).await?;

    success(BoardDocument {
        key,
        updated_at,
        board,
    })
}

/// PUT /api/boards/{post_id} - Replace the whole board.
pub async fn put_board(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<BoardQuery>,
    Json(board): Json<Linker>,
) -> ApiResult<Linker> {
    board.validate()?;

    let key = query.key(&post_id);
    save_board(state.repo.as_ref(), &key, &board).await?;
    tracing::info!("Replaced board {} ({} pages)", key, board.pages.len());

    success(board)
}

/// DELETE /api/boards/{post_id} - Remove the stored board.
pub async fn delete_board(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<()> {
    let key = query.key(&post_id);
    if !state.repo.delete(&key).await? {
        return Err(AppError::NotFound(format!("Board {} not found", key)));
    }
    tracing::info!("Deleted board {}", key);
    success(())
}

/// GET /api/boards/{post_id}/view - Render a page for a viewer.
///
/// The rendered page goes back right away; the impression counts are saved in
/// the background and a failed save is only logged.
pub async fn view_board(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<PageView> {
    let key = query.key(&post_id);
    let page_index = query.page_index();

    let mut board = load_board(state.repo.as_ref(), &key).await?;
    let view = render_page(board.page_mut(page_index)?, page_index);

    let repo = state.repo.clone();
    tokio::spawn(async move {
        if let Err(e) = save_board(repo.as_ref(), &key, &board).await {
            tracing::warn!("Failed to save impressions for {}: {}", key, e);
        }
    });

    success(view)
}

/// POST /api/boards/{post_id}/cells/{cell_id}/links/{link_id}/click - Count a click.
pub async fn record_click(
    State(state): State<AppState>,
    Path((post_id, cell_id, link_id)): Path<(String, String, String)>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Link> {
    let key = query.key(&post_id);
    let link = edit_board(&state, &key, |board| board.record_click(&cell_id, &link_id)).await?;
    tracing::debug!("Click on {} in {} (now {})", link.id, key, link.click_count);
    success(link)
}
