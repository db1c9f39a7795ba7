//! Cell and variant endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{edit_board, success, ApiResult, BoardQuery};
use crate::errors::AppError;
use crate::models::{Link, LinkCell, LinkContent, UpdateCellRequest};
use crate::rotation::{calculate_variant_probabilities, VariantProbability};
use crate::store::load_board;
use crate::AppState;

/// PUT /api/boards/{post_id}/cells/{cell_id} - Update name, rotation and weights.
pub async fn update_cell(
    State(state): State<AppState>,
    Path((post_id, cell_id)): Path<(String, String)>,
    Query(query): Query<BoardQuery>,
    Json(request): Json<UpdateCellRequest>,
) -> ApiResult<LinkCell> {
    let key = query.key(&post_id);
    let cell = edit_board(&state, &key, |board| {
        let cell = board.cell_mut(&cell_id)?;
        cell.apply(&request)?;
        Ok(cell.clone())
    })
    .await?;
    success(cell)
}

/// POST /api/boards/{post_id}/cells/{cell_id}/links - Add a variant.
pub async fn add_variant(
    State(state): State<AppState>,
    Path((post_id, cell_id)): Path<(String, String)>,
    Query(query): Query<BoardQuery>,
    Json(content): Json<LinkContent>,
) -> ApiResult<LinkCell> {
    content.validate()?;

    let key = query.key(&post_id);
    let cell = edit_board(&state, &key, |board| {
        let cell = board.cell_mut(&cell_id)?;
        let link_id = cell.add_variant().id.clone();
        if let Some(link) = cell.link_mut(&link_id) {
            link.apply(&content);
        }
        Ok(cell.clone())
    })
    .await?;
    tracing::debug!("Cell {} in {} now has {} variants", cell.id, key, cell.links.len());
    success(cell)
}

/// PUT /api/boards/{post_id}/cells/{cell_id}/links/{link_id} - Edit a variant.
pub async fn update_variant(
    State(state): State<AppState>,
    Path((post_id, cell_id, link_id)): Path<(String, String, String)>,
    Query(query): Query<BoardQuery>,
    Json(content): Json<LinkContent>,
) -> ApiResult<Link> {
    content.validate()?;

    let key = query.key(&post_id);
    let link = edit_board(&state, &key, |board| {
        let link = board
            .cell_mut(&cell_id)?
            .link_mut(&link_id)
            .ok_or_else(|| AppError::NotFound(format!("Link {} not found", link_id)))?;
        link.apply(&content);
        Ok(link.clone())
    })
    .await?;
    success(link)
}

/// DELETE /api/boards/{post_id}/cells/{cell_id}/links/{link_id} - Remove a variant.
pub async fn remove_variant(
    State(state): State<AppState>,
    Path((post_id, cell_id, link_id)): Path<(String, String, String)>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<LinkCell> {
    let key = query.key(&post_id);
    let cell = edit_board(&state, &key, |board| {
        let cell = board.cell_mut(&cell_id)?;
        cell.remove_variant(&link_id)?;
        Ok(cell.clone())
    })
    .await?;
    success(cell)
}

/// GET /api/boards/{post_id}/cells/{cell_id}/probabilities - Rotation odds per variant.
pub async fn variant_probabilities(
    State(state): State<AppState>,
    Path((post_id, cell_id)): Path<(String, String)>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Vec<VariantProbability>> {
    let board = load_board(state.repo.as_ref(), &query.key(&post_id)).await?;
    success(calculate_variant_probabilities(board.cell(&cell_id)?))
}
