//! REST API module.
//!
//! Viewer routes render boards and count clicks; moderator routes edit board
//! structure and content and read analytics.

mod analytics;
mod boards;
mod cells;
mod grid;

pub use analytics::*;
pub use boards::*;
pub use cells::*;
pub use grid::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Linker;
use crate::store::{board_key, load_board, save_board};
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Query parameters shared by board routes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardQuery {
    /// Creation time of the post, used to pick the storage key
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Page to render or report on
    #[serde(default)]
    pub page: Option<usize>,
}

impl BoardQuery {
    pub fn key(&self, post_id: &str) -> String {
        board_key(post_id, self.created_at)
    }

    pub fn page_index(&self) -> usize {
        self.page.unwrap_or(0)
    }
}

/// Load a board, apply `edit` and write the whole board back.
///
/// Nothing is written when `edit` fails.
pub(crate) async fn edit_board<T, F>(state: &AppState, key: &str, edit: F) -> Result<T, AppError>
where
    F: FnOnce(&mut Linker) -> Result<T, AppError>,
{
    let mut board = load_board(state.repo.as_ref(), key).await?;
    let output = edit(&mut board)?;
    save_board(state.repo.as_ref(), key, &board).await?;
    Ok(output)
}
