//! Board persistence boundary.
//!
//! Boards are stored whole, as one JSON document per key. Every edit loads the
//! document, changes it in memory and overwrites it; the last write wins.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Linker;

/// Key shared by every board created before per-post keys existed.
pub const LEGACY_BOARD_KEY: &str = "links";

/// Prefix of per-post board keys.
pub const BOARD_KEY_PREFIX: &str = "linker:";

/// Posts created before this instant read and write the legacy key.
pub fn legacy_cutover() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Storage key for a post's board.
pub fn board_key(post_id: &str, created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(created) if created < legacy_cutover() => LEGACY_BOARD_KEY.to_string(),
        _ => format!("{}{}", BOARD_KEY_PREFIX, post_id),
    }
}

/// String key-value store holding serialized boards.
pub trait BoardStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Returns whether a value was stored under `key`.
    fn delete(&self, key: &str) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// Load a board, or a fresh default board when nothing is stored yet.
pub async fn load_board<S: BoardStore>(store: &S, key: &str) -> Result<Linker, AppError> {
    match store.get(key).await? {
        Some(json) => {
            let board: Linker = serde_json::from_str(&json).map_err(|e| {
                tracing::error!("Stored board {} is unreadable: {}", key, e);
                AppError::Internal(format!("Stored board {} is unreadable", key))
            })?;
            Ok(board)
        }
        None => {
            tracing::debug!("No board stored under {}, starting a new one", key);
            Ok(Linker::new())
        }
    }
}

/// Load a board, storing the default board on first access so its cell and
/// link ids stay valid for later edits.
pub async fn load_or_create_board<S: BoardStore>(store: &S, key: &str) -> Result<Linker, AppError> {
    if let Some(json) = store.get(key).await? {
        return serde_json::from_str(&json).map_err(|e| {
            tracing::error!("Stored board {} is unreadable: {}", key, e);
            AppError::Internal(format!("Stored board {} is unreadable", key))
        });
    }

    let board = Linker::new();
    save_board(store, key, &board).await?;
    tracing::info!("Created board {}", key);
    Ok(board)
}

/// Serialize a board and overwrite whatever is stored under `key`.
pub async fn save_board<S: BoardStore>(store: &S, key: &str, board: &Linker) -> Result<(), AppError> {
    let json = serde_json::to_string(board)
        .map_err(|e| AppError::Internal(format!("Failed to serialize board: {}", e)))?;
    store.set(key, json).await
}

/// In-process store, handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}
