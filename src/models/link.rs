//! Link model: one displayable variant inside a board cell.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_LINK_BACKGROUND: &str = "#000000";
pub const DEFAULT_BACKGROUND_OPACITY: f64 = 0.5;

/// A single link variant with its own click counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_link_background")]
    pub background_color: String,
    #[serde(default = "default_background_opacity")]
    pub background_opacity: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub click_count: u64,
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn default_link_background() -> String {
    DEFAULT_LINK_BACKGROUND.to_string()
}

fn default_background_opacity() -> f64 {
    DEFAULT_BACKGROUND_OPACITY
}

impl Link {
    /// Create a blank link with a fresh id.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            uri: String::new(),
            title: String::new(),
            image: String::new(),
            text_color: default_text_color(),
            background_color: default_link_background(),
            background_opacity: DEFAULT_BACKGROUND_OPACITY,
            description: String::new(),
            click_count: 0,
        }
    }

    /// A link is empty when it has nothing to show or open.
    pub fn is_empty(&self) -> bool {
        self.uri.trim().is_empty() && self.title.trim().is_empty() && self.image.trim().is_empty()
    }

    /// Apply a content update, keeping id and click counter.
    pub fn apply(&mut self, update: &LinkContent) {
        if let Some(uri) = &update.uri {
            self.uri = uri.clone();
        }
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(image) = &update.image {
            self.image = image.clone();
        }
        if let Some(color) = &update.text_color {
            self.text_color = color.clone();
        }
        if let Some(color) = &update.background_color {
            self.background_color = color.clone();
        }
        if let Some(opacity) = update.background_opacity {
            self.background_opacity = opacity;
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}

/// Editable fields of a link. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkContent {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub background_opacity: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LinkContent {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(opacity) = self.background_opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(AppError::Validation(
                    "Background opacity must be between 0 and 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}
