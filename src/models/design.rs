use super::{image::UploadedImage, room::RoomType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignStyle {
    Modern,
    Traditional,
    Minimalist,
    Industrial,
    Scandinavian,
    Bohemian,
}

impl DesignStyle {
    pub fn all() -> &'static [DesignStyle] {
        &[
            DesignStyle::Modern,
            DesignStyle::Traditional,
            DesignStyle::Minimalist,
            DesignStyle::Industrial,
            DesignStyle::Scandinavian,
            DesignStyle::Bohemian,
        ]
    }

    /// The three styles every generation asks for unless configured otherwise.
    pub fn default_batch() -> Vec<DesignStyle> {
        vec![
            DesignStyle::Modern,
            DesignStyle::Scandinavian,
            DesignStyle::Industrial,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DesignStyle::Modern => "Modern",
            DesignStyle::Traditional => "Traditional",
            DesignStyle::Minimalist => "Minimalist",
            DesignStyle::Industrial => "Industrial",
            DesignStyle::Scandinavian => "Scandinavian",
            DesignStyle::Bohemian => "Bohemian",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        DesignStyle::all()
            .iter()
            .copied()
            .find(|style| style.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for DesignStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a generated design can be loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageSource {
    Url { url: String },
    Base64 { mime_type: String, data: String },
}

impl ImageSource {
    pub fn url(url: impl Into<String>) -> Self {
        ImageSource::Url { url: url.into() }
    }

    /// Something an `<img src>` accepts.
    pub fn display_ref(&self) -> String {
        match self {
            ImageSource::Url { url } => url.clone(),
            ImageSource::Base64 { mime_type, data } => format!("data:{};base64,{}", mime_type, data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedResult {
    pub id: String,
    pub source: ImageSource,
    pub style: String,
}

impl GeneratedResult {
    pub fn new(id: impl Into<String>, source: ImageSource, style: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source,
            style: style.into(),
        }
    }
}

/// Everything a provider needs for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub request_id: u64,
    pub image: UploadedImage,
    pub room_type: RoomType,
    pub styles: Vec<DesignStyle>,
}

impl GenerationRequest {
    pub fn prompt_for(&self, style: DesignStyle) -> String {
        format!(
            "A photorealistic {} interior design of this {}, keeping the room layout, \
             professional interior photography",
            style.label().to_lowercase(),
            self.room_type.label().to_lowercase()
        )
    }
}
