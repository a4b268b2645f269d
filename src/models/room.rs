use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of room depicted in the uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomType {
    Bedroom,
    Kitchen,
    Bathroom,
    Garden,
    LivingRoom,
    DiningRoom,
    Office,
}

impl RoomType {
    pub fn all() -> &'static [RoomType] {
        &[
            RoomType::Bedroom,
            RoomType::Kitchen,
            RoomType::Bathroom,
            RoomType::Garden,
            RoomType::LivingRoom,
            RoomType::DiningRoom,
            RoomType::Office,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            RoomType::Bedroom => "bedroom",
            RoomType::Kitchen => "kitchen",
            RoomType::Bathroom => "bathroom",
            RoomType::Garden => "garden",
            RoomType::LivingRoom => "living-room",
            RoomType::DiningRoom => "dining-room",
            RoomType::Office => "office",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Bedroom => "Bedroom",
            RoomType::Kitchen => "Kitchen",
            RoomType::Bathroom => "Bathroom",
            RoomType::Garden => "Garden",
            RoomType::LivingRoom => "Living Room",
            RoomType::DiningRoom => "Dining Room",
            RoomType::Office => "Office",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RoomType::Bedroom => "🛏️",
            RoomType::Kitchen => "🍳",
            RoomType::Bathroom => "🚿",
            RoomType::Garden => "🌿",
            RoomType::LivingRoom => "🛋️",
            RoomType::DiningRoom => "🍽️",
            RoomType::Office => "💼",
        }
    }

    /// Accepts the slug, the label, or the label with underscores.
    pub fn from_slug(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        RoomType::all()
            .iter()
            .copied()
            .find(|room| room.slug() == normalized)
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::from_slug(s).ok_or_else(|| format!("unknown room type '{}'", s))
    }
}

/// Which set of room types a front-end offers.
///
/// The landing-page variant only shows five choices; the dashboard shows
/// the full list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomCatalog {
    Classic,
    #[default]
    Dashboard,
}

impl RoomCatalog {
    pub fn room_types(&self) -> &'static [RoomType] {
        match self {
            RoomCatalog::Classic => &[
                RoomType::Bedroom,
                RoomType::Kitchen,
                RoomType::Bathroom,
                RoomType::Garden,
                RoomType::LivingRoom,
            ],
            RoomCatalog::Dashboard => RoomType::all(),
        }
    }

    pub fn offers(&self, room: RoomType) -> bool {
        self.room_types().contains(&room)
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(RoomCatalog::Classic),
            "dashboard" => Some(RoomCatalog::Dashboard),
            _ => None,
        }
    }
}
