use crate::models::{DesignStyle, GeneratedResult, RoomCatalog, RoomType, UploadedImage};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum GeneratorPhase {
    Idle,
    Pending { request_id: u64 },
    Settled,
}

/// Which parts of the page are visible, derived from the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AwaitingUpload,
    SelectingRoom,
    ReadyToGenerate,
    Generating,
    ShowingResults,
}

#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub(crate) catalog: RoomCatalog,
    pub(crate) styles: Vec<DesignStyle>,
    pub(crate) image: Option<UploadedImage>,
    pub(crate) room_type: Option<RoomType>,
    pub(crate) phase: GeneratorPhase,
    pub(crate) results: Vec<GeneratedResult>,
    pub(crate) last_request_id: u64,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(RoomCatalog::default())
    }
}

impl WorkflowState {
    pub fn new(catalog: RoomCatalog) -> Self {
        Self {
            catalog,
            styles: DesignStyle::default_batch(),
            image: None,
            room_type: None,
            phase: GeneratorPhase::Idle,
            results: Vec::new(),
            last_request_id: 0,
        }
    }

    pub fn with_styles(mut self, styles: Vec<DesignStyle>) -> Self {
        if !styles.is_empty() {
            self.styles = styles;
        }
        self
    }

    pub fn catalog(&self) -> RoomCatalog {
        self.catalog
    }

    pub fn room_choices(&self) -> &'static [RoomType] {
        self.catalog.room_types()
    }

    pub fn styles(&self) -> &[DesignStyle] {
        &self.styles
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn room_type(&self) -> Option<RoomType> {
        self.room_type
    }

    pub fn phase(&self) -> GeneratorPhase {
        self.phase
    }

    pub fn results(&self) -> &[GeneratedResult] {
        &self.results
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, GeneratorPhase::Pending { .. })
    }

    pub fn pending_request(&self) -> Option<u64> {
        match self.phase {
            GeneratorPhase::Pending { request_id } => Some(request_id),
            _ => None,
        }
    }

    /// Whether the generate action should be enabled.
    pub fn can_generate(&self) -> bool {
        self.image.is_some() && self.room_type.is_some() && !self.is_pending()
    }

    pub fn stage(&self) -> Stage {
        if self.image.is_none() {
            return Stage::AwaitingUpload;
        }
        match self.phase {
            GeneratorPhase::Pending { .. } => Stage::Generating,
            GeneratorPhase::Settled if !self.results.is_empty() => Stage::ShowingResults,
            _ if self.room_type.is_none() => Stage::SelectingRoom,
            _ => Stage::ReadyToGenerate,
        }
    }
}
