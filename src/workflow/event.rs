use crate::{
    error::{CaptureError, ProviderError},
    models::{GeneratedResult, GenerationRequest, Notification, RoomType, UploadedImage},
};

/// One user action or async outcome, consumed by [`super::reduce`].
#[derive(Debug, Clone)]
pub enum Event {
    ImageUploaded(UploadedImage),
    UploadRejected(CaptureError),
    RoomTypeSelected(RoomType),
    GenerateRequested,
    GenerationSucceeded {
        request_id: u64,
        results: Vec<GeneratedResult>,
    },
    GenerationFailed {
        request_id: u64,
        error: ProviderError,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ImageUploaded(_) => "image_uploaded",
            Event::UploadRejected(_) => "upload_rejected",
            Event::RoomTypeSelected(_) => "room_type_selected",
            Event::GenerateRequested => "generate_requested",
            Event::GenerationSucceeded { .. } => "generation_succeeded",
            Event::GenerationFailed { .. } => "generation_failed",
        }
    }
}

/// Work the reducer asks its owner to perform.
#[derive(Debug, Clone)]
pub enum Effect {
    StartGeneration(GenerationRequest),
    CancelGeneration { request_id: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct Transition {
    pub notification: Option<Notification>,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn notify(notification: Notification) -> Self {
        Self {
            notification: Some(notification),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_noop(&self) -> bool {
        self.notification.is_none() && self.effects.is_empty()
    }
}
