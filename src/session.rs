//! Drives a [`WorkflowState`] from user actions and provider outcomes.
//!
//! Must be used from inside a tokio runtime: generations run as spawned
//! tasks that report back over a channel.

use crate::{
    capture::Capture,
    config::RoomIdConfig,
    error::ProviderError,
    logger,
    models::{FileCandidate, GenerationRequest, Notification, RoomType},
    provider::GenerationProvider,
    workflow::{self, Effect, Event, WorkflowState},
};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};

pub struct DesignSession {
    state: WorkflowState,
    capture: Capture,
    provider: Arc<dyn GenerationProvider>,
    outcomes_tx: mpsc::UnboundedSender<Event>,
    outcomes_rx: mpsc::UnboundedReceiver<Event>,
    in_flight: Option<(u64, JoinHandle<()>)>,
    notifications: Vec<Notification>,
}

impl DesignSession {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self::with_parts(WorkflowState::default(), Capture::default(), provider)
    }

    pub fn from_config(config: &RoomIdConfig, provider: Arc<dyn GenerationProvider>) -> Self {
        let state = WorkflowState::new(config.catalog).with_styles(config.styles.clone());
        let capture = Capture::new().with_max_bytes(config.max_upload_bytes);
        Self::with_parts(state, capture, provider)
    }

    pub fn with_parts(
        state: WorkflowState,
        capture: Capture,
        provider: Arc<dyn GenerationProvider>,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            state,
            capture,
            provider,
            outcomes_tx,
            outcomes_rx,
            in_flight: None,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Handles a drop or file-picker event.
    pub fn upload(&mut self, files: Vec<FileCandidate>) -> Option<Notification> {
        let event = match self.capture.capture(files) {
            Ok(image) => Event::ImageUploaded(image),
            Err(error) => Event::UploadRejected(error),
        };
        self.dispatch(event)
    }

    pub fn select_room_type(&mut self, room: RoomType) -> Option<Notification> {
        self.dispatch(Event::RoomTypeSelected(room))
    }

    pub fn generate(&mut self) -> Option<Notification> {
        self.dispatch(Event::GenerateRequested)
    }

    /// Feeds one event through the reducer and carries out its effects.
    pub fn dispatch(&mut self, event: Event) -> Option<Notification> {
        let transition = workflow::reduce(&mut self.state, event);

        for effect in transition.effects {
            match effect {
                Effect::StartGeneration(request) => self.spawn_generation(request),
                Effect::CancelGeneration { request_id } => self.cancel_generation(request_id),
            }
        }

        if self.in_flight.is_some() && !self.state.is_pending() {
            self.in_flight = None;
        }

        let notification = transition.notification?;
        self.notifications.push(notification.clone());
        Some(notification)
    }

    /// Waits for the pending generation, if any, and applies its outcome.
    pub async fn wait_for_generation(&mut self) -> Option<Notification> {
        while self.state.is_pending() {
            let event = self.outcomes_rx.recv().await?;
            let notification = self.dispatch(event);
            if !self.state.is_pending() {
                return notification;
            }
        }
        None
    }

    /// Applies any outcomes that already arrived without waiting.
    pub fn poll_outcomes(&mut self) -> Vec<Notification> {
        let mut applied = Vec::new();
        while let Ok(event) = self.outcomes_rx.try_recv() {
            if let Some(notification) = self.dispatch(event) {
                applied.push(notification);
            }
        }
        applied
    }

    fn spawn_generation(&mut self, request: GenerationRequest) {
        let request_id = request.request_id;
        let provider = Arc::clone(&self.provider);
        let outcomes = self.outcomes_tx.clone();

        let handle = tokio::spawn(async move {
            let timer = logger::timer(&format!("generation #{} ({})", request_id, provider.name()));
            let outcome = AssertUnwindSafe(provider.generate(request))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(ProviderError::Crashed(panic_message(panic.as_ref())))
                });
            let event = match outcome {
                Ok(results) => Event::GenerationSucceeded {
                    request_id,
                    results,
                },
                Err(error) => Event::GenerationFailed { request_id, error },
            };
            drop(timer);
            let _ = outcomes.send(event);
        });

        self.in_flight = Some((request_id, handle));
    }

    fn cancel_generation(&mut self, request_id: u64) {
        if let Some((running_id, handle)) = self.in_flight.take() {
            if running_id == request_id {
                log::info!("Cancelling generation #{}", request_id);
                handle.abort();
            } else {
                self.in_flight = Some((running_id, handle));
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "provider panicked".to_string()
    }
}

impl Drop for DesignSession {
    fn drop(&mut self) {
        if let Some((request_id, handle)) = self.in_flight.take() {
            log::debug!("Session dropped, aborting generation #{}", request_id);
            handle.abort();
        }
    }
}
