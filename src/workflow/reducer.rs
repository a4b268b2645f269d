use super::{
    event::{Effect, Event, Transition},
    state::{GeneratorPhase, WorkflowState},
};
use crate::{
    error::{CaptureError, ProviderError, WorkflowWarning},
    models::{GeneratedResult, GenerationRequest, Notification, RoomType, UploadedImage},
};

pub const UPLOAD_SUCCESS: &str = "Image uploaded successfully!";
pub const GENERATION_SUCCESS: &str = "Designs generated successfully!";

pub fn reduce(state: &mut WorkflowState, event: Event) -> Transition {
    log::debug!("Workflow event: {}", event.name());
    match event {
        Event::ImageUploaded(image) => upload(state, image),
        Event::UploadRejected(error) => reject_upload(state, error),
        Event::RoomTypeSelected(room) => select_room_type(state, room),
        Event::GenerateRequested => generate_start(state),
        Event::GenerationSucceeded {
            request_id,
            results,
        } => generate_success(state, request_id, results),
        Event::GenerationFailed { request_id, error } => {
            generate_failure(state, request_id, error)
        }
    }
}

/// Replaces the image and drops any results tied to the old one. An
/// in-flight generation for the old image is cancelled.
pub fn upload(state: &mut WorkflowState, image: UploadedImage) -> Transition {
    let mut transition = Transition::notify(Notification::success(UPLOAD_SUCCESS));

    if let Some(request_id) = state.pending_request() {
        log::info!("New upload supersedes generation #{}", request_id);
        transition = transition.with_effect(Effect::CancelGeneration { request_id });
    }

    if let Some(previous) = state.image.replace(image) {
        log::debug!("Released previous image {}", previous.file_name);
    }
    state.results.clear();
    state.phase = GeneratorPhase::Idle;
    transition
}

pub fn reject_upload(_state: &mut WorkflowState, error: CaptureError) -> Transition {
    log::warn!("Upload rejected: {}", error);
    Transition::notify(Notification::error(error.to_string()))
}

pub fn select_room_type(state: &mut WorkflowState, room: RoomType) -> Transition {
    if !state.catalog.offers(room) {
        let warning = WorkflowWarning::RoomTypeUnavailable(room.slug().to_string());
        return Transition::notify(Notification::warning(warning.to_string()));
    }
    state.room_type = Some(room);
    Transition::none()
}

pub fn generate_start(state: &mut WorkflowState) -> Transition {
    if state.is_pending() {
        log::debug!("Generate ignored, a generation is already pending");
        return Transition::none();
    }

    let (image, room_type) = match (&state.image, state.room_type) {
        (Some(image), Some(room_type)) => (image.clone(), room_type),
        _ => {
            return Transition::notify(Notification::warning(
                WorkflowWarning::MissingInputs.to_string(),
            ))
        }
    };

    state.last_request_id += 1;
    let request_id = state.last_request_id;
    state.phase = GeneratorPhase::Pending { request_id };

    log::info!(
        "Starting generation #{} for a {} ({} styles)",
        request_id,
        room_type.label(),
        state.styles.len()
    );

    Transition::none().with_effect(Effect::StartGeneration(GenerationRequest {
        request_id,
        image,
        room_type,
        styles: state.styles.clone(),
    }))
}

pub fn generate_success(
    state: &mut WorkflowState,
    request_id: u64,
    results: Vec<GeneratedResult>,
) -> Transition {
    if state.pending_request() != Some(request_id) {
        log::debug!("Dropping stale result of generation #{}", request_id);
        return Transition::none();
    }
    if results.is_empty() {
        return generate_failure(state, request_id, ProviderError::EmptyBatch);
    }

    log::info!("Generation #{} produced {} designs", request_id, results.len());
    state.results = results;
    state.phase = GeneratorPhase::Settled;
    Transition::notify(Notification::success(GENERATION_SUCCESS))
}

/// Failed generations clear the previous batch so the grid never shows
/// designs from an earlier request next to an error.
pub fn generate_failure(
    state: &mut WorkflowState,
    request_id: u64,
    error: ProviderError,
) -> Transition {
    if state.pending_request() != Some(request_id) {
        log::debug!("Dropping stale failure of generation #{}", request_id);
        return Transition::none();
    }

    log::error!("Generation #{} failed: {}", request_id, error);
    state.results.clear();
    state.phase = GeneratorPhase::Idle;
    Transition::notify(Notification::error(format!(
        "Failed to generate designs: {}",
        error
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageFormat, ImageSource, NotificationLevel, RoomCatalog};
    use crate::workflow::Stage;

    fn image(name: &str) -> UploadedImage {
        UploadedImage::new(name, ImageFormat::Png, vec![1, 2, 3], None)
    }

    fn batch(labels: &[&str]) -> Vec<GeneratedResult> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                GeneratedResult::new((i + 1).to_string(), ImageSource::url("https://example.com"), *label)
            })
            .collect()
    }

    fn ready_state() -> WorkflowState {
        let mut state = WorkflowState::default();
        upload(&mut state, image("room.png"));
        select_room_type(&mut state, RoomType::Kitchen);
        state
    }

    fn started_request(transition: &Transition) -> u64 {
        match transition.effects.as_slice() {
            [Effect::StartGeneration(request)] => request.request_id,
            other => panic!("expected a single StartGeneration, got {:?}", other),
        }
    }

    #[test]
    fn test_first_upload_sets_image_with_no_results() {
        let mut state = WorkflowState::default();
        let transition = upload(&mut state, image("room.png"));

        assert_eq!(state.image().map(|i| i.file_name.as_str()), Some("room.png"));
        assert!(state.results().is_empty());
        assert_eq!(state.stage(), Stage::SelectingRoom);
        let note = transition.notification.unwrap();
        assert_eq!(note.level, NotificationLevel::Success);
        assert_eq!(note.message, UPLOAD_SUCCESS);
    }

    #[test]
    fn test_generate_without_inputs_only_warns() {
        let mut state = WorkflowState::default();
        let transition = generate_start(&mut state);
        assert!(transition.effects.is_empty());
        assert_eq!(
            transition.notification.unwrap().message,
            "Please upload an image and select a room type first!"
        );
        assert_eq!(state.phase(), GeneratorPhase::Idle);

        upload(&mut state, image("room.png"));
        let transition = generate_start(&mut state);
        assert!(transition.effects.is_empty());
        assert_eq!(transition.notification.unwrap().level, NotificationLevel::Warning);
        assert!(state.image().is_some());
        assert_eq!(state.room_type(), None);
        assert_eq!(state.phase(), GeneratorPhase::Idle);

        let mut state = WorkflowState::default();
        select_room_type(&mut state, RoomType::Office);
        let transition = generate_start(&mut state);
        assert!(transition.effects.is_empty());
        assert_eq!(state.room_type(), Some(RoomType::Office));
        assert!(state.image().is_none());
    }

    #[test]
    fn test_generate_cycle_settles_with_exact_batch() {
        let mut state = ready_state();
        let transition = generate_start(&mut state);
        let request_id = started_request(&transition);
        assert!(state.is_pending());
        assert!(!state.can_generate());
        assert_eq!(state.stage(), Stage::Generating);

        let transition = generate_success(
            &mut state,
            request_id,
            batch(&["Modern", "Scandinavian", "Industrial"]),
        );
        assert_eq!(state.phase(), GeneratorPhase::Settled);
        let styles: Vec<_> = state.results().iter().map(|r| r.style.as_str()).collect();
        assert_eq!(styles, vec!["Modern", "Scandinavian", "Industrial"]);
        assert_eq!(transition.notification.unwrap().message, GENERATION_SUCCESS);
        assert_eq!(state.stage(), Stage::ShowingResults);
        assert!(state.can_generate());
    }

    #[test]
    fn test_generate_while_pending_is_noop() {
        let mut state = ready_state();
        let first = started_request(&generate_start(&mut state));

        let transition = generate_start(&mut state);
        assert!(transition.is_noop());
        assert_eq!(state.pending_request(), Some(first));
    }

    #[test]
    fn test_upload_clears_results_in_any_phase() {
        let mut state = ready_state();
        let id = started_request(&generate_start(&mut state));
        generate_success(&mut state, id, batch(&["Modern"]));
        assert_eq!(state.results().len(), 1);

        upload(&mut state, image("second.png"));
        assert!(state.results().is_empty());
        assert_eq!(state.phase(), GeneratorPhase::Idle);
        assert_eq!(state.room_type(), Some(RoomType::Kitchen));
    }

    #[test]
    fn test_upload_while_pending_cancels_and_ignores_late_result() {
        let mut state = ready_state();
        let id = started_request(&generate_start(&mut state));

        let transition = upload(&mut state, image("second.png"));
        assert!(matches!(
            transition.effects.as_slice(),
            [Effect::CancelGeneration { request_id }] if *request_id == id
        ));
        assert_eq!(state.phase(), GeneratorPhase::Idle);

        let late = generate_success(&mut state, id, batch(&["Modern"]));
        assert!(late.is_noop());
        assert!(state.results().is_empty());
        assert_eq!(state.phase(), GeneratorPhase::Idle);
    }

    #[test]
    fn test_failure_returns_to_idle_and_clears_batch() {
        let mut state = ready_state();
        let id = started_request(&generate_start(&mut state));
        generate_success(&mut state, id, batch(&["Modern", "Industrial"]));

        let id = started_request(&generate_start(&mut state));
        let transition =
            generate_failure(&mut state, id, ProviderError::Http("connection refused".into()));
        assert_eq!(state.phase(), GeneratorPhase::Idle);
        assert!(state.results().is_empty());
        assert!(state.can_generate());
        let note = transition.notification.unwrap();
        assert!(note.is_error());
        assert!(note.message.contains("connection refused"));
    }

    #[test]
    fn test_empty_batch_is_a_failure() {
        let mut state = ready_state();
        let id = started_request(&generate_start(&mut state));
        let transition = generate_success(&mut state, id, Vec::new());
        assert_eq!(state.phase(), GeneratorPhase::Idle);
        assert!(transition.notification.unwrap().is_error());
    }

    #[test]
    fn test_second_selection_replaces_first() {
        let mut state = WorkflowState::default();
        select_room_type(&mut state, RoomType::Bedroom);
        select_room_type(&mut state, RoomType::Garden);
        assert_eq!(state.room_type(), Some(RoomType::Garden));
    }

    #[test]
    fn test_classic_catalog_rejects_dashboard_only_rooms() {
        let mut state = WorkflowState::new(RoomCatalog::Classic);
        select_room_type(&mut state, RoomType::Bedroom);
        let transition = select_room_type(&mut state, RoomType::Office);
        assert_eq!(state.room_type(), Some(RoomType::Bedroom));
        assert_eq!(transition.notification.unwrap().level, NotificationLevel::Warning);
    }

    #[test]
    fn test_rejected_upload_keeps_prior_state() {
        let mut state = ready_state();
        let before = state.image().map(|i| i.id);
        let transition = reduce(&mut state, Event::UploadRejected(CaptureError::NoFile));
        assert_eq!(state.image().map(|i| i.id), before);
        assert!(transition.notification.unwrap().is_error());
    }

    #[test]
    fn test_request_ids_increase() {
        let mut state = ready_state();
        let first = started_request(&generate_start(&mut state));
        generate_failure(&mut state, first, ProviderError::Timeout(5));
        let second = started_request(&generate_start(&mut state));
        assert!(second > first);
    }
}
