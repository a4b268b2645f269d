use async_trait::async_trait;
use roomid::{
    CaptureError, DesignSession, FileCandidate, GeneratedResult, GenerationProvider,
    GenerationRequest, GeneratorPhase, MockGenerationProvider, NotificationLevel, ProviderError,
    RoomCatalog, RoomIdConfig, RoomType, Stage,
};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn room_photo(name: &str) -> FileCandidate {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::new(4, 3)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    FileCandidate::new(name, Some("image/png"), out.into_inner())
}

fn mock(delay_ms: u64) -> Arc<MockGenerationProvider> {
    Arc::new(MockGenerationProvider::new().with_delay(Duration::from_millis(delay_ms)))
}

/// Records every request it sees and answers from a script.
struct ScriptedProvider {
    calls: AtomicUsize,
    fail_on: Option<usize>,
}

impl ScriptedProvider {
    fn new(fail_on: Option<usize>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Vec<GeneratedResult>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(Duration::from_millis(5)).await;
        if self.fail_on == Some(call) {
            return Err(ProviderError::Http("503 Service Unavailable".into()));
        }
        Ok(request
            .styles
            .iter()
            .map(|style| {
                GeneratedResult::new(
                    format!("{}-{}", request.request_id, style.label()),
                    roomid::ImageSource::url(format!("https://designs.test/{}", call)),
                    style.label(),
                )
            })
            .collect())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[tokio::test]
async fn first_upload_sets_image_and_leaves_results_empty() {
    let mut session = DesignSession::new(mock(1));
    let note = session.upload(vec![room_photo("living.png")]).unwrap();

    assert_eq!(note.level, NotificationLevel::Success);
    assert_eq!(note.message, "Image uploaded successfully!");
    let image = session.state().image().unwrap();
    assert_eq!(image.file_name, "living.png");
    assert_eq!(image.dimensions, Some((4, 3)));
    assert!(session.state().results().is_empty());
    assert_eq!(session.state().stage(), Stage::SelectingRoom);
}

#[tokio::test]
async fn second_upload_clears_settled_results() {
    let mut session = DesignSession::new(mock(1));
    session.upload(vec![room_photo("one.png")]);
    session.select_room_type(RoomType::Bedroom);
    session.generate();
    session.wait_for_generation().await;
    assert_eq!(session.state().results().len(), 3);

    session.upload(vec![room_photo("two.png")]);
    assert!(session.state().results().is_empty());
    assert_eq!(session.state().phase(), GeneratorPhase::Idle);
    assert_eq!(session.state().image().unwrap().file_name, "two.png");
}

#[tokio::test]
async fn second_upload_while_pending_discards_the_generation() {
    let mut session = DesignSession::new(mock(50));
    session.upload(vec![room_photo("one.png")]);
    session.select_room_type(RoomType::Bedroom);
    session.generate();

    session.upload(vec![room_photo("two.png")]);
    tokio::time::sleep(Duration::from_millis(80)).await;
    session.poll_outcomes();

    assert!(session.state().results().is_empty());
    assert_eq!(session.state().phase(), GeneratorPhase::Idle);
}

#[tokio::test]
async fn generate_without_inputs_only_warns() {
    let mut session = DesignSession::new(mock(1));
    let note = session.generate().unwrap();
    assert_eq!(note.level, NotificationLevel::Warning);
    assert_eq!(note.message, "Please upload an image and select a room type first!");
    assert!(session.state().image().is_none());
    assert!(session.state().room_type().is_none());
    assert!(session.state().results().is_empty());
    assert_eq!(session.state().phase(), GeneratorPhase::Idle);

    session.upload(vec![room_photo("room.png")]);
    let note = session.generate().unwrap();
    assert_eq!(note.level, NotificationLevel::Warning);
    assert!(!session.state().is_pending());
}

#[tokio::test]
async fn generate_settles_with_mock_batch_in_order() {
    let mut session = DesignSession::new(mock(20));
    session.upload(vec![room_photo("room.png")]);
    session.select_room_type(RoomType::Garden);
    session.generate();
    assert!(session.state().is_pending());
    assert_eq!(session.state().stage(), Stage::Generating);

    let note = session.wait_for_generation().await.unwrap();
    assert_eq!(note.message, "Designs generated successfully!");
    assert_eq!(session.state().phase(), GeneratorPhase::Settled);

    let results = session.state().results();
    assert_eq!(results.len(), 3);
    let labels: Vec<_> = results.iter().map(|r| r.style.as_str()).collect();
    assert_eq!(labels, vec!["Modern", "Scandinavian", "Industrial"]);
}

#[tokio::test]
async fn generate_while_pending_makes_no_second_call() {
    let provider = Arc::new(ScriptedProvider::new(None));
    let mut session = DesignSession::new(provider.clone());
    session.upload(vec![room_photo("room.png")]);
    session.select_room_type(RoomType::Kitchen);

    session.generate();
    let phase = session.state().phase();
    assert!(session.generate().is_none());
    assert_eq!(session.state().phase(), phase);

    session.wait_for_generation().await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn selecting_twice_keeps_only_the_second() {
    let mut session = DesignSession::new(mock(1));
    session.select_room_type(RoomType::Bathroom);
    session.select_room_type(RoomType::DiningRoom);
    assert_eq!(session.state().room_type(), Some(RoomType::DiningRoom));
}

#[tokio::test]
async fn failure_returns_to_idle_and_allows_retry_by_user() {
    let provider = Arc::new(ScriptedProvider::new(Some(2)));
    let mut session = DesignSession::new(provider.clone());
    session.upload(vec![room_photo("room.png")]);
    session.select_room_type(RoomType::Office);

    session.generate();
    session.wait_for_generation().await;
    assert_eq!(session.state().results().len(), 3);

    session.generate();
    let note = session.wait_for_generation().await.unwrap();
    assert!(note.is_error());
    assert!(note.message.contains("503"));
    assert_eq!(session.state().phase(), GeneratorPhase::Idle);
    assert!(session.state().results().is_empty());
    assert!(session.state().can_generate());

    session.generate();
    session.wait_for_generation().await;
    assert_eq!(session.state().phase(), GeneratorPhase::Settled);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn invalid_upload_preserves_previous_image() {
    let mut session = DesignSession::new(mock(1));
    session.upload(vec![room_photo("good.png")]);
    let before = session.state().image().unwrap().id;

    let note = session
        .upload(vec![FileCandidate::new("clip.mp4", Some("video/mp4"), vec![0, 0, 0, 24])])
        .unwrap();
    assert!(note.is_error());
    assert_eq!(session.state().image().unwrap().id, before);

    let note = session
        .upload(vec![room_photo("a.png"), room_photo("b.png")])
        .unwrap();
    assert_eq!(note.message, CaptureError::TooManyFiles(2).to_string());
    assert_eq!(session.state().image().unwrap().id, before);
}

#[tokio::test]
async fn config_drives_catalog_styles_and_upload_limit() {
    let config = RoomIdConfig::new()
        .with_catalog(RoomCatalog::Classic)
        .with_styles(vec![roomid::DesignStyle::Bohemian])
        .with_max_upload_bytes(16);
    let provider = Arc::new(ScriptedProvider::new(None));
    let mut session = DesignSession::from_config(&config, provider);

    let note = session.upload(vec![room_photo("room.png")]).unwrap();
    assert!(note.is_error());

    let config = config.with_max_upload_bytes(1024 * 1024);
    let mut session = DesignSession::from_config(&config, Arc::new(ScriptedProvider::new(None)));
    session.upload(vec![room_photo("room.png")]);
    let note = session.select_room_type(RoomType::Office).unwrap();
    assert_eq!(note.level, NotificationLevel::Warning);
    session.select_room_type(RoomType::LivingRoom);
    session.generate();
    session.wait_for_generation().await;

    let labels: Vec<_> = session.state().results().iter().map(|r| r.style.clone()).collect();
    assert_eq!(labels, vec!["Bohemian"]);
}
