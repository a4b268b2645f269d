use base64::Engine;
use roomid::{
    build_provider, DesignSession, FileCandidate, ImageSource, NotificationLevel, RoomIdConfig,
    RoomType,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: roomid <room-photo.(jpg|png)> <room-type> [output-dir]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = RoomIdConfig::from_env()?;
    roomid::logger::init_from_config(&config)?;
    roomid::logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using system environment variables");
    }
    roomid::logger::log_config_info(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    let (image_path, room_arg) = match (args.first(), args.get(1)) {
        (Some(image), Some(room)) => (PathBuf::from(image), room.clone()),
        _ => {
            log::info!("Room types offered:");
            for room in config.catalog.room_types() {
                log::info!("  {} {} ({})", room.icon(), room.label(), room.slug());
            }
            return Err(USAGE.into());
        }
    };
    let out_dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let room: RoomType = room_arg.parse()?;

    let provider = build_provider(&config).await?;
    let mut session = DesignSession::from_config(&config, provider);

    let file_name = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let bytes = fs::read(&image_path)?;
    report(session.upload(vec![FileCandidate::new(file_name, None, bytes)]));
    if session.state().image().is_none() {
        return Err("the room photo was not accepted".into());
    }

    report(session.select_room_type(room));
    report(session.generate());
    if !session.state().is_pending() {
        return Err("generation did not start".into());
    }

    log::info!("🎨 Generating designs with the {} provider...", session.provider_name());
    report(session.wait_for_generation().await);

    let results = session.state().results();
    if results.is_empty() {
        return Err("no designs were generated".into());
    }

    for result in results {
        match &result.source {
            ImageSource::Url { url } => log::info!("🖼️  {} style: {}", result.style, url),
            ImageSource::Base64 { data, .. } => {
                let path = save_design(&out_dir, &result.style, &result.id, data)?;
                log::info!("💾 {} style saved to {}", result.style, path.display());
            }
        }
    }

    Ok(())
}

fn report(notification: Option<roomid::Notification>) {
    if let Some(notification) = notification {
        match notification.level {
            NotificationLevel::Success => log::info!("✅ {}", notification.message),
            NotificationLevel::Warning => log::warn!("{}", notification.message),
            NotificationLevel::Error => log::error!("{}", notification.message),
        }
    }
}

fn save_design(
    out_dir: &Path,
    style: &str,
    id: &str,
    data: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(data)?;
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!(
        "roomid_{}_{}_{}.png",
        style.to_lowercase(),
        id,
        chrono::Utc::now().timestamp()
    ));
    fs::write(&path, bytes)?;
    Ok(path)
}
