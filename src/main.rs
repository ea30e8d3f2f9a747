use bevy::prelude::*;

use bevy::window::WindowResolution;

use ghostmaze::game::GamePlugin;

use bevy::log::LogPlugin;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::fs;
use std::path::{Path, PathBuf};

const LOG_PREFIX: &str = "ghostmaze";
const KEEP_LOGS: usize = 25;

fn setup_file_logging() -> std::io::Result<PathBuf> {
    let log_dir = PathBuf::from("logs");
    fs::create_dir_all(&log_dir)?;

    cleanup_old_logs(&log_dir, KEEP_LOGS);

    let now = chrono::Local::now();
    let log_filename = format!("{}_{}.log", LOG_PREFIX, now.format("%Y%m%d_%H%M%S"));

    // One file per run, no rotation.
    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wgpu=error,bevy_render=info,bevy_ecs=info,ghostmaze=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(log_dir.join(log_filename))
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else { return };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|s| s.starts_with(LOG_PREFIX) && s.ends_with(".log"))
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

fn main() {
    match setup_file_logging() {
        Ok(log_file) => println!("ghostmaze: logging to {}", log_file.display()),
        Err(e) => {
            eprintln!("ghostmaze: file logging disabled ({})", e);
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("wgpu=error,ghostmaze=info"))
                .init();
        }
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "ghostmaze".into(),
                resolution: WindowResolution::new(640, 480),
                resizable: true,
                ..default()
            }),
            ..default()
        }).build().disable::<LogPlugin>()) // our own subscriber is installed above
        .add_plugins(GamePlugin)
        .run();
}
