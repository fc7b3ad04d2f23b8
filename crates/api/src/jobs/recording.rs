//! Daily continuous recording of every active camera.
//!
//! Each run starts one ffmpeg process per camera that records until the next
//! midnight UTC into `<output_root>/<camera>/<YYYY-MM-DD>.mp4`. When a
//! recording ends, files in that camera's directory older than the retention
//! window are removed.

use chrono::{DateTime, Utc};
use domain::models::Product;
use domain::ports::ProductRepository;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::scheduler::{until_next_midnight, Job, JobFrequency};
use crate::config::RecordingConfig;

#[derive(Debug, Clone)]
pub struct RecordingSettings {
    pub output_root: PathBuf,
    pub ffmpeg_path: String,
    pub retention: Duration,
}

impl From<&RecordingConfig> for RecordingSettings {
    fn from(config: &RecordingConfig) -> Self {
        Self {
            output_root: PathBuf::from(&config.output_root),
            ffmpeg_path: config.ffmpeg_path.clone(),
            retention: Duration::from_secs(u64::from(config.retention_days) * 86_400),
        }
    }
}

pub struct RecordingJob {
    products: Arc<dyn ProductRepository>,
    settings: RecordingSettings,
    cancel: CancellationToken,
}

impl RecordingJob {
    pub fn new(products: Arc<dyn ProductRepository>, settings: RecordingSettings) -> Self {
        Self {
            products,
            settings,
            cancel: CancellationToken::new(),
        }
    }
}

/// Turns a camera name into one safe path component.
pub fn camera_dir_name(product: &Product) -> String {
    let cleaned: String = product
        .name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').trim();
    if cleaned.is_empty() {
        format!("camera-{}", product.id)
    } else {
        cleaned.to_string()
    }
}

/// Output file for a recording starting at `now`. A second recording on the
/// same day gets the start time appended instead of overwriting the first.
pub fn output_file(dir: &Path, now: DateTime<Utc>) -> PathBuf {
    let daily = dir.join(format!("{}.mp4", now.format("%Y-%m-%d")));
    if daily.exists() {
        dir.join(format!("{}.mp4", now.format("%Y-%m-%d_%H%M%S")))
    } else {
        daily
    }
}

pub fn ffmpeg_args(product: &Product, seconds: u64, output: &Path) -> Vec<String> {
    vec![
        "-nostdin".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        product.rtsp_url(),
        "-t".to_string(),
        seconds.to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Deletes regular files last modified before `now - retention`.
pub async fn cleanup_old_recordings(
    dir: &Path,
    retention: Duration,
    now: SystemTime,
) -> std::io::Result<usize> {
    let cutoff = now.checked_sub(retention).unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let metadata = match entry.metadata().await {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot stat recording");
                continue;
            }
        };

        let modified = metadata.modified()?;
        if modified < cutoff {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Removed old recording");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove recording")
                }
            }
        }
    }

    Ok(removed)
}

async fn record_camera(product: Product, settings: RecordingSettings, cancel: CancellationToken) {
    let dir = settings.output_root.join(camera_dir_name(&product));
    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        tracing::error!(product_id = product.id, dir = %dir.display(), error = %e, "Cannot create recording directory");
        return;
    }

    let now = Utc::now();
    let output = output_file(&dir, now);
    let seconds = until_next_midnight(now).as_secs().max(1);

    let child = Command::new(&settings.ffmpeg_path)
        .args(ffmpeg_args(&product, seconds, &output))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            tracing::error!(product_id = product.id, error = %e, "Failed to start ffmpeg");
            return;
        }
    };

    tracing::info!(product_id = product.id, output = %output.display(), seconds, "Recording started");

    tokio::select! {
        status = child.wait() => match status {
            Ok(status) if status.success() => {
                tracing::info!(product_id = product.id, output = %output.display(), "Recording finished")
            }
            Ok(status) => {
                tracing::warn!(product_id = product.id, code = ?status.code(), "ffmpeg exited with failure")
            }
            Err(e) => tracing::error!(product_id = product.id, error = %e, "Waiting on ffmpeg failed"),
        },
        _ = cancel.cancelled() => {
            if let Err(e) = child.kill().await {
                tracing::warn!(product_id = product.id, error = %e, "Failed to stop ffmpeg");
            }
            tracing::info!(product_id = product.id, "Recording stopped");
            return;
        }
    }

    match cleanup_old_recordings(&dir, settings.retention, SystemTime::now()).await {
        Ok(removed) if removed > 0 => {
            tracing::info!(product_id = product.id, removed, "Old recordings cleaned up")
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "Recording cleanup failed"),
    }
}

#[async_trait::async_trait]
impl Job for RecordingJob {
    fn name(&self) -> &'static str {
        "camera_recording"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    fn run_immediately(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let cameras = self
            .products
            .list_recordable()
            .await
            .map_err(|e| format!("listing cameras: {}", e))?;

        tracing::info!(count = cameras.len(), "Starting daily recordings");
        for product in cameras {
            tokio::spawn(record_camera(
                product,
                self.settings.clone(),
                self.cancel.child_token(),
            ));
        }
        Ok(())
    }

    fn stop(&self) {
        self.cancel.cancel();
    }
}
