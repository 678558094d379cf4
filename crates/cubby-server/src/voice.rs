//! Supervisor for the external voice-recognition helper.
//!
//! The helper is a separate process that listens to the microphone,
//! drives the HTTP API on the user's behalf, and reports what it is
//! doing by overwriting a small status file. This module only starts and
//! stops that process and relays the status file; nothing here feeds
//! back into the filesystem core.

use std::path::PathBuf;
use std::process::Stdio;

use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

/// Voice supervisor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("voice helper already running")]
    AlreadyRunning,
    #[error("no voice helper configured")]
    NotConfigured,
    #[error("failed to start voice helper: {0}")]
    Spawn(String),
}

/// What `/voice/status` reports.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceStatus {
    /// Raw status text, relayed verbatim from the helper.
    pub text: String,
    /// True once the helper wrote its final marker line.
    pub completed: bool,
}

/// The line the helper writes when it finished a command.
const COMPLETED_MARKER: &str = "Command completed";

/// Handle on at most one helper process.
#[derive(Debug)]
pub struct VoiceControl {
    command: Vec<String>,
    status_file: PathBuf,
    child: Mutex<Option<Child>>,
}

impl VoiceControl {
    /// `command` is the helper argv; empty means no helper is installed.
    pub fn new(command: Vec<String>, status_file: PathBuf) -> Self {
        Self {
            command,
            status_file,
            child: Mutex::new(None),
        }
    }

    /// Spawn the helper. Rejected with `AlreadyRunning` while a previous
    /// helper is still alive; a helper that exited on its own is reaped
    /// here and replaced.
    pub async fn start(&self) -> Result<(), VoiceError> {
        let mut slot = self.child.lock().await;
        if let Some(child) = slot.as_mut() {
            match child.try_wait() {
                Ok(Some(_)) => *slot = None,
                Ok(None) => return Err(VoiceError::AlreadyRunning),
                Err(e) => return Err(VoiceError::Spawn(e.to_string())),
            }
        }
        let (program, args) = self
            .command
            .split_first()
            .ok_or(VoiceError::NotConfigured)?;

        // Stale status from an earlier run must not leak into this one.
        let _ = fs::remove_file(&self.status_file).await;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .env("CUBBY_VOICE_STATUS", &self.status_file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| VoiceError::Spawn(e.to_string()))?;
        tracing::info!(helper = %program, "voice helper started");
        *slot = Some(child);
        Ok(())
    }

    /// Kill the helper if it is running. Idempotent.
    pub async fn stop(&self) {
        let mut slot = self.child.lock().await;
        if let Some(mut child) = slot.take() {
            let _ = child.kill().await;
            tracing::info!("voice helper stopped");
        }
    }

    /// Read the helper's status file. A missing file reads as empty and
    /// not completed.
    pub async fn status(&self) -> VoiceStatus {
        match fs::read_to_string(&self.status_file).await {
            Ok(text) => {
                let completed = text.lines().any(|line| line.trim() == COMPLETED_MARKER);
                VoiceStatus { text, completed }
            }
            Err(_) => VoiceStatus {
                text: String::new(),
                completed: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::Path;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_status_file() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        env::temp_dir().join(format!(
            "cubby-voice-{}-{}.txt",
            std::process::id(),
            id
        ))
    }

    async fn wait_until<F: Fn() -> bool>(cond: F) -> bool {
        for _ in 0..100 {
            if cond() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    async fn cleanup(path: &Path) {
        let _ = fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn test_unconfigured_helper_cannot_start() {
        let voice = VoiceControl::new(vec![], temp_status_file());
        assert_eq!(voice.start().await, Err(VoiceError::NotConfigured));
    }

    #[tokio::test]
    async fn test_missing_status_file_reads_as_pending() {
        let voice = VoiceControl::new(vec![], temp_status_file());
        let status = voice.status().await;
        assert_eq!(status.text, "");
        assert!(!status.completed);
    }

    #[tokio::test]
    async fn test_helper_writes_status_through_env_path() {
        let status_file = temp_status_file();
        let voice = VoiceControl::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "printf 'Command completed' > \"$CUBBY_VOICE_STATUS\"".to_string(),
            ],
            status_file.clone(),
        );

        voice.start().await.unwrap();
        let written = wait_until(|| status_file.exists()).await;
        assert!(written, "helper never wrote its status file");

        let status = voice.status().await;
        assert_eq!(status.text, "Command completed");
        assert!(status.completed);

        voice.stop().await;
        cleanup(&status_file).await;
    }

    #[tokio::test]
    async fn test_second_start_conflicts_until_stopped() {
        let status_file = temp_status_file();
        let voice = VoiceControl::new(
            vec!["sleep".to_string(), "30".to_string()],
            status_file.clone(),
        );

        voice.start().await.unwrap();
        assert_eq!(voice.start().await, Err(VoiceError::AlreadyRunning));

        voice.stop().await;
        voice.start().await.unwrap();
        voice.stop().await;
        cleanup(&status_file).await;
    }

    #[tokio::test]
    async fn test_exited_helper_is_reaped_on_next_start() {
        let status_file = temp_status_file();
        let voice = VoiceControl::new(vec!["true".to_string()], status_file.clone());

        voice.start().await.unwrap();
        // The helper exits immediately; a restart must succeed once it has.
        let mut restarted = false;
        for _ in 0..100 {
            match voice.start().await {
                Ok(()) => {
                    restarted = true;
                    break;
                }
                Err(VoiceError::AlreadyRunning) => {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert!(restarted, "exited helper was never reaped");

        voice.stop().await;
        cleanup(&status_file).await;
    }
}
