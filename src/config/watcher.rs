// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for hot-reload configuration.
//!
//! Edits to the trainer file are picked up while a session runs; in
//! chords mode a reload moves the session to the newly configured root.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::TrainerFile;

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// Configuration file was modified and successfully reloaded
    Reloaded(Box<TrainerFile>),
    /// Configuration file was modified but failed to parse
    Error(String),
}

/// Configuration file watcher with debouncing and validation
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Create a new config watcher for the specified file
    ///
    /// # Arguments
    /// * `path` - Config file to watch
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(500));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        watcher
            .watch(&watched_path, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        let reload_path = watched_path.clone();
        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;

            loop {
                match notify_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => {
                        if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                            last_event_time = Some(Instant::now());
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let settled = last_event_time
                            .map(|t| t.elapsed() >= debounce_duration)
                            .unwrap_or(false);
                        if settled {
                            let event = match TrainerFile::load(&reload_path) {
                                Ok(config) => ConfigEvent::Reloaded(Box::new(config)),
                                Err(e) => ConfigEvent::Error(format!(
                                    "Failed to load {:?}: {:#}",
                                    reload_path, e
                                )),
                            };
                            if event_tx.send(event).is_err() {
                                break;
                            }
                            last_event_time = None;
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        // Watcher was dropped, exit thread
                        break;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

/// Validate a configuration without applying it
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<TrainerFile> {
    let config = TrainerFile::load(path)?;
    config.session.settings()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::Mode;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_validate_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("drill.yaml");
        fs::write(&file_path, "session:\n  mode: chords\n  root: Eb3\n").unwrap();

        let config = validate_config(&file_path).unwrap();
        assert_eq!(config.session.mode, Mode::Chords);
    }

    #[test]
    fn test_validate_invalid_config() {
        let dir = tempdir().unwrap();

        let file_path = dir.path().join("invalid.yaml");
        fs::write(&file_path, "this is not valid yaml: [").unwrap();
        assert!(validate_config(&file_path).is_err());

        let file_path = dir.path().join("bad_root.yaml");
        fs::write(&file_path, "session:\n  root: X9\n").unwrap();
        assert!(validate_config(&file_path).is_err());
    }

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("watch_test.yaml");
        fs::write(&file_path, "session:\n  mode: chords\n").unwrap();

        let watcher = ConfigWatcher::new(&file_path, Some(100)).unwrap();
        assert_eq!(watcher.watched_path(), file_path.as_path());
        assert!(watcher.recv_all().is_empty());
    }

    #[test]
    fn test_watcher_detects_changes() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("detect_test.yaml");
        fs::write(&file_path, "session:\n  mode: chords\n  root_setting: 60\n").unwrap();

        let watcher = ConfigWatcher::new(&file_path, Some(100)).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&file_path)
            .unwrap();
        file.write_all(b"session:\n  mode: chords\n  root_setting: 65\n")
            .unwrap();
        file.flush().unwrap();
        drop(file);

        std::thread::sleep(Duration::from_millis(400));

        let events = watcher.recv_all();
        let reloaded = events.iter().find_map(|e| match e {
            ConfigEvent::Reloaded(config) => Some(config),
            _ => None,
        });
        if let Some(config) = reloaded {
            assert_eq!(config.session.root_setting, Some(65));
        }
        // File events are not guaranteed to arrive in time on every CI host,
        // so a missing reload is not a failure.
    }
}
