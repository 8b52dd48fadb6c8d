//! Secondary display window lifecycle
//!
//! This module provides:
//! - `DisplaySurfaceManager`: owns at most one live display window
//! - `SurfaceHandle`: opaque reference to the live window
//! - `Projector`: cheap shared handle for pushing frames from listeners
//! - The socket protocol and window backends in submodules
//!
//! Opening a surface injects the style document exactly once before any
//! frame. Closing is idempotent, works on stale handles, and happens
//! implicitly at teardown so no window outlives the app.

pub mod backend;
pub mod client;
pub mod protocol;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use uuid::Uuid;

use crate::presentation::DisplayFrame;

use backend::{SurfaceBackend, SurfaceWindow, WindowRequest};
use protocol::SurfaceMessage;

pub use protocol::SurfaceStyle;

/// Errors from display window operations
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The environment refused to produce a window; non-fatal, retryable
    #[error("display window unavailable: {0}")]
    Unavailable(String),
}

/// Opaque reference to a live display window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceHandle {
    id: Uuid,
}

/// Fixed parameters for opened windows
#[derive(Debug, Clone)]
pub struct SurfaceSettings {
    pub title: String,
    pub cols: u16,
    pub rows: u16,
    /// Directory display sockets are created in
    pub socket_dir: PathBuf,
}

struct ActiveSurface {
    handle: SurfaceHandle,
    window: Box<dyn SurfaceWindow>,
}

type SharedSurface = Arc<Mutex<Option<ActiveSurface>>>;

/// Owns the display window lifecycle
pub struct DisplaySurfaceManager {
    backend: Box<dyn SurfaceBackend>,
    settings: SurfaceSettings,
    active: SharedSurface,
}

impl DisplaySurfaceManager {
    pub fn new(backend: Box<dyn SurfaceBackend>, settings: SurfaceSettings) -> Self {
        Self {
            backend,
            settings,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Open the display window, injecting `style` once before any frame
    ///
    /// If a healthy window is already open its handle is returned unchanged
    /// (reopening focuses attention on the same window rather than stacking
    /// new ones). A dead window is cleaned up and replaced.
    pub fn open(&mut self, style: &SurfaceStyle) -> Result<SurfaceHandle, SurfaceError> {
        let Ok(mut active) = self.active.lock() else {
            return Err(SurfaceError::Unavailable(
                "surface state lock poisoned".to_string(),
            ));
        };

        if let Some(surface) = active.as_mut() {
            if surface.window.is_alive() {
                tracing::debug!("Display already open, reusing handle");
                return Ok(surface.handle);
            }
            tracing::info!("Display window died, reopening");
            if let Some(mut dead) = active.take() {
                dead.window.close();
            }
        }

        let request = WindowRequest {
            title: self.settings.title.clone(),
            cols: self.settings.cols,
            rows: self.settings.rows,
            socket_path: self
                .settings
                .socket_dir
                .join(format!("display-{}.sock", Uuid::new_v4())),
        };

        let mut window = self.backend.open_window(&request)?;
        if let Err(e) = window.send(&SurfaceMessage::Style(style.clone())) {
            window.close();
            return Err(SurfaceError::Unavailable(format!(
                "style injection failed: {e}"
            )));
        }

        let handle = SurfaceHandle { id: Uuid::new_v4() };
        tracing::info!("Display surface opened");
        *active = Some(ActiveSurface { handle, window });
        Ok(handle)
    }

    /// Close the window behind a handle
    ///
    /// Idempotent: a handle that is already closed, stale, or from an
    /// earlier window does nothing.
    pub fn close(&mut self, handle: SurfaceHandle) {
        let Ok(mut active) = self.active.lock() else {
            return;
        };
        let matches = active
            .as_ref()
            .map(|surface| surface.handle == handle)
            .unwrap_or(false);
        if !matches {
            return;
        }
        if let Some(mut surface) = active.take() {
            surface.window.close();
            tracing::info!("Display surface closed");
        }
    }

    /// Push a frame to the live window; no-op when none is open
    pub fn project(&self, frame: &DisplayFrame) {
        project_shared(&self.active, frame);
    }

    /// Shared projection handle for store listeners
    pub fn projector(&self) -> Projector {
        Projector {
            active: Arc::clone(&self.active),
        }
    }

    /// Handle of the live window, if any
    pub fn handle(&self) -> Option<SurfaceHandle> {
        self.active
            .lock()
            .ok()
            .and_then(|active| active.as_ref().map(|s| s.handle))
    }

    /// Whether a window is currently open
    pub fn is_open(&self) -> bool {
        self.active
            .lock()
            .map(|active| active.is_some())
            .unwrap_or(false)
    }

    /// Drop a window whose other end has gone away
    ///
    /// Returns true when a dead window was cleaned up, so the caller can
    /// tell the user the display disappeared.
    pub fn reap(&mut self) -> bool {
        let Ok(mut active) = self.active.lock() else {
            return false;
        };
        let dead = active
            .as_mut()
            .map(|surface| !surface.window.is_alive())
            .unwrap_or(false);
        if dead {
            if let Some(mut surface) = active.take() {
                surface.window.close();
            }
            tracing::info!("Display window was closed from the outside");
        }
        dead
    }

    /// Close whatever is open; part of app teardown
    pub fn shutdown(&mut self) {
        if let Ok(mut active) = self.active.lock() {
            if let Some(mut surface) = active.take() {
                surface.window.close();
                tracing::info!("Display surface closed at shutdown");
            }
        }
    }
}

impl Drop for DisplaySurfaceManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cheap clonable frame sink for the store's notification path
#[derive(Clone)]
pub struct Projector {
    active: SharedSurface,
}

impl Projector {
    /// Push a frame to the live window; no-op when none is open
    pub fn project(&self, frame: &DisplayFrame) {
        project_shared(&self.active, frame);
    }
}

fn project_shared(active: &SharedSurface, frame: &DisplayFrame) {
    let Ok(mut active) = active.lock() else {
        return;
    };
    if let Some(surface) = active.as_mut() {
        if let Err(e) = surface.window.send(&SurfaceMessage::Frame(frame.clone())) {
            // The window marks itself dead; the app's reap pass will clean
            // up and tell the user.
            tracing::warn!("Dropping frame for dead display: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::MemoryBackend;

    fn test_settings() -> SurfaceSettings {
        SurfaceSettings {
            title: "Timer Display".to_string(),
            cols: 100,
            rows: 30,
            socket_dir: PathBuf::from("/tmp"),
        }
    }

    fn test_manager() -> (DisplaySurfaceManager, MemoryBackend) {
        let backend = MemoryBackend::new();
        let manager =
            DisplaySurfaceManager::new(Box::new(backend.clone()), test_settings());
        (manager, backend)
    }

    fn frame(seconds: u8) -> DisplayFrame {
        DisplayFrame {
            headline: format!("{seconds} seconds remaining"),
            precise: format!("00:00:{seconds:02}"),
            org_logo: None,
            event_logo: None,
        }
    }

    #[test]
    fn test_open_injects_style_once_before_frames() {
        let (mut manager, backend) = test_manager();
        manager.open(&SurfaceStyle::default()).unwrap();

        manager.project(&frame(5));
        manager.project(&frame(4));

        let messages = backend.messages(0);
        assert!(matches!(messages[0], SurfaceMessage::Style(_)));
        let styles = messages
            .iter()
            .filter(|m| matches!(m, SurfaceMessage::Style(_)))
            .count();
        assert_eq!(styles, 1);
        let frames = messages
            .iter()
            .filter(|m| matches!(m, SurfaceMessage::Frame(_)))
            .count();
        assert_eq!(frames, 2);
    }

    #[test]
    fn test_project_without_surface_is_noop() {
        let (manager, backend) = test_manager();
        manager.project(&frame(9));
        assert_eq!(backend.window_count(), 0);
    }

    #[test]
    fn test_close_stops_writes_and_is_idempotent() {
        let (mut manager, backend) = test_manager();
        let handle = manager.open(&SurfaceStyle::default()).unwrap();
        manager.project(&frame(5));

        manager.close(handle);
        assert!(!manager.is_open());
        let before = backend.messages(0).len();

        manager.project(&frame(4));
        manager.close(handle);
        assert_eq!(backend.messages(0).len(), before, "no writes after close");
        assert!(!backend.is_open(0));
    }

    #[test]
    fn test_stale_handle_does_not_close_a_newer_window() {
        let (mut manager, backend) = test_manager();
        let old = manager.open(&SurfaceStyle::default()).unwrap();
        manager.close(old);

        let new = manager.open(&SurfaceStyle::default()).unwrap();
        assert_ne!(old, new);

        manager.close(old);
        assert!(manager.is_open());
        assert!(backend.is_open(1));
    }

    #[test]
    fn test_open_reuses_a_healthy_window() {
        let (mut manager, backend) = test_manager();
        let first = manager.open(&SurfaceStyle::default()).unwrap();
        let second = manager.open(&SurfaceStyle::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(backend.window_count(), 1);
    }

    #[test]
    fn test_open_replaces_a_dead_window() {
        let (mut manager, backend) = test_manager();
        let first = manager.open(&SurfaceStyle::default()).unwrap();
        backend.kill(0);

        let second = manager.open(&SurfaceStyle::default()).unwrap();
        assert_ne!(first, second);
        assert_eq!(backend.window_count(), 2);
    }

    #[test]
    fn test_refusal_is_retryable() {
        let (mut manager, backend) = test_manager();
        backend.set_refuse(true);
        assert!(matches!(
            manager.open(&SurfaceStyle::default()),
            Err(SurfaceError::Unavailable(_))
        ));
        assert!(!manager.is_open());

        backend.set_refuse(false);
        assert!(manager.open(&SurfaceStyle::default()).is_ok());
    }

    #[test]
    fn test_projector_shares_the_live_window() {
        let (mut manager, backend) = test_manager();
        let projector = manager.projector();

        projector.project(&frame(8));
        assert_eq!(backend.window_count(), 0, "nothing before open");

        let handle = manager.open(&SurfaceStyle::default()).unwrap();
        projector.project(&frame(7));
        assert_eq!(backend.messages(0).len(), 2); // style + frame

        manager.close(handle);
        projector.project(&frame(6));
        assert_eq!(backend.messages(0).len(), 2, "projector respects close");
    }

    #[test]
    fn test_reap_reports_an_outside_close() {
        let (mut manager, backend) = test_manager();
        manager.open(&SurfaceStyle::default()).unwrap();

        assert!(!manager.reap());
        backend.kill(0);
        assert!(manager.reap());
        assert!(!manager.is_open());
        assert!(!manager.reap(), "second reap finds nothing");
    }

    #[test]
    fn test_shutdown_closes_implicitly() {
        let (mut manager, backend) = test_manager();
        manager.open(&SurfaceStyle::default()).unwrap();
        manager.shutdown();
        assert!(!backend.is_open(0));
        assert!(!manager.is_open());
    }

    #[test]
    fn test_drop_closes_implicitly() {
        let (mut manager, backend) = test_manager();
        manager.open(&SurfaceStyle::default()).unwrap();
        drop(manager);
        assert!(!backend.is_open(0));
    }
}
