//! Application state and main event loop
//!
//! This module contains the central application state and the main event loop
//! that ties together the timer store, the countdown engine, the display
//! surface, and the terminal UI.

// Submodules
mod input_mode;
mod state;
mod view;

// Re-exports from submodules
pub use input_mode::InputMode;
pub use state::{AppState, TimerField};
pub use view::View;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, MouseEvent, MouseEventKind};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::branding::AssetStore;
use crate::config::{self, Config};
use crate::logging::{LogBuffer, LogFileInfo};
use crate::presentation::compose;
use crate::surface::backend::ProcessBackend;
use crate::surface::{DisplaySurfaceManager, SurfaceSettings, SurfaceStyle};
use crate::timer::engine::{CountdownEngine, TickEvent};
use crate::timer::store::{ListenerId, TimerStore};
use crate::timer::{BrandingSlot, TimerPatch, ValidationError};
use crate::tui::views::{render_control_panel, render_log_viewer};
use crate::tui::Tui;

/// Main application struct
pub struct App {
    /// Application state
    pub(crate) state: AppState,
    /// Timer state owner; every timer mutation goes through here
    pub(crate) store: TimerStore,
    /// Countdown driver
    engine: CountdownEngine,
    /// Tick events sent by the engine's sleep task
    tick_rx: UnboundedReceiver<TickEvent>,
    /// Display window lifecycle
    surface: DisplaySurfaceManager,
    /// Style document injected into each opened display window
    style: SurfaceStyle,
    /// Staged branding files
    assets: AssetStore,
    /// Store subscription that mirrors every change to the display
    projection_listener: ListenerId,
    /// Terminal UI
    tui: Tui,
    /// Log buffer for real-time log viewing
    pub(crate) log_buffer: Arc<LogBuffer>,
    /// Information about the current log file
    log_file_info: LogFileInfo,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, log_buffer: Arc<LogBuffer>, log_file_info: LogFileInfo) -> Result<Self> {
        let mut store = TimerStore::new();
        let (engine, tick_rx) = CountdownEngine::new();

        let backend = ProcessBackend::new(config.display_terminal.clone());
        let surface = DisplaySurfaceManager::new(
            Box::new(backend),
            SurfaceSettings {
                title: config.display_title.clone(),
                cols: config.display_cols,
                rows: config.display_rows,
                socket_dir: config::run_dir(),
            },
        );

        // Mirror every store change to the display window. The projector is
        // a no-op while no window is open, so the subscription can outlive
        // any individual window.
        let projector = surface.projector();
        let projection_listener = store.subscribe(move |timer| {
            projector.project(&compose(timer));
        });

        let tui = Tui::new()?;

        Ok(Self {
            state: AppState::default(),
            store,
            engine,
            tick_rx,
            surface,
            style: SurfaceStyle::default(),
            assets: AssetStore::new(),
            projection_listener,
            tui,
            log_buffer,
            log_file_info,
        })
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        // Enter TUI mode
        self.tui.enter()?;

        tracing::info!("Podium started. Press Space to start the countdown, 'q' to quit.");

        // Main event loop
        let result = self.event_loop().await;

        // Stop the countdown and close the display window before the
        // terminal is restored, so nothing outlives the app.
        self.engine.shutdown();
        self.store.unsubscribe(self.projection_listener);
        self.surface.shutdown();

        // Exit TUI mode (also done in Drop, but explicit is clearer)
        self.tui.exit()?;

        result
    }

    /// Main event loop
    async fn event_loop(&mut self) -> Result<()> {
        let tick_rate = Duration::from_millis(16); // ~60fps for smooth rendering

        // Always render on first frame
        self.state.needs_render = true;

        loop {
            // Only render when something has changed
            if self.state.needs_render {
                self.render()?;
                self.state.needs_render = false;
            }

            // Poll for events with timeout
            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => {
                        crate::input::dispatcher::handle_key_event(self, key)?;
                        self.state.needs_render = true;
                    }
                    Event::Resize(_, _) => {
                        // Debounce resize events; rendering happens right
                        // away, the settle log entry waits for the burst to
                        // end so a window drag does not flood the buffer.
                        self.state.last_resize = Some(Instant::now());
                        self.state.pending_resize = true;
                        self.state.needs_render = true;
                    }
                    Event::Mouse(mouse) => {
                        if self.handle_mouse_event(mouse) {
                            self.state.needs_render = true;
                        }
                    }
                    _ => {}
                }
            }

            // Apply countdown ticks queued by the engine
            if self.process_tick_events() {
                self.state.needs_render = true;
            }

            // Reconcile the engine with the store after whatever this
            // iteration changed
            self.engine.sync(self.store.state());

            // Notice a display window the user closed from its own side
            if self.surface.reap() {
                self.state.header_notifications.push("Display window closed");
                self.state.needs_render = true;
            }

            // Process debounced resize: wait 50ms after the last resize event
            if self.state.pending_resize {
                if let Some(last_resize) = self.state.last_resize {
                    if last_resize.elapsed() >= Duration::from_millis(50) {
                        self.state.pending_resize = false;
                        let size = self.tui.size()?;
                        tracing::debug!("Terminal resized to {}x{}", size.width, size.height);
                    }
                }
            }

            // Log entries arrive outside the input path; keep the viewer live
            if self.state.view == View::LogViewer {
                self.state.needs_render = true;
            }

            // Tick header notifications (remove expired)
            self.state.header_notifications.tick();

            // Check if we should quit
            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain and apply tick events from the engine's channel
    ///
    /// Returns true if any tick was applied.
    fn process_tick_events(&mut self) -> bool {
        let was_running = self.store.state().is_running;
        let mut applied = false;
        while let Ok(event) = self.tick_rx.try_recv() {
            if self.engine.handle_tick(&mut self.store, event) {
                applied = true;
            }
        }
        if applied && was_running && !self.store.state().is_running {
            // The countdown reached zero during this drain
            self.state.header_notifications.push("Countdown complete");
        }
        applied
    }

    /// Handle a mouse event
    ///
    /// Returns true if the event caused a state change requiring re-render.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> bool {
        // Scroll wheel only matters in the log viewer
        if self.state.view != View::LogViewer {
            return false;
        }
        let entry_count = self.log_buffer.len();
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.state.log_viewer_auto_scroll = false;
                self.state.log_viewer_scroll = self.state.log_viewer_scroll.saturating_sub(3);
                true
            }
            MouseEventKind::ScrollDown => {
                self.state.log_viewer_auto_scroll = false;
                self.state.log_viewer_scroll = (self.state.log_viewer_scroll + 3)
                    .min(entry_count.saturating_sub(1));
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Timer Commands
    // ========================================================================

    /// Start the countdown if paused, pause it if running
    ///
    /// Starting with no time set leaves the timer paused and puts a warning
    /// next to the duration fields.
    pub(crate) fn toggle_timer(&mut self) {
        if self.store.state().is_running {
            self.store.pause();
        } else {
            match self.store.start() {
                Ok(()) => self.state.validation_message = None,
                Err(ValidationError::EmptyDuration) => {
                    self.state.validation_message =
                        Some("Time must be set before starting the timer!".to_string());
                }
            }
        }
        self.engine.sync(self.store.state());
    }

    /// Stop the countdown and clear the remaining time
    pub(crate) fn reset_timer(&mut self) {
        self.store.reset();
        self.engine.sync(self.store.state());
        self.state.validation_message = None;
    }

    /// Commit the edit buffer into the focused duration field
    pub(crate) fn commit_time_edit(&mut self) {
        let (field, value) = self.state.take_edit();
        let patch = match field {
            TimerField::Hours => TimerPatch::hours(value),
            TimerField::Minutes => TimerPatch::minutes(value),
            TimerField::Seconds => TimerPatch::seconds(value),
        };
        self.store.set_time(patch);
        // Editing the duration addresses whatever the warning complained about
        self.state.validation_message = None;
    }

    // ========================================================================
    // Display Commands
    // ========================================================================

    /// Open the display window
    ///
    /// Failure is non-fatal: the control panel keeps working and the user
    /// can try again.
    pub(crate) fn open_display(&mut self) {
        match self.surface.open(&self.style) {
            Ok(_) => {
                // The style is in; seed the window with the current frame
                // instead of leaving it blank until the next store change.
                self.surface.project(&compose(self.store.state()));
            }
            Err(e) => {
                tracing::warn!("Display open failed: {}", e);
                self.state.header_notifications.push("Display window unavailable");
            }
        }
    }

    /// Close the display window if one is open
    pub(crate) fn close_display(&mut self) {
        if let Some(handle) = self.surface.handle() {
            self.surface.close(handle);
        }
    }

    // ========================================================================
    // Branding Commands
    // ========================================================================

    /// Stage the file at `raw_path` and bind it to a branding slot
    pub(crate) fn set_logo(&mut self, slot: BrandingSlot, raw_path: &str) {
        let expanded = shellexpand::tilde(raw_path).to_string();
        match self.assets.stage(Path::new(&expanded)) {
            Ok(asset) => {
                let name = asset.name.clone();
                if let Some(displaced) = self.store.set_branding(slot, Some(asset)) {
                    self.assets.revoke(&displaced);
                }
                self.state
                    .header_notifications
                    .push(format!("{} set to {}", slot.display_name(), name));
            }
            Err(e) => {
                tracing::warn!("Could not stage logo {}: {}", expanded, e);
                self.state
                    .header_notifications
                    .push(format!("Could not load logo: {e}"));
            }
        }
    }

    /// Clear a branding slot and revoke its staged file
    pub(crate) fn remove_logo(&mut self, slot: BrandingSlot) {
        if let Some(removed) = self.store.set_branding(slot, None) {
            self.assets.revoke(&removed);
            self.state
                .header_notifications
                .push(format!("{} removed", slot.display_name()));
        }
    }

    // ========================================================================
    // Quit Commands
    // ========================================================================

    /// Ask for quit confirmation
    pub(crate) fn request_quit(&mut self) {
        self.state.input_mode = InputMode::ConfirmingQuit;
    }

    /// Quit confirmed: leave the event loop
    pub(crate) fn confirm_quit(&mut self) {
        self.state.input_mode = InputMode::Normal;
        self.state.should_quit = true;
    }

    // ========================================================================
    // Input Handlers (called by input::dispatcher)
    // ========================================================================

    /// Handle key in normal mode
    pub(crate) fn handle_normal_mode_key(&mut self, key: KeyEvent) -> Result<()> {
        use crate::input::normal;
        match self.state.view {
            View::Control => normal::handle_control_key(self, key),
            View::LogViewer => normal::handle_log_viewer_key(self, key),
        }
    }

    /// Render the current state
    fn render(&mut self) -> Result<()> {
        let state = &self.state;
        let timer = self.store.state();
        let display_open = self.surface.is_open();
        let style = &self.style;
        let log_buffer = &self.log_buffer;
        let log_file_info = &self.log_file_info;

        self.tui.draw(|frame| {
            let area = frame.size();

            match state.view {
                View::Control => {
                    // The control panel renders its own dialog overlays
                    render_control_panel(frame, area, state, timer, display_open, style);
                }
                View::LogViewer => {
                    render_log_viewer(
                        frame,
                        area,
                        log_buffer,
                        log_file_info,
                        state.log_viewer_scroll,
                        state.log_viewer_auto_scroll,
                        timer,
                        &state.header_notifications,
                    );
                }
            }
        })?;

        Ok(())
    }
}
