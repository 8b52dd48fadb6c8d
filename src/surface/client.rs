//! Display client process
//!
//! Runs inside the spawned terminal window. Connects back to the control
//! process over the display socket, applies the injected style, and renders
//! each received frame fullscreen with the same draw code the control
//! panel's preview uses. Exits on `Close`, on socket EOF (the control
//! process went away), or when the user presses `q`/Esc in the window.

use std::io::{ErrorKind, Read};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::presentation::DisplayFrame;
use crate::tui::views::render_display;
use crate::tui::Tui;

use super::protocol::{LineAssembler, SurfaceMessage, SurfaceStyle};

const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Connect to the control process and mirror its frames until told to stop
pub fn run(socket_path: &Path) -> Result<()> {
    tracing::info!("Display client connecting to {}", socket_path.display());
    let mut stream = UnixStream::connect(socket_path)
        .with_context(|| format!("Failed to connect to {}", socket_path.display()))?;
    stream
        .set_nonblocking(true)
        .context("Failed to configure display socket")?;

    let mut tui = Tui::new()?;
    tui.enter()?;
    let result = event_loop(&mut tui, &mut stream);
    tui.exit()?;
    tracing::info!("Display client exiting");
    result
}

fn event_loop(tui: &mut Tui, stream: &mut UnixStream) -> Result<()> {
    let mut style = SurfaceStyle::default();
    let mut current: Option<DisplayFrame> = None;
    let mut assembler = LineAssembler::new();
    let mut needs_render = true;
    let mut buf = [0u8; 4096];

    loop {
        if needs_render {
            tui.draw(|frame| {
                render_display(frame, frame.size(), current.as_ref(), &style);
            })?;
            needs_render = false;
        }

        if event::poll(POLL_TIMEOUT)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => {}
                },
                Event::Resize(_, _) => needs_render = true,
                _ => {}
            }
        }

        // Drain whatever the control process has sent since last iteration.
        loop {
            match stream.read(&mut buf) {
                Ok(0) => {
                    tracing::info!("Control process closed the socket");
                    return Ok(());
                }
                Ok(n) => {
                    for line in assembler.push(&buf[..n]) {
                        match SurfaceMessage::parse_line(&line) {
                            Ok(SurfaceMessage::Style(new_style)) => {
                                style = new_style;
                                needs_render = true;
                            }
                            Ok(SurfaceMessage::Frame(frame)) => {
                                current = Some(frame);
                                needs_render = true;
                            }
                            Ok(SurfaceMessage::Close) => {
                                tracing::info!("Close received from control process");
                                return Ok(());
                            }
                            Err(e) => tracing::warn!("Ignoring bad display message: {e}"),
                        }
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    tracing::warn!("Display socket error: {e}");
                    return Ok(());
                }
            }
        }
    }
}
