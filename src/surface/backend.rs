//! Display window backends
//!
//! Window creation sits behind the object-safe `SurfaceBackend` trait.
//! `ProcessBackend` opens a real OS window by spawning a terminal emulator
//! that runs this binary in display-client mode and connects back over a
//! Unix socket. `MemoryBackend` records every message in memory and is what
//! the tests (and headless environments) use.

use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use super::protocol::SurfaceMessage;
use super::SurfaceError;

/// How long the display client gets to connect after its window is spawned
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// Terminal emulators tried in order when none is configured
const TERMINAL_CANDIDATES: &[&str] = &[
    "x-terminal-emulator",
    "gnome-terminal",
    "konsole",
    "alacritty",
    "kitty",
    "xterm",
];

/// Parameters for one window-open request
#[derive(Debug, Clone)]
pub struct WindowRequest {
    /// Window title
    pub title: String,
    /// Window width in terminal cells
    pub cols: u16,
    /// Window height in terminal cells
    pub rows: u16,
    /// Socket the display client connects back on
    pub socket_path: PathBuf,
}

/// A live display window connection
pub trait SurfaceWindow: Send {
    /// Write one protocol message to the window's mount point
    fn send(&mut self, message: &SurfaceMessage) -> Result<()>;

    /// Whether the other end is still there
    fn is_alive(&mut self) -> bool;

    /// Tear the window down; safe to call more than once
    fn close(&mut self);
}

/// Creates display windows
///
/// Object-safe so the manager can hold `Box<dyn SurfaceBackend>`.
pub trait SurfaceBackend: Send {
    fn open_window(
        &mut self,
        request: &WindowRequest,
    ) -> Result<Box<dyn SurfaceWindow>, SurfaceError>;
}

// ---------------------------------------------------------------------------
// Process backend
// ---------------------------------------------------------------------------

/// Opens a real window by spawning a terminal emulator
pub struct ProcessBackend {
    terminal_override: Option<String>,
}

impl ProcessBackend {
    pub fn new(terminal_override: Option<String>) -> Self {
        Self { terminal_override }
    }

    fn candidates(&self) -> Vec<String> {
        if let Some(term) = &self.terminal_override {
            return vec![term.clone()];
        }
        let mut list = Vec::new();
        if let Ok(term) = std::env::var("TERMINAL") {
            if !term.is_empty() {
                list.push(term);
            }
        }
        list.extend(TERMINAL_CANDIDATES.iter().map(|s| s.to_string()));
        list
    }
}

impl SurfaceBackend for ProcessBackend {
    fn open_window(
        &mut self,
        request: &WindowRequest,
    ) -> Result<Box<dyn SurfaceWindow>, SurfaceError> {
        let exe = std::env::current_exe()
            .map_err(|e| SurfaceError::Unavailable(format!("cannot resolve own binary: {e}")))?;

        // A stale socket from a crashed run would make bind fail.
        let _ = std::fs::remove_file(&request.socket_path);
        let listener = UnixListener::bind(&request.socket_path)
            .map_err(|e| SurfaceError::Unavailable(format!("cannot bind display socket: {e}")))?;
        listener.set_nonblocking(true).map_err(|e| {
            SurfaceError::Unavailable(format!("cannot configure display socket: {e}"))
        })?;

        for terminal in self.candidates() {
            let mut command = display_command(&terminal, request, &exe);
            let mut child = match command.spawn() {
                Ok(child) => child,
                Err(e) => {
                    tracing::debug!("Terminal {} not usable: {}", terminal, e);
                    continue;
                }
            };

            match wait_for_client(&listener, &mut child) {
                ClientWait::Connected(stream) => {
                    tracing::info!("Display window opened via {}", terminal);
                    return Ok(Box::new(ProcessWindow {
                        child,
                        stream,
                        socket_path: request.socket_path.clone(),
                        dead: false,
                    }));
                }
                ClientWait::ChildFailed(status) => {
                    tracing::debug!("Terminal {} exited with {} before connecting", terminal, status);
                    continue;
                }
                ClientWait::TimedOut => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = std::fs::remove_file(&request.socket_path);
                    return Err(SurfaceError::Unavailable(
                        "display client did not connect in time".to_string(),
                    ));
                }
                ClientWait::SocketError(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = std::fs::remove_file(&request.socket_path);
                    return Err(SurfaceError::Unavailable(format!("display socket error: {e}")));
                }
            }
        }

        let _ = std::fs::remove_file(&request.socket_path);
        Err(SurfaceError::Unavailable(
            "no terminal emulator available for the display window".to_string(),
        ))
    }
}

enum ClientWait {
    Connected(UnixStream),
    ChildFailed(std::process::ExitStatus),
    TimedOut,
    SocketError(std::io::Error),
}

fn wait_for_client(listener: &UnixListener, child: &mut Child) -> ClientWait {
    let deadline = Instant::now() + CONNECT_TIMEOUT;
    loop {
        match listener.accept() {
            Ok((stream, _)) => return ClientWait::Connected(stream),
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                // A nonzero early exit means this emulator is broken; a zero
                // exit is normal for terminals that daemonize, so keep
                // waiting for the client in that case.
                if let Ok(Some(status)) = child.try_wait() {
                    if !status.success() {
                        return ClientWait::ChildFailed(status);
                    }
                }
                if Instant::now() >= deadline {
                    return ClientWait::TimedOut;
                }
                std::thread::sleep(ACCEPT_POLL);
            }
            Err(e) => return ClientWait::SocketError(e),
        }
    }
}

/// Build the emulator invocation for one candidate
///
/// Argument shapes differ per emulator; anything unrecognized gets the
/// xterm-style flags, which `x-terminal-emulator` also accepts.
fn display_command(terminal: &str, request: &WindowRequest, exe: &Path) -> Command {
    let mut command = Command::new(terminal);
    let base = Path::new(terminal)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let geometry = format!("{}x{}", request.cols, request.rows);

    match base.as_str() {
        "gnome-terminal" => {
            command
                .arg("--title")
                .arg(&request.title)
                .arg(format!("--geometry={geometry}"))
                .arg("--");
        }
        "konsole" => {
            command
                .arg("-p")
                .arg(format!("tabtitle={}", request.title))
                .arg("-e");
        }
        "alacritty" => {
            command
                .arg("-T")
                .arg(&request.title)
                .arg("-o")
                .arg(format!("window.dimensions.columns={}", request.cols))
                .arg("-o")
                .arg(format!("window.dimensions.lines={}", request.rows))
                .arg("-e");
        }
        "kitty" => {
            command
                .arg("--title")
                .arg(&request.title)
                .arg("-o")
                .arg("remember_window_size=no")
                .arg("-o")
                .arg(format!("initial_window_width={}c", request.cols))
                .arg("-o")
                .arg(format!("initial_window_height={}c", request.rows));
        }
        _ => {
            command
                .arg("-T")
                .arg(&request.title)
                .arg("-geometry")
                .arg(&geometry)
                .arg("-e");
        }
    }

    command
        .arg(exe)
        .arg("--display-client")
        .arg(&request.socket_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

struct ProcessWindow {
    child: Child,
    stream: UnixStream,
    socket_path: PathBuf,
    dead: bool,
}

impl SurfaceWindow for ProcessWindow {
    fn send(&mut self, message: &SurfaceMessage) -> Result<()> {
        if self.dead {
            return Err(anyhow!("display connection is gone"));
        }
        let line = message.encode_line()?;
        if let Err(e) = self.stream.write_all(line.as_bytes()) {
            self.dead = true;
            return Err(anyhow!("display write failed: {e}"));
        }
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        if self.dead {
            return false;
        }
        // The client never writes, so the only readable things are stray
        // bytes or EOF. EOF means the window is gone.
        let mut probe = [0u8; 32];
        let _ = self.stream.set_nonblocking(true);
        let result = self.stream.read(&mut probe);
        let _ = self.stream.set_nonblocking(false);
        match result {
            Ok(0) => {
                self.dead = true;
                false
            }
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::WouldBlock => true,
            Err(_) => {
                self.dead = true;
                false
            }
        }
    }

    fn close(&mut self) {
        if !self.dead {
            let _ = self.send(&SurfaceMessage::Close);
        }
        self.dead = true;
        let _ = self.stream.shutdown(std::net::Shutdown::Both);
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

impl Drop for ProcessWindow {
    fn drop(&mut self) {
        self.close();
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Records all surface traffic in memory
///
/// Clones share state, so a test can keep one clone and hand the other to
/// the manager.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    refuse: bool,
    windows: Vec<MemoryWindowState>,
}

struct MemoryWindowState {
    messages: Vec<SurfaceMessage>,
    open: bool,
    alive: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent opens fail with `SurfaceError::Unavailable`
    pub fn set_refuse(&self, refuse: bool) {
        self.inner.lock().unwrap().refuse = refuse;
    }

    /// Number of windows ever opened
    pub fn window_count(&self) -> usize {
        self.inner.lock().unwrap().windows.len()
    }

    /// Every message a window has received, including post-close attempts
    pub fn messages(&self, index: usize) -> Vec<SurfaceMessage> {
        self.inner.lock().unwrap().windows[index].messages.clone()
    }

    /// Whether a window is still open
    pub fn is_open(&self, index: usize) -> bool {
        self.inner.lock().unwrap().windows[index].open
    }

    /// Simulate the user closing the window from the outside
    pub fn kill(&self, index: usize) {
        self.inner.lock().unwrap().windows[index].alive = false;
    }
}

impl SurfaceBackend for MemoryBackend {
    fn open_window(
        &mut self,
        _request: &WindowRequest,
    ) -> Result<Box<dyn SurfaceWindow>, SurfaceError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.refuse {
            return Err(SurfaceError::Unavailable("display refused".to_string()));
        }
        let index = inner.windows.len();
        inner.windows.push(MemoryWindowState {
            messages: Vec::new(),
            open: true,
            alive: true,
        });
        Ok(Box::new(MemoryWindow {
            inner: Arc::clone(&self.inner),
            index,
        }))
    }
}

struct MemoryWindow {
    inner: Arc<Mutex<MemoryInner>>,
    index: usize,
}

impl SurfaceWindow for MemoryWindow {
    fn send(&mut self, message: &SurfaceMessage) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let window = &mut inner.windows[self.index];
        // Record the attempt first so tests can see writes that should not
        // have happened.
        window.messages.push(message.clone());
        if !window.open || !window.alive {
            return Err(anyhow!("window is closed"));
        }
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        let inner = self.inner.lock().unwrap();
        let window = &inner.windows[self.index];
        window.open && window.alive
    }

    fn close(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        let window = &mut inner.windows[self.index];
        window.open = false;
        window.alive = false;
    }
}
