//! Wire protocol between the control process and the display client
//!
//! Newline-delimited JSON over the display socket. The first message after a
//! successful open is always `Style` (the one-time style injection); after
//! that the manager only sends `Frame` updates and, at shutdown, `Close`.

use serde::{Deserialize, Serialize};

use crate::presentation::DisplayFrame;

/// Style document injected into a freshly opened surface
///
/// Colors are plain RGB triples so the document survives serialization
/// without caring about terminal color types. Defaults carry the classic
/// palette: green headline, grey precise readout, near-black background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceStyle {
    pub background: (u8, u8, u8),
    pub headline: (u8, u8, u8),
    pub precise: (u8, u8, u8),
    pub logo: (u8, u8, u8),
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            background: (0x1a, 0x1a, 0x1a),
            headline: (0x4c, 0xaf, 0x50),
            precise: (0x66, 0x66, 0x66),
            logo: (0xcc, 0xcc, 0xcc),
        }
    }
}

/// Messages flowing from manager to display client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceMessage {
    /// One-time style injection, sent before any frame
    Style(SurfaceStyle),
    /// A composed presentation frame
    Frame(DisplayFrame),
    /// Orderly shutdown; the client exits on receipt
    Close,
}

impl SurfaceMessage {
    /// Encode as one protocol line (newline included)
    pub fn encode_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Parse one protocol line
    pub fn parse_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line.trim_end())
    }
}

/// Reassembles protocol lines from non-blocking socket reads
///
/// Reads can split a line anywhere; bytes are buffered until a newline
/// completes a message.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every line completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..line.len() - 1]).into_owned());
        }
        lines
    }
}
