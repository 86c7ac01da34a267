//! File-backed JSONL trace format with a SHA-256 digest over the call
//! stream.
//!
//! The file format is line-delimited JSON (`.jsonl`):
//! - Line 1: header with `format_version`, `seed`, and the full config.
//! - Middle lines: one draw call per line, in call order, each carrying
//!   its sequence number.
//! - Last line: summary with the call count, the per-row grid type codes,
//!   the level fingerprint, and `hex(SHA-256)` over the call lines.
//!
//! Loading validates every line's JSON shape, the sequence numbering, and
//! the digest, so a truncated or hand-edited file is rejected before it
//! reaches parity verification.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::mapgen::LevelConfig;
use crate::trace::{GenerationTrace, RngCall};

pub const TRACE_FORMAT_VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// File format structs
// ---------------------------------------------------------------------------

/// First line of the JSONL trace file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct FileHeader {
    format_version: u16,
    seed: u64,
    config: LevelConfig,
}

/// One draw call line.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct FileCall {
    seq: u64,
    name: String,
    args: Vec<i32>,
    result: i32,
}

/// Final line of the JSONL trace file.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct FileSummary {
    calls: u64,
    grid_rows: Vec<String>,
    fingerprint: u64,
    calls_sha256_hex: String,
}

// ---------------------------------------------------------------------------
// SHA-256 helpers
// ---------------------------------------------------------------------------

/// Digest over the call lines exactly as written, newlines included.
fn digest_call_lines(lines: &[String]) -> String {
    let mut hasher = Sha256::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    let result = hasher.finalize();
    format!("{result:064x}")
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Write a complete trace to a JSONL file.
pub fn write_trace_file(path: &Path, trace: &GenerationTrace) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let header = FileHeader {
        format_version: TRACE_FORMAT_VERSION,
        seed: trace.seed,
        config: trace.config.clone(),
    };
    let header_json = serde_json::to_string(&header).map_err(io::Error::other)?;
    writeln!(writer, "{header_json}")?;

    let mut call_lines = Vec::with_capacity(trace.calls.len());
    for (seq, call) in trace.calls.iter().enumerate() {
        let line = serde_json::to_string(&FileCall {
            seq: seq as u64,
            name: call.name.clone(),
            args: call.args.clone(),
            result: call.result,
        })
        .map_err(io::Error::other)?;
        writeln!(writer, "{line}")?;
        call_lines.push(line);
    }

    let summary = FileSummary {
        calls: trace.calls.len() as u64,
        grid_rows: trace.grid_rows.clone(),
        fingerprint: trace.fingerprint,
        calls_sha256_hex: digest_call_lines(&call_lines),
    };
    let summary_json = serde_json::to_string(&summary).map_err(io::Error::other)?;
    writeln!(writer, "{summary_json}")?;
    writer.flush()
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Describes why a trace file could not be loaded.
#[derive(Debug)]
pub enum TraceLoadError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// The file has no header line or no summary line.
    Truncated,
    /// The header line could not be parsed or names an unknown version.
    InvalidHeader { line: usize, message: String },
    /// A call line could not be parsed or its fields are inconsistent.
    InvalidCall { line: usize, message: String },
    /// The summary line is malformed or disagrees with the call lines.
    InvalidSummary { message: String },
    /// The recomputed digest does not match the stored one.
    DigestMismatch,
}

impl fmt::Display for TraceLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "trace I/O error: {e}"),
            Self::Truncated => write!(f, "trace file is truncated"),
            Self::InvalidHeader { line, message } => {
                write!(f, "invalid trace header at line {line}: {message}")
            }
            Self::InvalidCall { line, message } => {
                write!(f, "invalid trace call at line {line}: {message}")
            }
            Self::InvalidSummary { message } => {
                write!(f, "invalid trace summary: {message}")
            }
            Self::DigestMismatch => write!(f, "SHA-256 digest over call lines does not match"),
        }
    }
}

impl std::error::Error for TraceLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Load and validate a JSONL trace file.
pub fn load_trace_from_file(path: &Path) -> Result<GenerationTrace, TraceLoadError> {
    let content = fs::read_to_string(path).map_err(TraceLoadError::Io)?;
    if !content.ends_with('\n') {
        return Err(TraceLoadError::Truncated);
    }
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 {
        return Err(TraceLoadError::Truncated);
    }

    // --- header (line 1) ---
    let header: FileHeader = serde_json::from_str(lines[0])
        .map_err(|e| TraceLoadError::InvalidHeader { line: 1, message: e.to_string() })?;
    if header.format_version != TRACE_FORMAT_VERSION {
        return Err(TraceLoadError::InvalidHeader {
            line: 1,
            message: format!("unsupported format version {}", header.format_version),
        });
    }

    // --- calls (middle lines) ---
    let call_lines = &lines[1..lines.len() - 1];
    let mut calls = Vec::with_capacity(call_lines.len());
    for (index, line) in call_lines.iter().enumerate() {
        let line_number = index + 2; // 1-indexed; header is line 1
        let call: FileCall = serde_json::from_str(line)
            .map_err(|e| TraceLoadError::InvalidCall { line: line_number, message: e.to_string() })?;
        if call.seq != index as u64 {
            return Err(TraceLoadError::InvalidCall {
                line: line_number,
                message: format!("expected seq {index}, found {}", call.seq),
            });
        }
        calls.push(RngCall { name: call.name, args: call.args, result: call.result });
    }

    // --- summary (last line) ---
    let summary: FileSummary = serde_json::from_str(lines[lines.len() - 1])
        .map_err(|e| TraceLoadError::InvalidSummary { message: e.to_string() })?;
    if summary.calls != calls.len() as u64 {
        return Err(TraceLoadError::InvalidSummary {
            message: format!("summary counts {} calls, file has {}", summary.calls, calls.len()),
        });
    }
    let stored_lines: Vec<String> = call_lines.iter().map(|line| (*line).to_string()).collect();
    if summary.calls_sha256_hex != digest_call_lines(&stored_lines) {
        return Err(TraceLoadError::DigestMismatch);
    }

    Ok(GenerationTrace {
        seed: header.seed,
        config: header.config,
        calls,
        grid_rows: summary.grid_rows,
        fingerprint: summary.fingerprint,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
