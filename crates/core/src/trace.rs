//! Draw-call tracing and parity verification.
//!
//! A trace captures every ranged draw a generation run makes, in order,
//! as `name(args)=result` records, together with the config, the final
//! grid's per-cell type codes, and the level fingerprint. Verifying a
//! trace replays generation from the recorded seed and config and
//! reports the first divergence, which pins divergence to a specific
//! call index instead of "the level looks different".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mapgen::{GeneratedLevel, LevelConfig, LevelGenerator};
use crate::types::GenerationError;

/// One recorded draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngCall {
    pub name: String,
    pub args: Vec<i32>,
    pub result: i32,
}

impl fmt::Display for RngCall {
    /// Canonical record form: `uniform(100)=42`, `dice(2,6)=7`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")={}", self.result)
    }
}

/// Ordered draw history of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallLog {
    calls: Vec<RngCall>,
}

impl CallLog {
    pub fn push(&mut self, call: RngCall) {
        self.calls.push(call);
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RngCall> {
        self.calls.iter()
    }

    pub fn into_calls(self) -> Vec<RngCall> {
        self.calls
    }
}

impl IntoIterator for CallLog {
    type Item = RngCall;
    type IntoIter = std::vec::IntoIter<RngCall>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.into_iter()
    }
}

/// Everything needed to re-verify a generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTrace {
    pub seed: u64,
    pub config: LevelConfig,
    pub calls: Vec<RngCall>,
    /// Per-cell type codes, one base-36 digit per cell, one string per row.
    pub grid_rows: Vec<String>,
    pub fingerprint: u64,
}

/// First divergence between a recorded trace and a replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParityMismatch {
    /// Replay failed outright before it could be compared.
    Generation(GenerationError),
    CallCount { recorded: usize, replayed: usize },
    Call { index: usize, recorded: String, replayed: String },
    GridRow { row: usize, recorded: String, replayed: String },
    Fingerprint { recorded: u64, replayed: u64 },
}

impl fmt::Display for ParityMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation(err) => write!(f, "replay failed: {err}"),
            Self::CallCount { recorded, replayed } => {
                write!(f, "call count diverged: recorded {recorded}, replayed {replayed}")
            }
            Self::Call { index, recorded, replayed } => {
                write!(f, "call {index} diverged: recorded {recorded}, replayed {replayed}")
            }
            Self::GridRow { row, recorded, replayed } => {
                write!(f, "grid row {row} diverged: recorded {recorded}, replayed {replayed}")
            }
            Self::Fingerprint { recorded, replayed } => write!(
                f,
                "fingerprint diverged: recorded {recorded:016x}, replayed {replayed:016x}"
            ),
        }
    }
}

impl std::error::Error for ParityMismatch {}

impl From<GenerationError> for ParityMismatch {
    fn from(err: GenerationError) -> Self {
        Self::Generation(err)
    }
}

/// Generate with call logging on and package the result as a trace.
pub fn capture(
    seed: u64,
    config: &LevelConfig,
) -> Result<(GeneratedLevel, GenerationTrace), GenerationError> {
    let mut generator = LevelGenerator::new(seed, config.clone())?;
    generator.set_call_logging(true);
    let level = generator.generate()?;
    let trace = GenerationTrace {
        seed,
        config: config.clone(),
        calls: generator.take_call_log().into_calls(),
        grid_rows: level.type_code_rows(),
        fingerprint: level.fingerprint(),
    };
    Ok((level, trace))
}

/// Replay a trace and report the first divergence, if any.
///
/// Comparison order is calls, then grid rows, then fingerprint, so a
/// draw-stream divergence is always reported at its call index rather
/// than as the grid damage it caused downstream.
pub fn verify(trace: &GenerationTrace) -> Result<(), ParityMismatch> {
    let (level, replayed) = capture(trace.seed, &trace.config)?;

    for (index, (recorded, fresh)) in trace.calls.iter().zip(&replayed.calls).enumerate() {
        if recorded != fresh {
            return Err(ParityMismatch::Call {
                index,
                recorded: recorded.to_string(),
                replayed: fresh.to_string(),
            });
        }
    }
    if trace.calls.len() != replayed.calls.len() {
        return Err(ParityMismatch::CallCount {
            recorded: trace.calls.len(),
            replayed: replayed.calls.len(),
        });
    }

    let rows = level.type_code_rows();
    for (row, (recorded, fresh)) in trace.grid_rows.iter().zip(&rows).enumerate() {
        if recorded != fresh {
            return Err(ParityMismatch::GridRow {
                row,
                recorded: recorded.clone(),
                replayed: fresh.clone(),
            });
        }
    }
    if trace.grid_rows.len() != rows.len() {
        return Err(ParityMismatch::GridRow {
            row: trace.grid_rows.len().min(rows.len()),
            recorded: format!("{} rows", trace.grid_rows.len()),
            replayed: format!("{} rows", rows.len()),
        });
    }

    if trace.fingerprint != replayed.fingerprint {
        return Err(ParityMismatch::Fingerprint {
            recorded: trace.fingerprint,
            replayed: replayed.fingerprint,
        });
    }
    Ok(())
}
