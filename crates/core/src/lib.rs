//! Deterministic cave-level generation with a verifiable draw stream.
//!
//! The crate is organized around one contract: a 64-bit seed and a
//! [`LevelConfig`] fully determine the generated level, and every random
//! decision along the way can be recorded and replayed bit-for-bit.
//!
//! - [`rng`]: seeded ISAAC64 draw source with the exact reduction
//!   arithmetic the rest of the crate depends on.
//! - [`mapgen`]: the generation pipeline, from random fill to finished
//!   walls and lighting.
//! - [`trace`]: draw-call capture and parity verification.
//! - [`trace_file`]: JSONL persistence for traces.

pub mod mapgen;
pub mod rng;
pub mod trace;
pub mod trace_file;
pub mod types;

pub use mapgen::{
    GeneratedLevel, GenerationPhase, LevelConfig, LevelGenerator, LightingMode, RoomInfo,
    generate_level,
};
pub use rng::DungeonRng;
pub use trace::{CallLog, GenerationTrace, ParityMismatch, RngCall, capture, verify};
pub use types::{Cell, GenerationError, Pos, TerrainKind};
