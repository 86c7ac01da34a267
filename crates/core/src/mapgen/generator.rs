//! Pipeline driver: owns the grid and the draw source, runs the stages in
//! their fixed order, and tracks which stage the run has reached.
//!
//! Stage order is part of the determinism contract. Fill, smoothing,
//! region identification, joining, and finishing each consume draws (or
//! deliberately none) in a documented pattern; reordering stages reorders
//! the draw stream and changes every level after the first divergence.

use crate::rng::DungeonRng;
use crate::trace::CallLog;
use crate::types::GenerationError;

use super::automaton;
use super::finish;
use super::grid::LevelGrid;
use super::joiner;
use super::model::{GeneratedLevel, LevelConfig};
use super::regions;

/// How far a generation run has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationPhase {
    Init,
    Filled,
    Smoothed,
    RegionsIdentified,
    Joined,
    Finished,
    Failed,
}

pub struct LevelGenerator {
    config: LevelConfig,
    rng: DungeonRng,
    phase: GenerationPhase,
}

impl LevelGenerator {
    /// Fails on a malformed config before any draw is consumed.
    pub fn new(seed: u64, config: LevelConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config, rng: DungeonRng::new(seed), phase: GenerationPhase::Init })
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Record every draw of the next run; harvest with [`take_call_log`].
    ///
    /// [`take_call_log`]: Self::take_call_log
    pub fn set_call_logging(&mut self, enabled: bool) {
        self.rng.set_logging(enabled);
    }

    pub fn take_call_log(&mut self) -> CallLog {
        self.rng.take_log()
    }

    /// Run the whole pipeline once. On error the phase is left at `Failed`
    /// and the draw stream is not rewound; rerun via a fresh generator (or
    /// a reseed) rather than retrying in place.
    pub fn generate(&mut self) -> Result<GeneratedLevel, GenerationError> {
        match self.run_pipeline() {
            Ok(level) => {
                self.phase = GenerationPhase::Finished;
                Ok(level)
            }
            Err(err) => {
                self.phase = GenerationPhase::Failed;
                Err(err)
            }
        }
    }

    fn run_pipeline(&mut self) -> Result<GeneratedLevel, GenerationError> {
        let mut grid = LevelGrid::new(self.config.width, self.config.height);
        self.phase = GenerationPhase::Init;

        automaton::random_fill(&mut grid, &mut self.rng, self.config.fill_percent)?;
        self.phase = GenerationPhase::Filled;

        automaton::cull_sparse(&mut grid);
        automaton::break_clusters(&mut grid);
        automaton::smooth(&mut grid);
        self.phase = GenerationPhase::Smoothed;

        let rooms = regions::identify_regions(&mut grid, &mut self.rng, self.config.lighting)?;
        self.phase = GenerationPhase::RegionsIdentified;

        if rooms.is_empty() {
            return Err(GenerationError::RetryExhausted {
                attempts: 1,
                message: "no region survived smoothing".to_string(),
            });
        }
        if let Some(min) = self.config.min_regions
            && rooms.len() < min
        {
            return Err(GenerationError::RetryExhausted {
                attempts: 1,
                message: format!("{} regions identified, {min} required", rooms.len()),
            });
        }

        joiner::join_regions(&mut grid, &mut self.rng, &rooms)?;
        self.phase = GenerationPhase::Joined;

        if self.config.hazards_enabled {
            finish::mark_hazards(&mut grid, &mut self.rng)?;
        }
        finish::wallify(&mut grid);
        finish::refine_wall_spines(&mut grid);
        finish::apply_lighting(&mut grid, &rooms);

        Ok(GeneratedLevel {
            width: self.config.width,
            height: self.config.height,
            cells: grid.into_cells(),
            rooms,
        })
    }
}
