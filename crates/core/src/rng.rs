//! Seeded draw primitives with the reference arithmetic contract.
//!
//! All ranged draws reduce the raw 64-bit ISAAC64 output with a plain
//! modulo. The small bias this keeps for ranges that do not divide 2^64 is
//! deliberate: the reference engine does the same, and parity is defined
//! call-for-call against it. Determinism is call-order dependent, not just
//! seed dependent — inserting or dropping a single draw shifts everything
//! after it.

mod isaac64;

use crate::trace::{CallLog, RngCall};
use crate::types::GenerationError;
use isaac64::Isaac64;

/// Single-threaded draw source for one generation run.
///
/// Parallel generations need independent instances; nothing here is
/// shareable. The optional call log observes draws without influencing
/// them: enabling it changes no returned value and no state transition.
pub struct DungeonRng {
    core: Isaac64,
    seed: u64,
    log: Option<CallLog>,
}

impl DungeonRng {
    pub fn new(seed: u64) -> Self {
        Self { core: Isaac64::from_seed(seed), seed, log: None }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Atomically replace the generator state with a fresh seeded one.
    /// The logging setting and any recorded history are kept.
    pub fn reseed(&mut self, seed: u64) {
        self.core = Isaac64::from_seed(seed);
        self.seed = seed;
    }

    pub fn set_logging(&mut self, enabled: bool) {
        match (enabled, self.log.is_some()) {
            (true, false) => self.log = Some(CallLog::default()),
            (false, true) => self.log = None,
            _ => {}
        }
    }

    pub fn logging_enabled(&self) -> bool {
        self.log.is_some()
    }

    /// Hand over the recorded calls, leaving an empty log in place when
    /// logging is enabled.
    pub fn take_log(&mut self) -> CallLog {
        match self.log.as_mut() {
            Some(log) => std::mem::take(log),
            None => CallLog::default(),
        }
    }

    fn record(&mut self, name: &'static str, args: &[i32], result: i32) {
        if let Some(log) = self.log.as_mut() {
            log.push(RngCall { name: name.to_string(), args: args.to_vec(), result });
        }
    }

    fn raw_below(&mut self, n: i32) -> i32 {
        (self.core.next_u64() % n as u64) as i32
    }

    /// Integer in `[0, n)`. Fails for `n <= 0` without consuming state.
    pub fn uniform(&mut self, n: i32) -> Result<i32, GenerationError> {
        if n <= 0 {
            return Err(GenerationError::invalid(format!("uniform range must be positive, got {n}")));
        }
        let result = self.raw_below(n);
        self.record("uniform", &[n], result);
        Ok(result)
    }

    /// Integer in `[1, n]`. Fails for `n <= 0` without consuming state.
    pub fn roll(&mut self, n: i32) -> Result<i32, GenerationError> {
        if n <= 0 {
            return Err(GenerationError::invalid(format!("roll range must be positive, got {n}")));
        }
        let result = self.raw_below(n) + 1;
        self.record("roll", &[n], result);
        Ok(result)
    }

    /// Integer in `[base, base + span)`. Logged as the underlying `uniform`
    /// draw; the offset is pure arithmetic on top of it.
    pub fn uniform_from(&mut self, span: i32, base: i32) -> Result<i32, GenerationError> {
        Ok(self.uniform(span)? + base)
    }

    /// Sum of `count` independent draws in `[1, sides]`; one log entry for
    /// the whole roll, `count` raw draws consumed.
    pub fn dice(&mut self, count: i32, sides: i32) -> Result<i32, GenerationError> {
        if count < 0 {
            return Err(GenerationError::invalid(format!("dice count must be non-negative, got {count}")));
        }
        if sides <= 0 {
            return Err(GenerationError::invalid(format!("dice sides must be positive, got {sides}")));
        }
        let mut total = count;
        for _ in 0..count {
            total += self.raw_below(sides);
        }
        self.record("dice", &[count, sides], total);
        Ok(total)
    }
}
