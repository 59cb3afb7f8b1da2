//! Adaptive staircase tracking for psychophysical threshold runs.
//!
//! Implements the transformed up-down method: the tracked variable steps
//! down after a run of correct responses and up after a run of incorrect
//! ones, with per-reversal step sizes and the usual block-ending rules
//! (reversal budget, exact or maximum trial counts, and consecutive
//! floor or ceiling hits).

pub mod staircase_node;

use std::fmt;

/// Configuration for a staircase block.
///
/// `steps` holds one step size per planned reversal; the block ends once
/// every entry has been consumed by a reversal. A zero `run_n_trials` or
/// `max_trials` disables that ending rule.
#[derive(Clone, Debug)]
pub struct StaircaseConfig {
    pub steps: Vec<f64>,
    pub downs: u32,
    pub ups: u32,
    pub val_start: f64,
    pub val_floor: f64,
    pub val_ceil: f64,
    pub val_floor_n: u32,
    pub val_ceil_n: u32,
    pub run_n_trials: u32,
    pub max_trials: u32,
}

impl Default for StaircaseConfig {
    fn default() -> StaircaseConfig {
        StaircaseConfig {
            steps: vec![],
            downs: 2,
            ups: 1,
            val_start: 0.0,
            val_floor: 0.0,
            val_ceil: 0.0,
            val_floor_n: 3,
            val_ceil_n: 3,
            run_n_trials: 0,
            max_trials: 0,
        }
    }
}

/// Direction of a staircase step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// The reason a staircase block ended.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockEnd {
    FloorReached(u32),
    CeilingReached(u32),
    TrialsDone(u32),
    MaxTrialsReached(u32),
    ReversalsDone(usize),
}

impl fmt::Display for BlockEnd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BlockEnd::FloorReached(n) => {
                write!(f, "{} consecutive floor trials reached", n)
            }
            BlockEnd::CeilingReached(n) => {
                write!(f, "{} consecutive ceiling trials reached", n)
            }
            BlockEnd::TrialsDone(n) => write!(f, "{} trials reached", n),
            BlockEnd::MaxTrialsReached(n) => {
                write!(f, "A maximum of {} trials reached", n)
            }
            BlockEnd::ReversalsDone(n) => {
                write!(f, "{} reversals reached", n)
            }
        }
    }
}

/// Trial-by-trial bookkeeping for one adaptive track.
///
/// Drive it from the experiment loop: present a trial at
/// [`value()`](Staircase::value), score the response, and hand the
/// result to [`respond()`](Staircase::respond), which returns the value
/// for the next trial or `None` once the block is over.
pub struct Staircase {
    config: StaircaseConfig,
    value: f64,
    trials: u32,
    values: Vec<f64>,
    track: Vec<i8>,
    reversals: Vec<f64>,
    prev_dir: Option<Direction>,
    init_dir: Option<Direction>,
    cur_ups: u32,
    cur_dns: u32,
    floor_count: u32,
    ceil_count: u32,
    end: Option<BlockEnd>,
}

impl Staircase {
    pub fn new(config: StaircaseConfig) -> Staircase {
        Staircase {
            value: config.val_start,
            config,
            trials: 0,
            values: vec![],
            track: vec![],
            reversals: vec![],
            prev_dir: None,
            init_dir: None,
            cur_ups: 0,
            cur_dns: 0,
            floor_count: 0,
            ceil_count: 0,
            end: None,
        }
    }

    /// Scores one trial and advances the track.
    ///
    /// Returns the value for the next trial, or `None` once an ending
    /// rule has fired. Responses after the block has ended are ignored.
    pub fn respond(&mut self, correct: bool) -> Option<f64> {
        if self.end.is_some() {
            return None;
        }
        self.trials += 1;
        if let Some(dir) = self.score(correct) {
            self.step(dir);
        }
        self.finish_trial();
        if self.end.is_some() {
            None
        } else {
            Some(self.value)
        }
    }

    // Counts runs of correct/incorrect responses and records reversals.
    // Returns the direction to step this trial, if any.
    fn score(&mut self, correct: bool) -> Option<Direction> {
        self.values.push(self.value);
        if correct {
            self.cur_dns += 1;
            self.cur_ups = 0;
            if self.cur_dns == self.config.downs {
                self.cur_dns = 0;
                self.turn(Direction::Down);
                Some(Direction::Down)
            } else {
                None
            }
        } else {
            self.cur_ups += 1;
            self.cur_dns = 0;
            if self.cur_ups == self.config.ups {
                self.cur_ups = 0;
                self.turn(Direction::Up);
                Some(Direction::Up)
            } else {
                None
            }
        }
    }

    // Records whether a step in the given direction is a reversal. The
    // first step of a block sets the initial direction and is not a
    // change.
    fn turn(&mut self, dir: Direction) {
        match self.prev_dir {
            Some(prev) if prev == dir => self.track.push(0),
            None => {
                self.prev_dir = Some(dir);
                self.init_dir = Some(dir);
                self.track.push(0);
            }
            Some(_) => {
                self.prev_dir = Some(dir);
                self.track.push(match dir {
                    Direction::Down => -1,
                    Direction::Up => 1,
                });
                self.reversals.push(self.value);
            }
        }
    }

    // Applies the step size for the current reversal count, clamped to
    // the last configured step once the schedule is exhausted.
    fn step(&mut self, dir: Direction) {
        let last = self.config.steps.len().saturating_sub(1);
        let size = match self.config.steps.get(self.reversals.len().min(last))
        {
            Some(&s) => s,
            None => return,
        };
        match dir {
            Direction::Down => self.value -= size,
            Direction::Up => self.value += size,
        }
    }

    // Clamps to the floor and ceiling and checks every ending rule.
    fn finish_trial(&mut self) {
        self.value = self.value.max(self.config.val_floor);
        if self.value == self.config.val_floor {
            self.floor_count += 1;
            if self.floor_count == self.config.val_floor_n {
                self.end =
                    Some(BlockEnd::FloorReached(self.config.val_floor_n));
            }
        } else {
            self.floor_count = 0;
        }
        self.value = self.value.min(self.config.val_ceil);
        if self.value == self.config.val_ceil {
            self.ceil_count += 1;
            if self.ceil_count == self.config.val_ceil_n {
                self.end =
                    Some(BlockEnd::CeilingReached(self.config.val_ceil_n));
            }
        } else {
            self.ceil_count = 0;
        }

        if self.end.is_none() {
            if self.config.run_n_trials > 0
                && self.trials == self.config.run_n_trials
            {
                self.end =
                    Some(BlockEnd::TrialsDone(self.config.run_n_trials));
            } else if self.config.max_trials > 0
                && self.trials == self.config.max_trials
            {
                self.end =
                    Some(BlockEnd::MaxTrialsReached(self.config.max_trials));
            } else if self.reversals.len() == self.config.steps.len() {
                self.end =
                    Some(BlockEnd::ReversalsDone(self.reversals.len()));
            }
        }
    }

    /// The value to present on the next trial.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of trials scored so far.
    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// The value presented on each scored trial, in order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The value at each recorded reversal, in order.
    pub fn reversals(&self) -> &[f64] {
        &self.reversals
    }

    /// One marker per step taken: 0 for a step continuing the current
    /// direction, -1 for a downward reversal, 1 for an upward reversal.
    pub fn track(&self) -> &[i8] {
        &self.track
    }

    /// The direction of the first step of the block, if one has been
    /// taken yet.
    pub fn initial_direction(&self) -> Option<Direction> {
        self.init_dir
    }

    /// Why the block ended, once it has.
    pub fn end_reason(&self) -> Option<&BlockEnd> {
        self.end.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.end.is_some()
    }
}
