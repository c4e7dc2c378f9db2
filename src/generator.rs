//! Procedural construction of solvable levels.
//!
//! Generation runs four sequential stages over one working grid and chain
//! list: randomized constructive placement, gap filling, optimization
//! (flip, then evict) for boards that end up stuck, and materialization
//! into a [`Board`]. Global solvability is re-simulated after every
//! tentative mutation, so each accepted step keeps the accumulated level
//! clearable.
//!
//! Every randomized loop carries an explicit cap; exhausting one degrades
//! the result (fewer arrows, or an unverified board) instead of erroring,
//! and [`Generated::verified`] reports which of the two happened.
//!
//! One seeded [`ChaCha8Rng`] drives the whole process: identical
//! parameters and an identical explicit seed reproduce the level bit for
//! bit, and repeated [`generate`](Generator::generate) calls keep drawing
//! from the same stream.

use std::collections::BTreeMap;
use std::num::NonZero;

use itertools::Itertools;
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strum::VariantArray;

use crate::arrow::{Arrow, ArrowId, End, EMPTY};
use crate::board::Board;
use crate::direction::Direction;
use crate::location::{Dimension, Location};
use crate::solver;

// hard caps keeping every randomized stage bounded
const PLACEMENT_FAILURE_CAP: usize = 200;
const GAP_FILL_PASSES: usize = 5;
const FLIP_ATTEMPTS: usize = 500;

// chance of re-orienting a walk whose tail sits strictly nearer a border
// than its head
const REORIENT_CHANCE: f64 = 0.8;

/// Reasons a [`GeneratorConfig`] is rejected before generation starts.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// `min_len` was below 2; shorter chains have no flight direction.
    MinLenTooShort,
    /// `max_len` was below `min_len`.
    LengthRangeInverted,
    /// `turn_chance` was not a probability in `[0, 1]`.
    TurnChanceOutOfRange,
}

/// Parameters for level generation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Board width in columns.
    pub width: Dimension,
    /// Board height in rows.
    pub height: Dimension,
    /// Shortest chain the placement stage will accept; at least 2.
    pub min_len: usize,
    /// Walk target lengths are drawn uniformly from `min_len..=max_len`.
    pub max_len: usize,
    /// Chance, per walk step, of turning instead of continuing straight.
    ///
    /// At `0.0` every generated arrow is a straight line: a walk whose
    /// straight continuation is blocked ends rather than bending.
    pub turn_chance: f64,
    /// Random seed for reproducibility, or [`None`] for a fresh
    /// nondeterministic seed.
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Check the parameter ranges; called by [`Generator::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_len < 2 {
            return Err(ConfigError::MinLenTooShort);
        }
        if self.max_len < self.min_len {
            return Err(ConfigError::LengthRangeInverted);
        }
        if !(0.0..=1.0).contains(&self.turn_chance) {
            return Err(ConfigError::TurnChanceOutOfRange);
        }

        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: NonZero::new(6).unwrap(),
            height: NonZero::new(8).unwrap(),
            min_len: 2,
            max_len: 8,
            turn_chance: 0.6,
            seed: None,
        }
    }
}

/// A generated level, plus whether the final solvability simulation
/// actually cleared it.
///
/// `verified` is `false` only when every optimization avenue was exhausted
/// and the board still simulated as stuck; the board itself is always
/// returned, degraded rather than withheld.
#[derive(Clone, Debug)]
pub struct Generated {
    /// The materialized level.
    pub board: Board,
    /// Whether the returned board's solvability was definitively verified.
    pub verified: bool,
}

/// Seeded level generator. Build one with [`Generator::new`], then call
/// [`generate`](Generator::generate) as many times as needed; each call
/// produces a fresh level from the continuing random stream.
pub struct Generator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    grid: Array2<ArrowId>,
    snakes: Vec<Arrow>,
}

impl Generator {
    /// Validate `config` and set up the random stream.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            config,
            rng,
            grid: Array2::from_elem((config.height.get(), config.width.get()), EMPTY),
            snakes: Vec::new(),
        })
    }

    /// The configuration this generator was built with.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce one level.
    pub fn generate(&mut self) -> Generated {
        self.grid.fill(EMPTY);
        self.snakes.clear();

        self.place_arrows();
        self.fill_gaps();
        let verified = self.ensure_solvable();

        self.materialize(verified)
    }

    fn width(&self) -> usize {
        self.config.width.get()
    }

    fn height(&self) -> usize {
        self.config.height.get()
    }

    fn contains(&self, location: Location) -> bool {
        location.0 < self.width() && location.1 < self.height()
    }

    fn neighbors(&self, location: Location) -> Vec<Location> {
        Direction::VARIANTS
            .iter()
            .map(|dir| dir.attempt_from(location))
            .filter(|n| self.contains(*n))
            .collect_vec()
    }

    fn empty_cells(&self) -> Vec<Location> {
        self.grid
            .indexed_iter()
            .filter(|(_, &id)| id == EMPTY)
            .map(|(index, _)| Location::from(index))
            .collect_vec()
    }

    fn is_solvable_now(&self) -> bool {
        solver::clears_completely(&self.grid, &self.snakes)
    }

    // an arrow may never fly through its own cells
    fn flight_crosses_self(&self, arrow: &Arrow) -> bool {
        let direction = arrow.direction();
        let mut probe = direction.attempt_from(arrow.head());

        while self.contains(probe) {
            if arrow.cells().contains(&probe) {
                return true;
            }
            probe = direction.attempt_from(probe);
        }

        false
    }

    fn border_distance(&self, location: Location) -> usize {
        let Location(x, y) = location;
        x.min(self.width() - 1 - x).min(y).min(self.height() - 1 - y)
    }

    /// Stage 1: repeatedly grow random walks on empty cells, keeping each
    /// one only if the accumulated grid stays solvable. The stage ends when
    /// the grid is full or [`PLACEMENT_FAILURE_CAP`] consecutive attempts
    /// failed.
    fn place_arrows(&mut self) {
        let mut next_id: ArrowId = 1;
        let mut failures = 0;

        while failures < PLACEMENT_FAILURE_CAP {
            let empty = self.empty_cells();
            if empty.is_empty() {
                break;
            }
            let start = empty[self.rng.gen_range(0..empty.len())];

            let Some(arrow) = self.random_walk(start, next_id) else {
                failures += 1;
                continue;
            };

            for cell in arrow.cells() {
                self.grid[cell.as_index()] = next_id;
            }
            self.snakes.push(arrow);

            if self.is_solvable_now() {
                next_id += 1;
                failures = 0;
            } else {
                if let Some(rejected) = self.snakes.pop() {
                    for cell in rejected.cells() {
                        self.grid[cell.as_index()] = EMPTY;
                    }
                }
                failures += 1;
            }
        }
    }

    // one walk attempt; None when it comes out below min_len or would fly
    // through itself
    fn random_walk(&mut self, start: Location, id: ArrowId) -> Option<Arrow> {
        let target_len = self.rng.gen_range(self.config.min_len..=self.config.max_len);
        let mut cells = vec![start];
        let mut current = start;
        let mut last_dir: Option<Direction> = None;

        while cells.len() < target_len {
            let legal = self
                .neighbors(current)
                .into_iter()
                .filter(|n| self.grid[n.as_index()] == EMPTY && !cells.contains(n))
                .collect_vec();
            if legal.is_empty() {
                break;
            }

            let next = match last_dir {
                None => legal[self.rng.gen_range(0..legal.len())],
                Some(dir) => {
                    let straight = dir.attempt_from(current);
                    if self.rng.gen_bool(self.config.turn_chance) {
                        legal[self.rng.gen_range(0..legal.len())]
                    } else if legal.contains(&straight) {
                        straight
                    } else {
                        // straight run ended and no turn was rolled
                        break;
                    }
                }
            };

            last_dir = Direction::between(current, next);
            cells.push(next);
            current = next;
        }

        if cells.len() < self.config.min_len {
            return None;
        }

        let mut arrow = Arrow { id, cells };

        // aim the exit at the nearer border, usually
        if self.border_distance(arrow.tail()) < self.border_distance(arrow.head())
            && self.rng.gen_bool(REORIENT_CHANCE)
        {
            arrow.reverse();
        }

        if self.flight_crosses_self(&arrow) {
            return None;
        }

        Some(arrow)
    }

    /// Stage 2: cells the placement stage left empty are offered to
    /// adjacent arrows as one-cell end extensions. An extension sticks only
    /// if the arrow stays non-self-crossing and the grid stays solvable;
    /// a pass with no accepted extension ends the stage early.
    fn fill_gaps(&mut self) {
        for _ in 0..GAP_FILL_PASSES {
            let mut gaps = self.empty_cells();
            gaps.shuffle(&mut self.rng);

            let mut changed = false;
            for gap in gaps {
                changed |= self.try_fill(gap);
            }

            if !changed {
                break;
            }
        }
    }

    fn try_fill(&mut self, gap: Location) -> bool {
        // only an arrow whose head or tail is the neighboring cell can
        // absorb the gap and stay one contiguous chain
        let mut candidates: Vec<(usize, End)> = Vec::new();
        for neighbor in self.neighbors(gap) {
            let id = self.grid[neighbor.as_index()];
            if id == EMPTY {
                continue;
            }
            let Some(index) = self.snakes.iter().position(|s| s.id() == id) else {
                continue;
            };

            if self.snakes[index].head() == neighbor {
                candidates.push((index, End::Head));
            } else if self.snakes[index].tail() == neighbor {
                candidates.push((index, End::Tail));
            }
        }

        if candidates.is_empty() {
            return false;
        }
        let (index, end) = candidates[self.rng.gen_range(0..candidates.len())];

        self.snakes[index].extend(end, gap);
        self.grid[gap.as_index()] = self.snakes[index].id();

        let keep = {
            let arrow = &self.snakes[index];
            let bend_allowed = self.config.turn_chance > 0.0 || arrow.is_straight();
            bend_allowed && !self.flight_crosses_self(arrow) && self.is_solvable_now()
        };

        if !keep {
            self.grid[gap.as_index()] = EMPTY;
            self.snakes[index].retract(end);
        }
        keep
    }

    /// Stage 3, entered only when the grid is still stuck: random flips up
    /// to [`FLIP_ATTEMPTS`] (undone unless they solve the board), then
    /// eviction of the most-obstructing arrow, repeated until the board
    /// solves or runs out of arrows. Returns whether the final board
    /// simulated as solvable.
    fn ensure_solvable(&mut self) -> bool {
        if self.is_solvable_now() {
            return true;
        }

        while !self.snakes.is_empty() {
            for _ in 0..FLIP_ATTEMPTS {
                let index = self.rng.gen_range(0..self.snakes.len());
                self.snakes[index].reverse();

                if !self.flight_crosses_self(&self.snakes[index]) && self.is_solvable_now() {
                    return true;
                }
                self.snakes[index].reverse();
            }

            if !self.evict_worst() {
                break;
            }
            if self.is_solvable_now() {
                return true;
            }
        }

        self.snakes.is_empty()
    }

    // lossy fallback: drop the arrow obstructing the most other arrows,
    // ties going to the lowest id
    fn evict_worst(&mut self) -> bool {
        let mut blocks: BTreeMap<ArrowId, usize> = BTreeMap::new();
        for arrow in &self.snakes {
            if let Some(at) = solver::first_blocker(&self.grid, arrow) {
                *blocks.entry(self.grid[at.as_index()]).or_insert(0) += 1;
            }
        }

        let Some((&worst, _)) = blocks.iter().max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0))) else {
            return false;
        };
        let Some(index) = self.snakes.iter().position(|s| s.id() == worst) else {
            return false;
        };

        let evicted = self.snakes.remove(index);
        for cell in evicted.cells() {
            self.grid[cell.as_index()] = EMPTY;
        }
        true
    }

    /// Stage 4: copy the surviving chains into a fresh [`Board`].
    fn materialize(&self, verified: bool) -> Generated {
        let mut board = Board::with_dims((self.config.width, self.config.height));

        for arrow in &self.snakes {
            let _added = board.add_arrow(arrow.clone());
            debug_assert!(_added);
        }

        Generated { board, verified }
    }
}
