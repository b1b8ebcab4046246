//! Chase/wander state machine for the facility's pursuer.

use std::time::Duration;

use hollow_halls_core::{ConfigError, GridCoord, PursuitConfig, WorldPos};
use hollow_halls_world::GridMap;
use rand_chacha::ChaCha8Rng;

use crate::field::DistanceField;

/// Floor of the pursuer/player separation below which line of sight is
/// trivially clear without consulting the probe.
const LOS_CONTACT_DISTANCE: f32 = 0.001;

/// Shortest decay the aggro timer will accept.
const MIN_AGGRO_DECAY: Duration = Duration::from_millis(10);

/// Positions the gameplay layer feeds the agent every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuerInput {
    /// Current pursuer position in world units.
    pub pursuer: WorldPos,
    /// Current player position in world units.
    pub player: WorldPos,
}

/// Movement decision emitted once per tick for the excluded physics layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PursuitDecision {
    /// No usable step this tick; the agent holds position and heading.
    Hold,
    /// Steer toward `target` at `speed` world units per second.
    MoveToward {
        /// World-space point to steer toward.
        target: WorldPos,
        /// Speed to move at.
        speed: f32,
    },
}

/// Grid-pathing state the agent is currently in. Direct line of sight
/// bypasses both states entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PursuitMode {
    /// Descending the player distance field.
    Chase,
    /// Roaming toward a self-picked goal cell.
    Wander,
}

/// Finite-state pursuer driven by steepest descent over distance fields.
///
/// The agent owns its two fields (player-tracking and wander-goal) and its
/// own seeded RNG; the grid, tick positions, and the line-of-sight probe are
/// handed in by the owner each tick. External systems (traps, the mask
/// mechanic) interact only through [`aggro`](Self::aggro),
/// [`set_player_hidden`](Self::set_player_hidden), and the read accessors.
#[derive(Clone, Debug)]
pub struct PursuerAgent {
    config: PursuitConfig,
    rng: ChaCha8Rng,
    mode: PursuitMode,
    aggression_level: f32,
    aggro_decay: Duration,
    aggro_remaining: Duration,
    player_hidden: bool,
    player_field: DistanceField,
    last_player_cell: Option<GridCoord>,
    chase_repath_elapsed: Duration,
    chase_target: Option<GridCoord>,
    wander_pick_elapsed: Duration,
    wander_repath_elapsed: Duration,
    wander_goal: Option<GridCoord>,
    wander_field_goal: Option<GridCoord>,
    wander_target: Option<GridCoord>,
    wander_field: DistanceField,
}

impl PursuerAgent {
    /// Creates an idle, unaggravated agent. Fails fast on invalid tuning.
    pub fn new(config: PursuitConfig, rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            aggro_decay: config.aggression_decay,
            config,
            rng,
            mode: PursuitMode::Wander,
            aggression_level: 0.0,
            aggro_remaining: Duration::ZERO,
            player_hidden: false,
            player_field: DistanceField::new(),
            last_player_cell: None,
            chase_repath_elapsed: Duration::ZERO,
            chase_target: None,
            wander_pick_elapsed: Duration::ZERO,
            wander_repath_elapsed: Duration::ZERO,
            wander_goal: None,
            wander_field_goal: None,
            wander_target: None,
            wander_field: DistanceField::new(),
        })
    }

    /// Grid-pathing state the last tick settled on.
    #[must_use]
    pub const fn mode(&self) -> PursuitMode {
        self.mode
    }

    /// Current aggression in `0.0..=1.0`, consumed by difficulty, audio, and
    /// UI systems.
    #[must_use]
    pub const fn aggression_level(&self) -> f32 {
        self.aggression_level
    }

    /// Cell the agent is currently wandering toward, if any.
    #[must_use]
    pub const fn wander_goal(&self) -> Option<GridCoord> {
        self.wander_goal
    }

    /// Charges aggression to full and starts it decaying over `duration`
    /// (the configured default when `None`). While the countdown runs the
    /// agent chases regardless of sight or proximity.
    pub fn aggro(&mut self, duration: Option<Duration>) {
        self.aggro_decay = duration.unwrap_or(self.config.aggression_decay).max(MIN_AGGRO_DECAY);
        self.aggression_level = 1.0;
        self.aggro_remaining = self.aggro_decay;
        self.mode = PursuitMode::Chase;
        // Repath immediately instead of waiting out the cooldown.
        self.chase_repath_elapsed = self.config.repath_cooldown;
        tracing::debug!(decay_seconds = self.aggro_decay.as_secs_f32(), "aggro triggered");
    }

    /// Externally-set concealment override. Hiding drops line of sight,
    /// clears any aggro charge, and forces the agent back toward wandering.
    pub fn set_player_hidden(&mut self, hidden: bool) {
        self.player_hidden = hidden;
        if hidden {
            self.aggression_level = 0.0;
            self.aggro_remaining = Duration::ZERO;
        }
    }

    /// Runs one tick of the control loop and returns the movement decision.
    ///
    /// `los_blocked` is the raycast-equivalent obstruction probe supplied by
    /// the presentation layer; it is only consulted while the player is
    /// neither hidden nor beyond the configured sight range.
    pub fn tick<F>(
        &mut self,
        dt: Duration,
        grid: &GridMap,
        input: &PursuerInput,
        los_blocked: F,
    ) -> PursuitDecision
    where
        F: FnMut(WorldPos, WorldPos) -> bool,
    {
        self.tick_aggro(dt);

        let my_cell = grid.world_to_cell(input.pursuer);
        if !grid.is_walkable(my_cell) {
            // Pushed off the navigable grid; drop every target and wait to
            // re-enter a walkable cell.
            self.chase_target = None;
            self.wander_goal = None;
            self.wander_target = None;
            return PursuitDecision::Hold;
        }

        if self.has_line_of_sight(input, los_blocked) {
            return PursuitDecision::MoveToward {
                target: input.player,
                speed: self.config.los_chase_speed,
            };
        }

        let player_cell = grid.world_to_cell(input.player);
        if self.last_player_cell != Some(player_cell) {
            self.player_field.build_from(grid, player_cell);
            self.last_player_cell = Some(player_cell);
        }

        let close_to_player = !self.player_hidden
            && self
                .player_field
                .distance(my_cell)
                .is_some_and(|distance| distance <= self.config.close_chase_tiles);

        self.mode = if !self.player_hidden && (self.aggression_level > 0.0 || close_to_player) {
            PursuitMode::Chase
        } else {
            PursuitMode::Wander
        };

        let speed = self.current_speed(close_to_player);

        if self.mode == PursuitMode::Chase {
            self.chase_repath_elapsed = self.chase_repath_elapsed.saturating_add(dt);
            if self.chase_repath_elapsed >= self.config.repath_cooldown {
                self.chase_repath_elapsed = Duration::ZERO;
                self.chase_target = self.player_field.descend_from(grid, my_cell);
            }
            self.wander_target = None;

            return match self.chase_target {
                Some(cell) => PursuitDecision::MoveToward {
                    target: grid.cell_center_world(cell),
                    speed,
                },
                None => PursuitDecision::Hold,
            };
        }

        self.wander(dt, grid, my_cell, speed)
    }

    fn wander(
        &mut self,
        dt: Duration,
        grid: &GridMap,
        my_cell: GridCoord,
        speed: f32,
    ) -> PursuitDecision {
        self.wander_pick_elapsed = self.wander_pick_elapsed.saturating_add(dt);
        if self.wander_goal.is_none()
            || self.wander_pick_elapsed >= self.config.wander_pick_cooldown
            || self.reached_wander_goal(my_cell)
        {
            self.wander_goal = grid.try_random_walkable_cell(
                &mut self.rng,
                self.config.wander_pick_attempts,
                Some(my_cell),
                self.config.wander_min_manhattan,
            );
            self.wander_pick_elapsed = Duration::ZERO;
            self.wander_target = None;
            self.wander_repath_elapsed = self.config.repath_cooldown;
        }

        let Some(goal) = self.wander_goal else {
            return PursuitDecision::Hold;
        };

        if self.wander_field_goal != Some(goal) {
            self.wander_field.build_from(grid, goal);
            self.wander_field_goal = Some(goal);
        }

        self.wander_repath_elapsed = self.wander_repath_elapsed.saturating_add(dt);
        if self.wander_repath_elapsed >= self.config.repath_cooldown {
            self.wander_repath_elapsed = Duration::ZERO;
            self.wander_target = self.wander_field.descend_from(grid, my_cell);
        }

        match self.wander_target {
            Some(cell) => PursuitDecision::MoveToward {
                target: grid.cell_center_world(cell),
                speed,
            },
            None => {
                // Goal unreachable or already underfoot; re-pick next tick.
                self.wander_goal = None;
                PursuitDecision::Hold
            }
        }
    }

    fn tick_aggro(&mut self, dt: Duration) {
        if self.aggro_remaining > Duration::ZERO {
            self.aggro_remaining = self.aggro_remaining.saturating_sub(dt);
            self.aggression_level =
                (self.aggro_remaining.as_secs_f32() / self.aggro_decay.as_secs_f32()).clamp(0.0, 1.0);
        } else {
            self.aggression_level = self.aggression_level.clamp(0.0, 1.0);
        }
    }

    fn current_speed(&self, close_to_player: bool) -> f32 {
        // Close-range pacing wins over the aggro ramp.
        if close_to_player {
            return self.config.close_chase_speed;
        }
        if self.mode == PursuitMode::Wander {
            return self.config.wander_speed;
        }
        let span = self.config.aggro_speed_max - self.config.aggro_speed_min;
        self.config.aggro_speed_min + span * self.aggression_level
    }

    fn has_line_of_sight<F>(&self, input: &PursuerInput, mut los_blocked: F) -> bool
    where
        F: FnMut(WorldPos, WorldPos) -> bool,
    {
        if self.player_hidden {
            return false;
        }
        let distance = input.pursuer.distance(input.player);
        if distance < LOS_CONTACT_DISTANCE {
            return true;
        }
        if distance > self.config.los_max_distance {
            return false;
        }
        !los_blocked(input.pursuer, input.player)
    }

    fn reached_wander_goal(&self, my_cell: GridCoord) -> bool {
        let Some(goal) = self.wander_goal else {
            return true;
        };
        if self.config.wander_goal_arrive_tiles <= 0.0 {
            return my_cell == goal;
        }
        my_cell.manhattan_distance(goal) <= self.config.wander_goal_arrive_tiles.ceil() as i32
    }
}
