//! The classic variant: no menus, a stop/go snake and an instant respawn.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{detect_death, hits_food, DeathReason, FoodCollision};
use crate::config::{ClassicConfig, GridSize};
use crate::food::FoodSpawner;
use crate::game::InputOutcome;
use crate::input::{Direction, GameInput};
use crate::snake::{Position, Snake};

/// Motion state of the classic snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MotionState {
    Stopped,
    Moving,
    /// Showing the crash; the round resets when the display runs out.
    Dead,
}

/// Notifications produced by [`ClassicGame::step`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ClassicEvent {
    Ate { score: u32 },
    NewHighScore(u32),
    Died(DeathReason),
    Respawned,
}

#[derive(Debug, Clone)]
pub struct ClassicGame {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    pub death_reason: Option<DeathReason>,
    state: MotionState,
    dead_frames_left: u32,
    food_collision: FoodCollision,
    config: ClassicConfig,
    spawner: FoodSpawner,
    rng: StdRng,
}

impl ClassicGame {
    #[must_use]
    pub fn new(config: ClassicConfig, high_score: u32) -> Self {
        Self::with_rng(config, high_score, StdRng::from_entropy())
    }

    #[must_use]
    pub fn new_with_seed(config: ClassicConfig, high_score: u32, seed: u64) -> Self {
        Self::with_rng(config, high_score, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ClassicConfig, high_score: u32, rng: StdRng) -> Self {
        let mut game = Self {
            snake: Snake::new(Position { x: 0, y: 0 }, Direction::Right),
            food: Position { x: 0, y: 0 },
            score: 0,
            high_score,
            death_reason: None,
            state: MotionState::Stopped,
            dead_frames_left: 0,
            food_collision: config.food_collision(),
            spawner: FoodSpawner::new(config.grid),
            config,
            rng,
        };
        game.respawn();
        game
    }

    #[must_use]
    pub fn state(&self) -> MotionState {
        self.state
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.config.grid
    }

    #[must_use]
    pub fn config(&self) -> &ClassicConfig {
        &self.config
    }

    /// Handles one input token.
    ///
    /// A stopped snake accepts any heading. A moving one rejects reversals
    /// while longer than one cell.
    pub fn apply_input(&mut self, input: GameInput) -> InputOutcome {
        match input {
            GameInput::Quit | GameInput::Exit => return InputOutcome::Exit,
            GameInput::Direction(direction) => match self.state {
                MotionState::Stopped => {
                    self.snake.set_direction_unchecked(direction);
                    self.state = MotionState::Moving;
                }
                MotionState::Moving => {
                    self.snake.set_direction(direction);
                }
                MotionState::Dead => {}
            },
            GameInput::Pause => {
                if self.state == MotionState::Moving {
                    self.state = MotionState::Stopped;
                }
            }
            _ => {}
        }

        InputOutcome::Continue
    }

    /// Advances one frame.
    pub fn step(&mut self) -> Vec<ClassicEvent> {
        let mut events = Vec::new();

        match self.state {
            MotionState::Stopped => {}
            MotionState::Dead => {
                self.dead_frames_left = self.dead_frames_left.saturating_sub(1);
                if self.dead_frames_left == 0 {
                    self.respawn();
                    events.push(ClassicEvent::Respawned);
                }
            }
            MotionState::Moving => self.advance(&mut events),
        }

        events
    }

    fn advance(&mut self, events: &mut Vec<ClassicEvent>) {
        self.snake.advance();

        if hits_food(self.snake.head(), self.food, self.food_collision) {
            self.snake.mark_growth();
            self.score += 1;
            self.place_food();
            events.push(ClassicEvent::Ate { score: self.score });

            if self.score > self.high_score {
                self.high_score = self.score;
                events.push(ClassicEvent::NewHighScore(self.score));
            }
        }

        if let Some(reason) = detect_death(&self.snake, self.bounds()) {
            debug!("classic snake died: {reason:?} at score {}", self.score);
            self.death_reason = Some(reason);
            events.push(ClassicEvent::Died(reason));

            if self.config.dead_display_frames == 0 {
                self.respawn();
                events.push(ClassicEvent::Respawned);
            } else {
                self.state = MotionState::Dead;
                self.dead_frames_left = self.config.dead_display_frames;
            }
        }
    }

    /// Starts over at a random cell, stopped, with a fresh score and food.
    pub fn respawn(&mut self) {
        let bounds = self.bounds();
        let start = Position {
            x: self.rng.gen_range(0..i32::from(bounds.width)),
            y: self.rng.gen_range(0..i32::from(bounds.height)),
        };

        self.snake.reset(start, Direction::Right);
        self.state = MotionState::Stopped;
        self.score = 0;
        self.death_reason = None;
        self.dead_frames_left = 0;
        self.place_food();
    }

    fn place_food(&mut self) {
        match self.spawner.spawn(&mut self.rng, &self.snake.occupied()) {
            Some(position) => self.food = position,
            None => warn!("no free cell left for food, keeping it at {:?}", self.food),
        }
    }
}
