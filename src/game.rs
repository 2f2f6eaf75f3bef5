use std::time::Duration;

use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::{detect_death, hits_food, DeathReason};
use crate::config::{Difficulty, GameConfig, GridSize, BASE_FOOD_VALUE};
use crate::food::FoodSpawner;
use crate::input::{Direction, GameInput};
use crate::phase::{Action, MainMenuItem, MenuState, Phase};
use crate::snake::{Position, Snake};

/// Notifications for the presentation layer, drained once per frame.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionEvent {
    Ate { points: u32 },
    Collided(DeathReason),
    NewHighScore(u32),
    MenuMoved,
    PhaseChanged { from: Phase, to: Phase },
}

/// What the loop should do after an input was applied.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputOutcome {
    Continue,
    Exit,
}

/// Points for one food at the given multiplier, truncated to an integer.
#[must_use]
pub fn food_points(score_multiplier: f64) -> u32 {
    (f64::from(BASE_FOOD_VALUE) * score_multiplier).floor() as u32
}

/// Complete state of the arcade variant: phase, menus and the current round.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    /// Discrete moves performed in the current round.
    pub tick_count: u64,
    pub death_reason: Option<DeathReason>,
    /// Set when the round that just ended beat the previous best.
    pub new_record: bool,
    phase: Phase,
    difficulty: Difficulty,
    menu: MenuState,
    accumulator: Duration,
    config: GameConfig,
    spawner: FoodSpawner,
    events: Vec<SessionEvent>,
    rng: StdRng,
}

impl GameSession {
    /// Creates a session in the menu, seeded from OS entropy.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let bounds = config.grid;
        let difficulty = config.difficulty;
        let mut session = Self {
            snake: Snake::new(Position::center_of(bounds), Direction::Right),
            food: Position { x: 0, y: 0 },
            score: 0,
            high_score: 0,
            tick_count: 0,
            death_reason: None,
            new_record: false,
            phase: Phase::Menu,
            difficulty,
            menu: MenuState::new(difficulty),
            accumulator: Duration::ZERO,
            spawner: FoodSpawner::new(bounds),
            config,
            events: Vec::new(),
            rng,
        };
        session.reset_round();
        session
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.config.grid
    }

    /// Time banked towards the next move.
    #[must_use]
    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Takes all notifications raised since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advances the simulation by one frame of `elapsed` time.
    ///
    /// Does nothing outside [`Phase::Playing`]. Performs at most one move,
    /// once the accumulator reaches the difficulty's tick interval, and then
    /// restarts the accumulator from zero.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.phase.is_simulating() {
            return;
        }

        self.accumulator += elapsed;
        if self.accumulator < self.difficulty.tick_interval() {
            return;
        }
        self.accumulator = Duration::ZERO;

        self.step();
    }

    /// Performs one discrete move regardless of the accumulator.
    pub fn step(&mut self) {
        if !self.phase.is_simulating() {
            return;
        }

        self.tick_count += 1;
        self.snake.advance();
        let head = self.snake.head();

        if hits_food(head, self.food, self.config.food_collision) {
            self.snake.mark_growth();
            self.respawn_food();

            let points = food_points(self.difficulty.score_multiplier());
            self.score += points;
            self.events.push(SessionEvent::Ate { points });
        }

        if let Some(reason) = detect_death(&self.snake, self.bounds()) {
            self.death_reason = Some(reason);
            self.apply_action(Action::Collision);
            self.events.push(SessionEvent::Collided(reason));

            if self.score > self.high_score {
                self.high_score = self.score;
                self.new_record = true;
                self.events.push(SessionEvent::NewHighScore(self.score));
            }
        }
    }

    /// Applies a phase transition if the table allows it.
    ///
    /// Returns whether the action was legal in the current phase.
    pub fn apply_action(&mut self, action: Action) -> bool {
        let Some(transition) = self.phase.next(action) else {
            return false;
        };

        if transition.commits_difficulty {
            self.difficulty = self.menu.highlighted_difficulty();
        }
        if transition.resets_round {
            self.reset_round();
        }

        let from = self.phase;
        self.phase = transition.to;
        self.events.push(SessionEvent::PhaseChanged {
            from,
            to: self.phase,
        });
        true
    }

    /// Routes one input token according to the current phase.
    pub fn apply_input(&mut self, input: GameInput) -> InputOutcome {
        if input == GameInput::Exit {
            return InputOutcome::Exit;
        }

        match self.phase {
            Phase::Menu => return self.menu_input(input),
            Phase::DifficultySelect => self.difficulty_input(input),
            Phase::Playing => match input {
                GameInput::Direction(direction) => {
                    self.snake.steer(direction);
                }
                GameInput::Cancel | GameInput::Pause => {
                    self.apply_action(Action::Pause);
                }
                _ => {}
            },
            Phase::Paused => match input {
                GameInput::Cancel | GameInput::Pause => {
                    self.apply_action(Action::Resume);
                }
                GameInput::Quit => {
                    self.apply_action(Action::QuitToMenu);
                }
                _ => {}
            },
            Phase::GameOver => match input {
                GameInput::Confirm => {
                    self.apply_action(Action::Restart);
                }
                GameInput::Quit => {
                    self.apply_action(Action::QuitToMenu);
                }
                _ => {}
            },
        }

        InputOutcome::Continue
    }

    /// Highlights and triggers a main-menu button, as a mouse click does.
    pub fn activate_menu_item(&mut self, item: MainMenuItem) -> InputOutcome {
        if self.phase != Phase::Menu {
            return InputOutcome::Continue;
        }

        if let Some(index) = MainMenuItem::ALL.iter().position(|entry| *entry == item) {
            self.menu.main.select(index);
        }
        self.events.push(SessionEvent::MenuMoved);

        match item {
            MainMenuItem::StartGame => {
                self.apply_action(Action::Start);
            }
            MainMenuItem::Settings => {
                self.apply_action(Action::OpenSettings);
            }
            MainMenuItem::Quit => return InputOutcome::Exit,
        }

        InputOutcome::Continue
    }

    fn menu_input(&mut self, input: GameInput) -> InputOutcome {
        match input {
            GameInput::Direction(Direction::Up) => {
                self.menu.main.up();
                self.events.push(SessionEvent::MenuMoved);
            }
            GameInput::Direction(Direction::Down) => {
                self.menu.main.down();
                self.events.push(SessionEvent::MenuMoved);
            }
            GameInput::Confirm => return self.activate_menu_item(self.menu.selected_item()),
            GameInput::Settings => {
                self.apply_action(Action::OpenSettings);
            }
            GameInput::Quit => return InputOutcome::Exit,
            _ => {}
        }

        InputOutcome::Continue
    }

    fn difficulty_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(Direction::Up) => {
                self.menu.difficulty.up();
                self.events.push(SessionEvent::MenuMoved);
            }
            GameInput::Direction(Direction::Down) => {
                self.menu.difficulty.down();
                self.events.push(SessionEvent::MenuMoved);
            }
            GameInput::Confirm => {
                self.apply_action(Action::ConfirmDifficulty);
            }
            GameInput::Digit(number) => {
                if let Some(difficulty) = Difficulty::from_number(number) {
                    self.menu.difficulty.select(difficulty.index());
                    self.apply_action(Action::ConfirmDifficulty);
                }
            }
            GameInput::Cancel => {
                self.menu.difficulty.select(self.difficulty.index());
                self.apply_action(Action::CancelDifficulty);
            }
            _ => {}
        }
    }

    fn reset_round(&mut self) {
        self.snake
            .reset(Position::center_of(self.bounds()), Direction::Right);
        self.score = 0;
        self.tick_count = 0;
        self.death_reason = None;
        self.new_record = false;
        self.accumulator = Duration::ZERO;
        self.respawn_food();
    }

    fn respawn_food(&mut self) {
        match self.spawner.spawn(&mut self.rng, &self.snake.occupied()) {
            Some(position) => self.food = position,
            None => warn!("no free cell left for food, keeping it at {:?}", self.food),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::collision::DeathReason;
    use crate::config::{Difficulty, GameConfig, GridSize};
    use crate::input::{Direction, GameInput};
    use crate::phase::{Action, MainMenuItem, Phase};
    use crate::snake::{Position, Snake};

    use super::{food_points, GameSession, InputOutcome, SessionEvent};

    fn config(width: u16, height: u16) -> GameConfig {
        GameConfig {
            grid: GridSize { width, height },
            ..GameConfig::default()
        }
    }

    fn playing(width: u16, height: u16, seed: u64) -> GameSession {
        let mut session = GameSession::new_with_seed(config(width, height), seed);
        assert!(session.apply_action(Action::Start));
        session.drain_events();
        session
    }

    #[test]
    fn new_session_waits_in_menu() {
        let mut session = GameSession::new_with_seed(config(10, 10), 1);

        session.tick(Duration::from_secs(5));

        assert_eq!(session.phase(), Phase::Menu);
        assert_eq!(session.tick_count, 0);
        assert!(!session.snake.occupies(session.food));
    }

    #[test]
    fn snake_grows_after_eating_food() {
        let mut session = playing(10, 10, 1);
        session.snake = Snake::new(Position { x: 1, y: 1 }, Direction::Right);
        session.food = Position { x: 2, y: 1 };

        session.step();
        assert_eq!(session.snake.len(), 1);
        assert!(session.snake.growth_pending());

        session.step();
        assert_eq!(session.snake.len(), 2);
    }

    #[test]
    fn score_uses_truncated_multiplier() {
        assert_eq!(food_points(1.0), 10);
        assert_eq!(food_points(1.5), 15);
        assert_eq!(food_points(1.25), 12);

        let mut session = playing(10, 10, 4);
        session.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);
        session.food = Position { x: 6, y: 5 };

        session.step();

        assert_eq!(session.score, 15);
        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::Ate { points: 15 }]
        );
        assert!(!session.snake.occupies(session.food));
    }

    #[test]
    fn wall_collision_ends_round_and_records_high_score() {
        let mut session = playing(4, 4, 2);
        session.high_score = 5;
        session.score = 30;
        session.snake = Snake::new(Position { x: 3, y: 1 }, Direction::Right);

        session.step();

        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.death_reason, Some(DeathReason::WallCollision));
        assert_eq!(session.high_score, 30);
        assert!(session.new_record);
        assert!(session
            .drain_events()
            .contains(&SessionEvent::NewHighScore(30)));
    }

    #[test]
    fn lower_score_keeps_previous_high_score() {
        let mut session = playing(4, 4, 2);
        session.high_score = 50;
        session.score = 20;
        session.snake = Snake::new(Position { x: 0, y: 1 }, Direction::Left);

        session.step();

        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.high_score, 50);
        assert!(!session.new_record);
    }

    #[test]
    fn tying_the_best_score_is_not_a_new_record() {
        let mut session = playing(4, 4, 2);
        session.high_score = 30;
        session.score = 30;
        session.snake = Snake::new(Position { x: 0, y: 1 }, Direction::Left);

        session.step();

        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.high_score, 30);
        assert!(!session.new_record);
        assert!(!session
            .drain_events()
            .iter()
            .any(|event| matches!(event, SessionEvent::NewHighScore(_))));
    }

    #[test]
    fn self_collision_sets_game_over() {
        let mut session = playing(6, 6, 3);
        session.food = Position { x: 5, y: 5 };
        session.snake = Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
                Position { x: 1, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Down,
        );

        session.step();

        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.death_reason, Some(DeathReason::SelfCollision));
    }

    #[test]
    fn accumulator_moves_once_per_interval() {
        let mut session = playing(40, 30, 5);
        let interval = Difficulty::Medium.tick_interval();

        session.tick(interval - Duration::from_millis(1));
        assert_eq!(session.tick_count, 0);

        session.tick(Duration::from_millis(1));
        assert_eq!(session.tick_count, 1);
        assert_eq!(session.accumulated(), Duration::ZERO);
    }

    #[test]
    fn pause_freezes_simulation() {
        let mut session = playing(40, 30, 6);

        session.apply_input(GameInput::Pause);
        assert_eq!(session.phase(), Phase::Paused);
        session.tick(Duration::from_secs(2));
        assert_eq!(session.tick_count, 0);

        let head = session.snake.head();
        session.apply_input(GameInput::Cancel);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.snake.head(), head);
    }

    #[test]
    fn confirm_in_menu_starts_round() {
        let mut session = GameSession::new_with_seed(config(20, 20), 7);

        let outcome = session.apply_input(GameInput::Confirm);

        assert_eq!(outcome, InputOutcome::Continue);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.snake.head(), Position { x: 10, y: 10 });
    }

    #[test]
    fn menu_quit_button_exits() {
        let mut session = GameSession::new_with_seed(config(20, 20), 8);

        session.apply_input(GameInput::Direction(Direction::Up));
        assert_eq!(session.menu().selected_item(), MainMenuItem::Quit);
        assert_eq!(session.apply_input(GameInput::Confirm), InputOutcome::Exit);
    }

    #[test]
    fn settings_confirm_commits_highlighted_difficulty() {
        let mut session = GameSession::new_with_seed(config(20, 20), 9);

        session.apply_input(GameInput::Settings);
        assert_eq!(session.phase(), Phase::DifficultySelect);
        session.apply_input(GameInput::Direction(Direction::Down));
        session.apply_input(GameInput::Confirm);

        assert_eq!(session.phase(), Phase::Menu);
        assert_eq!(session.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn settings_cancel_keeps_difficulty() {
        let mut session = GameSession::new_with_seed(config(20, 20), 10);

        session.activate_menu_item(MainMenuItem::Settings);
        session.apply_input(GameInput::Direction(Direction::Up));
        session.apply_input(GameInput::Cancel);

        assert_eq!(session.phase(), Phase::Menu);
        assert_eq!(session.difficulty(), Difficulty::Medium);
        assert_eq!(
            session.menu().highlighted_difficulty(),
            Difficulty::Medium
        );
    }

    #[test]
    fn number_key_picks_difficulty_directly() {
        let mut session = GameSession::new_with_seed(config(20, 20), 11);

        session.apply_input(GameInput::Settings);
        session.apply_input(GameInput::Digit(4));

        assert_eq!(session.phase(), Phase::Menu);
        assert_eq!(session.difficulty(), Difficulty::Expert);
    }

    #[test]
    fn restart_keeps_difficulty_and_high_score() {
        let mut session = playing(4, 4, 12);
        session.score = 40;
        session.snake = Snake::new(Position { x: 3, y: 0 }, Direction::Up);
        session.step();
        assert_eq!(session.phase(), Phase::GameOver);

        session.apply_input(GameInput::Confirm);

        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.snake.len(), 1);
        assert_eq!(session.high_score, 40);
        assert!(!session.new_record);
        assert_eq!(session.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn quit_from_pause_returns_to_menu() {
        let mut session = playing(20, 20, 13);

        session.apply_input(GameInput::Cancel);
        session.apply_input(GameInput::Quit);

        assert_eq!(session.phase(), Phase::Menu);
    }

    #[test]
    fn exit_input_leaves_from_any_phase() {
        let mut session = playing(20, 20, 14);
        assert_eq!(session.apply_input(GameInput::Exit), InputOutcome::Exit);
    }

    #[test]
    fn illegal_actions_are_ignored() {
        let mut session = GameSession::new_with_seed(config(20, 20), 15);

        assert!(!session.apply_action(Action::Resume));
        assert!(!session.apply_action(Action::Collision));
        assert_eq!(session.phase(), Phase::Menu);
    }
}
