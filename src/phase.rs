//! Front-end phase machine for the arcade variant.
//!
//! Every legal move between phases is listed in [`Phase::next`]; anything not
//! listed there is ignored by the session.

use crate::config::Difficulty;

/// Coarse mode of the arcade application.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    Menu,
    DifficultySelect,
    Playing,
    Paused,
    GameOver,
}

/// Requests that may move the machine between phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    Start,
    OpenSettings,
    ConfirmDifficulty,
    CancelDifficulty,
    Pause,
    Resume,
    QuitToMenu,
    /// Raised by the simulation, never by the player.
    Collision,
    Restart,
}

/// Result of a legal transition.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Transition {
    pub to: Phase,
    /// Snake, food and score start over.
    pub resets_round: bool,
    /// The highlighted difficulty becomes the active one.
    pub commits_difficulty: bool,
}

impl Transition {
    const fn to(phase: Phase) -> Self {
        Self {
            to: phase,
            resets_round: false,
            commits_difficulty: false,
        }
    }

    const fn resetting(phase: Phase) -> Self {
        Self {
            to: phase,
            resets_round: true,
            commits_difficulty: false,
        }
    }

    const fn committing(phase: Phase) -> Self {
        Self {
            to: phase,
            resets_round: false,
            commits_difficulty: true,
        }
    }
}

impl Phase {
    /// Looks `action` up in the transition table.
    #[must_use]
    pub fn next(self, action: Action) -> Option<Transition> {
        use Action as A;
        use Phase as P;

        let transition = match (self, action) {
            (P::Menu, A::Start) => Transition::resetting(P::Playing),
            (P::Menu, A::OpenSettings) => Transition::to(P::DifficultySelect),
            (P::DifficultySelect, A::ConfirmDifficulty) => Transition::committing(P::Menu),
            (P::DifficultySelect, A::CancelDifficulty) => Transition::to(P::Menu),
            (P::Playing, A::Pause) => Transition::to(P::Paused),
            (P::Paused, A::Resume) => Transition::to(P::Playing),
            (P::Paused, A::QuitToMenu) => Transition::to(P::Menu),
            (P::Playing, A::Collision) => Transition::to(P::GameOver),
            (P::GameOver, A::Restart) => Transition::resetting(P::Playing),
            (P::GameOver, A::QuitToMenu) => Transition::to(P::Menu),
            _ => return None,
        };

        Some(transition)
    }

    /// Only this phase runs the simulation tick.
    #[must_use]
    pub fn is_simulating(self) -> bool {
        self == Self::Playing
    }

    /// Phases drawn as the board plus HUD, with any overlay on top.
    #[must_use]
    pub fn shows_board(self) -> bool {
        matches!(self, Self::Playing | Self::Paused | Self::GameOver)
    }
}

/// Buttons on the main menu, top to bottom.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MainMenuItem {
    StartGame,
    Settings,
    Quit,
}

impl MainMenuItem {
    pub const ALL: [Self; 3] = [Self::StartGame, Self::Settings, Self::Quit];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::StartGame => "START GAME",
            Self::Settings => "SETTINGS",
            Self::Quit => "QUIT",
        }
    }
}

/// Wrapping highlight over a fixed list of options.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    /// # Panics
    ///
    /// Panics when `len` is zero.
    #[must_use]
    pub fn new(index: usize, len: usize) -> Self {
        assert!(len > 0, "cursor needs at least one option");
        Self {
            index: index % len,
            len,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    pub fn up(&mut self) {
        self.index = (self.index + self.len - 1) % self.len;
    }

    pub fn down(&mut self) {
        self.index = (self.index + 1) % self.len;
    }

    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }
}

/// Highlight state of the main menu and the difficulty list.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MenuState {
    pub main: Cursor,
    pub difficulty: Cursor,
}

impl MenuState {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            main: Cursor::new(0, MainMenuItem::ALL.len()),
            difficulty: Cursor::new(difficulty.index(), Difficulty::ALL.len()),
        }
    }

    #[must_use]
    pub fn selected_item(&self) -> MainMenuItem {
        MainMenuItem::ALL[self.main.index()]
    }

    #[must_use]
    pub fn highlighted_difficulty(&self) -> Difficulty {
        Difficulty::ALL[self.difficulty.index()]
    }
}
