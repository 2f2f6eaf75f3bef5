use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use ratatui::style::Color;
use serde::Deserialize;
use thiserror::Error;

use crate::collision::FoodCollision;

const APP_DIR_NAME: &str = "arcade-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Named difficulty presets.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// One row of the fixed difficulty table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    /// Nominal speed shown to the player.
    pub speed: u32,
    pub tick_interval: Duration,
    pub score_multiplier: f64,
}

impl Difficulty {
    /// All presets in menu order.
    pub const ALL: [Self; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Expert];

    #[must_use]
    pub fn settings(self) -> DifficultySettings {
        let (speed, score_multiplier) = match self {
            Self::Easy => (8, 1.0),
            Self::Medium => (12, 1.5),
            Self::Hard => (18, 2.0),
            Self::Expert => (25, 3.0),
        };

        DifficultySettings {
            speed,
            tick_interval: tick_interval_for_speed(speed),
            score_multiplier,
        }
    }

    #[must_use]
    pub fn tick_interval(self) -> Duration {
        self.settings().tick_interval
    }

    #[must_use]
    pub fn score_multiplier(self) -> f64 {
        self.settings().score_multiplier
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
        }
    }

    /// Position in [`Difficulty::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
            Self::Expert => 3,
        }
    }

    /// Maps a one-based number key to a preset.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }
}

/// Milliseconds between moves for a nominal speed, floored at [`MIN_TICK_INTERVAL_MS`].
#[must_use]
pub fn tick_interval_for_speed(speed: u32) -> Duration {
    let speed_penalty_ms = u64::from(speed) * 5;
    let clamped_ms = BASE_TICK_INTERVAL_MS
        .saturating_sub(speed_penalty_ms)
        .max(MIN_TICK_INTERVAL_MS);
    Duration::from_millis(clamped_ms)
}

/// Base tick interval in milliseconds before the speed penalty.
pub const BASE_TICK_INTERVAL_MS: u64 = 200;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Points for one food before the difficulty multiplier.
pub const BASE_FOOD_VALUE: u32 = 10;

/// Settings for the menu-driven variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    /// Difficulty selected when the program starts.
    pub difficulty: Difficulty,
    /// Target frames per second of the render loop.
    pub frame_rate: u32,
    pub theme: String,
    pub food_collision: FoodCollision,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: 40,
                height: 30,
            },
            difficulty: Difficulty::Medium,
            frame_rate: 60,
            theme: THEME_CLASSIC.name.to_owned(),
            food_collision: FoodCollision::ExactCell,
        }
    }
}

impl GameConfig {
    /// Duration of one render frame at the configured frame rate.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    /// Rejects grids outside 2..=200 per side, frame rates outside 1..=240 and
    /// a zero-sized proximity cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_grid("arcade.grid", self.grid)?;
        if !(1..=240).contains(&self.frame_rate) {
            return Err(ConfigError::Invalid(format!(
                "arcade.frame_rate must be within 1..=240, got {}",
                self.frame_rate
            )));
        }
        if self.food_collision == (FoodCollision::Proximity { cell_pixels: 0 }) {
            return Err(ConfigError::Invalid(
                "arcade.food_collision.proximity.cell_pixels must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Settings for the classic variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassicConfig {
    pub grid: GridSize,
    /// Width of one cell in the pixel space used by proximity food collision.
    pub cell_pixels: u32,
    pub frame_delay_ms: u64,
    /// Frames the "ouch" display stays up before the automatic reset.
    pub dead_display_frames: u32,
    pub theme: String,
}

impl Default for ClassicConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: 20,
                height: 20,
            },
            cell_pixels: 32,
            frame_delay_ms: 110,
            dead_display_frames: 6,
            theme: THEME_MEADOW.name.to_owned(),
        }
    }
}

impl ClassicConfig {
    #[must_use]
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    #[must_use]
    pub fn food_collision(&self) -> FoodCollision {
        FoodCollision::Proximity {
            cell_pixels: self.cell_pixels,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_grid("classic.grid", self.grid)?;
        if self.cell_pixels == 0 {
            return Err(ConfigError::Invalid(
                "classic.cell_pixels must be at least 1".to_owned(),
            ));
        }
        if self.frame_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "classic.frame_delay_ms must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

fn validate_grid(field: &str, grid: GridSize) -> Result<(), ConfigError> {
    let valid = 2..=200;
    if !valid.contains(&grid.width) || !valid.contains(&grid.height) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 2x2 and 200x200, got {}x{}",
            grid.width, grid.height
        )));
    }
    Ok(())
}

/// On-disk configuration, one section per game variant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub arcade: GameConfig,
    pub classic: ClassicConfig,
}

impl ConfigFile {
    /// Checks every section, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arcade.validate()?;
        self.classic.validate()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Returns the platform-correct default config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Loads configuration.
///
/// An explicit `path` must exist. Without one, the default location is tried
/// and a missing file yields the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    load_config_from(path, default_config_path())
}

fn load_config_from(
    path: Option<&Path>,
    default_path: Option<PathBuf>,
) -> Result<ConfigFile, ConfigError> {
    let config = match path {
        Some(path) => read_config_file(path)?,
        None => match default_path {
            Some(default_path) if default_path.exists() => read_config_file(&default_path)?,
            _ => ConfigFile::default(),
        },
    };

    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    /// Background of empty play-area cells.
    pub play_bg: Color,
    /// Second checkerboard tone; equal to `play_bg` for flat themes.
    pub play_bg_alt: Color,
    pub border_fg: Color,
    pub hud_score: Color,
    pub hud_muted: Color,
    pub menu_title: Color,
    pub menu_highlight: Color,
    pub menu_footer: Color,
}

/// Classic green snake on dark theme.
pub const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    food: Color::Red,
    play_bg: Color::Black,
    play_bg_alt: Color::Black,
    border_fg: Color::Gray,
    hud_score: Color::White,
    hud_muted: Color::DarkGray,
    menu_title: Color::Green,
    menu_highlight: Color::LightGreen,
    menu_footer: Color::DarkGray,
};

/// Ocean cyan theme.
pub const THEME_OCEAN: Theme = Theme {
    name: "Ocean",
    snake_head: Color::White,
    snake_body: Color::Cyan,
    food: Color::Yellow,
    play_bg: Color::Black,
    play_bg_alt: Color::Black,
    border_fg: Color::Cyan,
    hud_score: Color::Cyan,
    hud_muted: Color::DarkGray,
    menu_title: Color::Cyan,
    menu_highlight: Color::LightCyan,
    menu_footer: Color::DarkGray,
};

/// Neon magenta/yellow theme.
pub const THEME_NEON: Theme = Theme {
    name: "Neon",
    snake_head: Color::White,
    snake_body: Color::Magenta,
    food: Color::Yellow,
    play_bg: Color::Black,
    play_bg_alt: Color::Black,
    border_fg: Color::Magenta,
    hud_score: Color::Magenta,
    hud_muted: Color::DarkGray,
    menu_title: Color::Magenta,
    menu_highlight: Color::LightMagenta,
    menu_footer: Color::DarkGray,
};

/// Navy snake on a two-tone grass checkerboard.
pub const THEME_MEADOW: Theme = Theme {
    name: "Meadow",
    snake_head: Color::Rgb(0, 0, 50),
    snake_body: Color::Rgb(0, 0, 110),
    food: Color::Rgb(255, 0, 0),
    play_bg: Color::Rgb(156, 210, 54),
    play_bg_alt: Color::Rgb(147, 203, 57),
    border_fg: Color::Rgb(90, 140, 30),
    hud_score: Color::White,
    hud_muted: Color::DarkGray,
    menu_title: Color::LightGreen,
    menu_highlight: Color::Yellow,
    menu_footer: Color::DarkGray,
};

/// All available themes.
pub const THEMES: &[Theme] = &[THEME_CLASSIC, THEME_OCEAN, THEME_NEON, THEME_MEADOW];

/// Looks a theme up by name (case-insensitive), falling back to the first theme.
#[must_use]
pub fn theme_by_name(name: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.name.eq_ignore_ascii_case(name))
        .unwrap_or(&THEMES[0])
}

/// Terminal columns used to draw one grid cell.
pub const CELL_COLUMNS: u16 = 2;

/// Glyph for one snake segment (two columns wide).
pub const GLYPH_SNAKE_BODY: &str = "██";

/// Glyph for the snake head.
pub const GLYPH_SNAKE_HEAD: &str = "██";

/// Glyph for food.
pub const GLYPH_FOOD: &str = "▐▌";

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{
        load_config, load_config_from, theme_by_name, ClassicConfig, ConfigError, ConfigFile,
        Difficulty, GameConfig, GridSize,
    };
    use crate::collision::FoodCollision;

    #[test]
    fn difficulty_table_matches_speed_formula() {
        let intervals: Vec<u128> = Difficulty::ALL
            .iter()
            .map(|difficulty| difficulty.tick_interval().as_millis())
            .collect();

        assert_eq!(intervals, vec![160, 140, 110, 75]);
        assert_eq!(Difficulty::Medium.score_multiplier(), 1.5);
        assert_eq!(Difficulty::Expert.settings().speed, 25);
    }

    #[test]
    fn faster_presets_have_shorter_intervals() {
        for pair in Difficulty::ALL.windows(2) {
            assert!(pair[0].tick_interval() > pair[1].tick_interval());
        }
    }

    #[test]
    fn number_keys_map_to_presets() {
        assert_eq!(Difficulty::from_number(1), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_number(4), Some(Difficulty::Expert));
        assert_eq!(Difficulty::from_number(0), None);
        assert_eq!(Difficulty::from_number(5), None);

        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::ALL[difficulty.index()], difficulty);
        }
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let raw = r#"{ "arcade": { "difficulty": "hard", "grid": { "width": 24, "height": 16 } } }"#;
        let config: ConfigFile = serde_json::from_str(raw).expect("config should parse");

        assert_eq!(config.arcade.difficulty, Difficulty::Hard);
        assert_eq!(
            config.arcade.grid,
            GridSize {
                width: 24,
                height: 16
            }
        );
        assert_eq!(config.arcade.frame_rate, 60);
        assert_eq!(config.classic, ClassicConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn food_collision_policy_is_configurable() {
        let raw = r#"{ "food_collision": { "proximity": { "cell_pixels": 20 } } }"#;
        let config: GameConfig = serde_json::from_str(raw).expect("config should parse");

        assert_eq!(
            config.food_collision,
            FoodCollision::Proximity { cell_pixels: 20 }
        );
    }

    #[test]
    fn tiny_grid_is_rejected() {
        let mut config = ConfigFile::default();
        config.arcade.grid = GridSize {
            width: 1,
            height: 10,
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn frame_duration_follows_frame_rate() {
        let config = GameConfig::default();
        assert_eq!(config.frame_duration(), Duration::from_secs(1) / 60);
        assert_eq!(ClassicConfig::default().frame_delay(), Duration::from_millis(110));
    }

    #[test]
    fn unknown_theme_falls_back_to_first() {
        assert_eq!(theme_by_name("ocean").name, "Ocean");
        assert_eq!(theme_by_name("does-not-exist").name, "Classic");
    }

    #[test]
    fn zero_proximity_cell_is_rejected() {
        let config = GameConfig {
            food_collision: FoodCollision::Proximity { cell_pixels: 0 },
            ..GameConfig::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let path = unique_test_path("missing");
        // Deliberately do not create the file.
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let path = unique_test_path("absent-default");

        let config = load_config_from(None, Some(path)).expect("defaults should load");

        assert_eq!(config, ConfigFile::default());
        assert_eq!(
            load_config_from(None, None).expect("defaults should load"),
            ConfigFile::default()
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = write_test_config("malformed", "{ \"arcade\": ");

        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));

        cleanup_test_path(&path);
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let path = write_test_config("invalid", r#"{ "arcade": { "frame_rate": 0 } }"#);

        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Invalid(_))
        ));

        cleanup_test_path(&path);
    }

    #[test]
    fn existing_default_file_is_read() {
        let path = write_test_config("default", r#"{ "classic": { "frame_delay_ms": 90 } }"#);

        let config = load_config_from(None, Some(path.clone())).expect("config should load");

        assert_eq!(config.classic.frame_delay(), Duration::from_millis(90));
        assert_eq!(config.arcade, GameConfig::default());

        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("arcade-snake-config-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn write_test_config(label: &str, contents: &str) -> PathBuf {
        let path = unique_test_path(label);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, contents).expect("test file write should succeed");
        path
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
