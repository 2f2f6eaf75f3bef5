use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

const APP_DIR_NAME: &str = "arcade-snake";
const SCORE_FILE_NAME: &str = "highscore.txt";

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// A high score persisted as a plain decimal integer in a text file.
#[derive(Debug, Clone)]
pub struct PersistentScore {
    path: PathBuf,
}

impl PersistentScore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses [`scores_path`].
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored score. Missing or malformed files count as 0.
    #[must_use]
    pub fn load(&self) -> u32 {
        load_high_score_from_path(&self.path)
    }

    /// Writes the score, creating parent directories when needed.
    pub fn save(&self, score: u32) -> io::Result<()> {
        save_high_score_to_path(&self.path, score)
    }
}

fn load_high_score_from_path(path: &Path) -> u32 {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return 0,
        Err(e) => {
            warn!("could not read high score from {}: {e}", path.display());
            return 0;
        }
    };

    match raw.trim().parse::<u32>() {
        Ok(score) => score,
        Err(e) => {
            warn!("ignoring malformed high score in {}: {e}", path.display());
            0
        }
    }
}

fn save_high_score_to_path(path: &Path, score: u32) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, score.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{load_high_score_from_path, save_high_score_to_path, PersistentScore};

    #[test]
    fn saved_score_is_plain_decimal_text() {
        let path = unique_test_path("plain_text");

        save_high_score_to_path(&path, 42).expect("score save should succeed");

        assert_eq!(fs::read_to_string(&path).expect("file exists"), "42");
        assert_eq!(load_high_score_from_path(&path), 42);
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_score_file_returns_zero() {
        let path = unique_test_path("missing");
        // Deliberately do not create the file.
        assert_eq!(PersistentScore::new(path).load(), 0);
    }

    #[test]
    fn malformed_score_file_returns_zero() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "not-a-number").expect("test file write should succeed");

        assert_eq!(load_high_score_from_path(&path), 0);

        cleanup_test_path(&path);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let path = unique_test_path("whitespace");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "17\n").expect("test file write should succeed");

        assert_eq!(PersistentScore::new(path.clone()).load(), 17);

        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("arcade-snake-score-tests")
            .join(format!("{label}-{nanos}.txt"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
