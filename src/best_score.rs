//! Best score persistence.
//!
//! The file holds a single decimal integer. A missing file means no best score
//! yet; a file that does not parse is treated the same way and overwritten on
//! the next record.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

pub const DEFAULT_BEST_SCORE_FILE: &str = "tetris2048_best_score.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestScore {
    path: PathBuf,
    best: u32,
}

impl BestScore {
    /// Read the stored best score; never fails.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let best = match fs::read_to_string(&path) {
            Ok(text) => match text.trim().parse::<u32>() {
                Ok(best) => best,
                Err(err) => {
                    warn!("ignoring malformed best score file {}: {err}", path.display());
                    0
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => 0,
            Err(err) => {
                warn!("cannot read best score file {}: {err}", path.display());
                0
            }
        };
        Self { path, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `score` if it beats the current best. Returns whether it did.
    pub fn record(&mut self, score: u32) -> Result<bool> {
        if score <= self.best {
            return Ok(false);
        }
        fs::write(&self.path, format!("{score}\n"))
            .with_context(|| format!("failed to write best score to {}", self.path.display()))?;
        info!("new best score {score} (was {})", self.best);
        self.best = score;
        Ok(true)
    }
}
