//! Ordered levels and unlock progress.
//!
//! Storing `Progress` is the host's job; this module only decides what a
//! saved snapshot means and how it moves forward when a level is solved.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::level::LevelSpec;
use crate::state::PuzzleSession;

/// Snapshot the host may persist between visits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub level_index: usize,
    #[serde(default, alias = "maxUnlockedLevel")]
    pub max_unlocked: usize,
}

#[derive(Debug, Clone)]
pub struct Campaign {
    levels: Vec<LevelSpec>,
    progress: Progress,
}

impl Campaign {
    pub fn new(levels: Vec<LevelSpec>) -> Self {
        Campaign {
            levels,
            progress: Progress::default(),
        }
    }

    /// Decode a JSON array of level documents. Each level is decoded leniently.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let levels: Vec<LevelSpec> = match value.as_array() {
            Some(docs) => docs.iter().map(LevelSpec::from_value).collect(),
            None => {
                log::warn!("level list is not an array; reading it as a single level");
                vec![LevelSpec::from_value(&value)]
            }
        };
        Ok(Campaign::new(levels))
    }

    /// Build a campaign positioned at a saved snapshot.
    pub fn with_progress(levels: Vec<LevelSpec>, saved: Progress) -> Self {
        let mut campaign = Campaign::new(levels);
        campaign.restore(saved);
        campaign
    }

    /// Adopt a saved snapshot. Unknown or locked positions fall back to the first level.
    pub fn restore(&mut self, saved: Progress) {
        let last = self.levels.len().saturating_sub(1);
        let max_unlocked = saved.max_unlocked.min(last);
        let in_range = saved.level_index < self.levels.len();
        let level_index = if in_range && saved.level_index <= max_unlocked {
            saved.level_index
        } else {
            0
        };
        if (level_index, max_unlocked) != (saved.level_index, saved.max_unlocked) {
            log::warn!(
                "saved progress {saved:?} adjusted to level {level_index}, unlocked {max_unlocked}"
            );
        }
        self.progress = Progress {
            level_index,
            max_unlocked,
        };
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level(&self, index: usize) -> Option<&LevelSpec> {
        self.levels.get(index)
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn current_index(&self) -> usize {
        self.progress.level_index
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        index < self.levels.len() && index <= self.progress.max_unlocked
    }

    /// Begin level `index`, making it the current one.
    pub fn start(&mut self, index: usize) -> Result<PuzzleSession> {
        let level = self.levels.get(index).ok_or(Error::UnknownLevel {
            index,
            count: self.levels.len(),
        })?;
        if index > self.progress.max_unlocked {
            return Err(Error::LevelLocked {
                index,
                max_unlocked: self.progress.max_unlocked,
            });
        }
        self.progress.level_index = index;
        log::info!("starting level {index}");
        Ok(PuzzleSession::new(level.clone()))
    }

    /// Begin the current level again from its saved position.
    pub fn resume(&mut self) -> Result<PuzzleSession> {
        self.start(self.progress.level_index)
    }

    /// Mark the current level solved. Unlocks the next level when the current one
    /// is the frontier, and returns the index to play next (wrapping to the first).
    pub fn complete_current(&mut self) -> usize {
        let current = self.progress.level_index;
        if current == self.progress.max_unlocked && current + 1 < self.levels.len() {
            self.progress.max_unlocked += 1;
            log::info!("unlocked level {}", self.progress.max_unlocked);
        }
        if self.levels.is_empty() {
            0
        } else {
            (current + 1) % self.levels.len()
        }
    }
}
