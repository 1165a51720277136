//! Local high-score table backed by sled
//!
//! Every finished round is appended with a monotonically increasing key.
//! Ranking is done on read: score descending, earliest game first on ties.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::settings::{normalize_player_name, DEFAULT_PLAYER_NAME};

const TREE_SCORES: &str = "high_scores";

/// How many entries the high-score screen lists
pub const DISPLAY_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub player_name: String,
    pub score: u32,
    pub level: u32,
    pub played_at: DateTime<Utc>,
}

pub struct HighScoreStore {
    db: sled::Db,
    scores: sled::Tree,
}

impl HighScoreStore {
    /// Open (or create) the score database in the directory `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScoreStoreError> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        let scores = db.open_tree(TREE_SCORES)?;
        debug!("opened score table at {:?} ({} entries)", path, scores.len());
        Ok(Self { db, scores })
    }

    /// Record a finished round; blank names are stored as the default player
    pub fn add_score(
        &self,
        player_name: &str,
        score: u32,
        level: u32,
        played_at: DateTime<Utc>,
    ) -> Result<(), ScoreStoreError> {
        let entry = HighScore {
            player_name: normalize_player_name(player_name)
                .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string()),
            score,
            level,
            played_at,
        };

        let id = self.db.generate_id()?;
        self.scores
            .insert(id.to_be_bytes(), serde_json::to_vec(&entry)?)?;
        self.scores.flush()?;
        Ok(())
    }

    /// Best `limit` rounds (at least one), highest score first
    pub fn top_scores(&self, limit: usize) -> Result<Vec<HighScore>, ScoreStoreError> {
        let mut all = Vec::with_capacity(self.scores.len());
        for item in self.scores.iter() {
            let (key, value) = item?;
            match serde_json::from_slice::<HighScore>(&value) {
                Ok(entry) => all.push(entry),
                Err(e) => warn!("skipping unreadable score record {:?}: {}", key, e),
            }
        }

        all.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.played_at.cmp(&b.played_at))
        });
        all.truncate(limit.max(1));
        Ok(all)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
