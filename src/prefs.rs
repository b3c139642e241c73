use crate::error::AppError;
use crate::region::Region;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MAX_RECENT_SEARCHES: usize = 5;
pub const MAX_TRACKED_PLAYERS: usize = 3;
const PREFERENCES_FILE: &str = "preferences.json";

/// User choices that outlive a single lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub region: Region,
    /// Most recent first, no duplicates.
    pub recent_searches: Vec<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    path: PathBuf,
}

impl Preferences {
    pub fn new(data_dir: &Path) -> Self {
        Preferences {
            region: Region::default(),
            recent_searches: Vec::new(),
            updated_at: Utc::now(),
            path: data_dir.join(PREFERENCES_FILE),
        }
    }

    /// Loads saved preferences. A missing or unreadable file gives defaults.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(PREFERENCES_FILE);

        match fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<Preferences>(&content).ok())
        {
            Some(mut prefs) => {
                prefs.path = path;
                prefs
            }
            None => Preferences::new(data_dir),
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Cache(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Json(format!("Failed to serialize preferences: {}", e)))?;

        fs::write(&self.path, json)
            .map_err(|e| AppError::Cache(format!("Failed to write preferences: {}", e)))?;

        Ok(())
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = region;
        self.updated_at = Utc::now();
    }

    pub fn add_recent_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        self.recent_searches.retain(|s| s != query);
        self.recent_searches.insert(0, query.to_string());
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
        self.updated_at = Utc::now();
    }

    /// Searches made before the latest one, at most [`MAX_TRACKED_PLAYERS`].
    pub fn tracked_players(&self) -> &[String] {
        let end = self.recent_searches.len().min(MAX_TRACKED_PLAYERS + 1);
        self.recent_searches.get(1..end).unwrap_or(&[])
    }
}
