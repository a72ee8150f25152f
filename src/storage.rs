//! Persistence for favorited ideas and the last generation result.
//!
//! Favorites are a key-value store keyed by record identity: one JSON file
//! per favorite in a sharded directory, mirrored by an in-memory cache that
//! is loaded once at process start and written through on each mutation.
//! The result cache is a single JSON document overwritten wholesale after
//! each generation so later commands can promote records by id.

use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::{Favorite, Idea, IdeaError, IdeaFilter, Result};

/// Manages the storage and retrieval of favorited ideas.
pub struct FavoriteStore {
    /// Directory holding one JSON file per favorite
    favorites_dir: PathBuf,

    /// In-memory cache of favorites, indexed by idea id
    cache: Arc<Mutex<HashMap<String, Favorite>>>,

    /// Flag indicating the cache has been loaded from disk
    initialized: bool,
}

impl FavoriteStore {
    /// Creates a new store rooted at `favorites_dir`. Call [`load`] before
    /// first use.
    ///
    /// [`load`]: FavoriteStore::load
    pub fn new(favorites_dir: PathBuf) -> Self {
        Self {
            favorites_dir,
            cache: Arc::new(Mutex::new(HashMap::new())),
            initialized: false,
        }
    }

    /// Loads all favorites from disk into the in-memory cache.
    ///
    /// Unreadable files are skipped with a warning so that one corrupt entry
    /// does not take the whole collection down.
    pub fn load(&mut self) -> Result<usize> {
        if !self.favorites_dir.exists() {
            fs::create_dir_all(&self.favorites_dir).map_err(|e| {
                error!("Failed to create favorites directory: {}", e);
                IdeaError::DirectoryError {
                    path: self.favorites_dir.clone(),
                }
            })?;
            debug!(
                "Created favorites directory: {}",
                self.favorites_dir.display()
            );
            self.initialized = true;
            return Ok(0);
        }

        let mut buffer = HashMap::new();

        for entry in WalkDir::new(&self.favorites_dir)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                match load_favorite_from_file(path) {
                    Ok(favorite) => {
                        buffer.insert(favorite.idea.id.clone(), favorite);
                    }
                    Err(e) => {
                        warn!("Failed to load favorite from {}: {}", path.display(), e);
                    }
                }
            }
        }

        let count = buffer.len();
        let mut cache = self.lock_cache()?;
        cache.clear();
        cache.extend(buffer);
        drop(cache);

        info!("Loaded {} favorites into cache", count);
        self.initialized = true;
        Ok(count)
    }

    /// Promotes an idea into the favorites collection.
    ///
    /// Idempotent by id: favoriting an already-favorited idea is a no-op and
    /// returns false.
    pub fn add(&self, idea: &Idea) -> Result<bool> {
        {
            let cache = self.lock_cache()?;
            if cache.contains_key(&idea.id) {
                debug!("Idea {} already favorited", idea.id);
                return Ok(false);
            }
        }

        let favorite = Favorite::new(idea.clone());
        self.persist(&favorite)?;

        let mut cache = self.lock_cache()?;
        cache.insert(idea.id.clone(), favorite);

        info!("Favorited idea {} ('{}')", idea.id, idea.title);
        Ok(true)
    }

    /// Removes a favorite by id, deleting its file.
    pub fn remove(&self, id: &str) -> Result<()> {
        let removed = {
            let mut cache = self.lock_cache()?;
            cache.remove(id)
        };

        if removed.is_none() {
            return Err(IdeaError::IdeaNotFound { id: id.to_string() });
        }

        let path = self.favorite_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
        }

        info!("Removed favorite {}", id);
        Ok(())
    }

    /// Retrieves a favorite by idea id.
    pub fn get(&self, id: &str) -> Option<Favorite> {
        match self.cache.lock() {
            Ok(cache) => cache.get(id).cloned(),
            Err(e) => {
                error!("Failed to acquire lock on favorites cache: {}", e);
                None
            }
        }
    }

    /// Returns all favorites, newest first.
    pub fn all(&self) -> Result<Vec<Favorite>> {
        let cache = self.lock_cache()?;
        let mut favorites: Vec<Favorite> = cache.values().cloned().collect();
        favorites.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(favorites)
    }

    /// Returns the favorites matching `filter`, newest first.
    pub fn filter(&self, filter: &IdeaFilter) -> Result<Vec<Favorite>> {
        let favorites = self.all()?;
        Ok(favorites
            .into_iter()
            .filter(|f| filter.matches(&f.idea))
            .collect())
    }

    /// Searches favorites by title and description using fuzzy matching.
    /// Returns favorites sorted by relevance score; title matches are
    /// weighted more heavily.
    pub fn search(&self, query: &str) -> Vec<Favorite> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        debug!("Searching favorites with query: '{}'", query);
        let matcher = SkimMatcherV2::default();

        let favorites = match self.cache.lock() {
            Ok(cache) => cache.values().cloned().collect::<Vec<Favorite>>(),
            Err(e) => {
                error!("Failed to acquire lock on favorites cache: {}", e);
                return Vec::new();
            }
        };

        let mut scored: Vec<(i64, Favorite)> = favorites
            .into_iter()
            .filter_map(|favorite| {
                let title_score = matcher
                    .fuzzy_match(&favorite.idea.title, query)
                    .unwrap_or(0);
                let description_score = matcher
                    .fuzzy_match(&favorite.idea.description, query)
                    .unwrap_or(0);

                let score = title_score * 2 + description_score;
                if score > 0 {
                    Some((score, favorite))
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, favorite)| favorite).collect()
    }

    /// Number of favorites currently cached.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes a favorite to its file atomically: serialize to a tempfile in
    /// the target directory, then persist over the final path.
    fn persist(&self, favorite: &Favorite) -> Result<()> {
        let file_path = self.favorite_path(&favorite.idea.id);

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create directory {}: {}", parent.display(), e);
                    IdeaError::Io(e)
                })?;
            }
        }

        let dir = file_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir)?;

        let json = serde_json::to_string_pretty(favorite)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;

        temp_file.persist(&file_path).map_err(|e| {
            error!("Failed to persist file {}: {}", file_path.display(), e.error);
            IdeaError::Io(e.error)
        })?;

        debug!("Favorite written to {}", file_path.display());
        Ok(())
    }

    /// File path for a favorite: favorites_dir/shard/id.json. Ids look like
    /// "id_1a2b3c"; the shard is taken from the hex digits, not the fixed
    /// prefix.
    fn favorite_path(&self, id: &str) -> PathBuf {
        let hex = id.strip_prefix("id_").unwrap_or(id);
        let shard = hex.get(0..2).unwrap_or(hex);
        self.favorites_dir.join(shard).join(format!("{}.json", id))
    }

    fn lock_cache(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Favorite>>> {
        self.cache
            .lock()
            .map_err(|_| IdeaError::LockAcquisitionFailed {
                message: "Failed to acquire lock on favorites cache".to_string(),
            })
    }
}

/// Loads a single favorite from a JSON file.
fn load_favorite_from_file(path: &Path) -> Result<Favorite> {
    let content = fs::read_to_string(path)?;
    let favorite: Favorite = serde_json::from_str(&content)?;

    if favorite.idea.id.is_empty() {
        return Err(IdeaError::InvalidFormat {
            message: format!("Favorite from {} has an empty id", path.display()),
        });
    }

    Ok(favorite)
}

/// One generation run: the topic, when it ran, and the canonical records it
/// produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationBatch {
    pub topic: String,
    pub generated_at: DateTime<Utc>,
    pub ideas: Vec<Idea>,
}

impl GenerationBatch {
    pub fn new(topic: String, ideas: Vec<Idea>) -> Self {
        GenerationBatch {
            topic,
            generated_at: Utc::now(),
            ideas,
        }
    }

    /// Finds a record in this batch by id.
    pub fn find(&self, id: &str) -> Option<&Idea> {
        self.ideas.iter().find(|idea| idea.id == id)
    }
}

/// Cache of the most recent generation result, overwritten wholesale on each
/// run.
pub struct ResultCache {
    path: PathBuf,
}

impl ResultCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Atomically replaces the cached batch.
    pub fn save(&self, batch: &GenerationBatch) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|_| IdeaError::DirectoryError {
                    path: parent.to_path_buf(),
                })?;
            }
        }

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir)?;

        let json = serde_json::to_string_pretty(batch)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file
            .persist(&self.path)
            .map_err(|e| IdeaError::Io(e.error))?;

        debug!(
            "Cached {} ideas for topic '{}' at {}",
            batch.ideas.len(),
            batch.topic,
            self.path.display()
        );
        Ok(())
    }

    /// Loads the cached batch, or fails with a user-facing message when no
    /// generation has been cached yet.
    pub fn load(&self) -> Result<GenerationBatch> {
        if !self.path.exists() {
            return Err(IdeaError::ApplicationError {
                message: "No cached generation found. Run `ideaforge generate` first."
                    .to_string(),
            });
        }

        let content = fs::read_to_string(&self.path)?;
        let batch: GenerationBatch = serde_json::from_str(&content)?;
        Ok(batch)
    }
}
