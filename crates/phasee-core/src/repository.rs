//! Client-side persisted state behind an explicit repository object.
//!
//! The repository owns a [`SessionStorage`] backend and caches the idea list
//! in memory so repeated reads within one session do not hit storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::board::IdeaBoard;
use crate::ideas::Idea;
use crate::plans::PlanKey;
use crate::profile::{BrandProfile, User};
use crate::scheduling::DateSelection;
use crate::CoreError;

pub const KEY_IDEAS: &str = "phasee.ideas.v1";
pub const KEY_IDEAS_CORRUPT: &str = "phasee.ideas.v1.corrupt";
pub const KEY_COMPLETED_PROFILE: &str = "phasee.completedProfile";
pub const KEY_SELECTED_PLAN: &str = "phasee.selectedPlan";
pub const KEY_PLAN: &str = "phasee.plan";
pub const KEY_AUTH: &str = "phasee.auth";
pub const KEY_SELECTED_DATES: &str = "phasee.selectedDates";
pub const KEY_PROFILE: &str = "phasee.profile";

const FLAG_SET: &str = "1";

/// String key/value storage for client state.
pub trait SessionStorage {
    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}

/// Stores each key as a file in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CoreError::StorageIo {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CoreError::StorageIo {
            path: self.dir.display().to_string(),
            source,
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|source| CoreError::StorageIo {
            path: path.display().to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CoreError::StorageIo {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

/// In-memory storage, used in tests and for throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

pub struct LocalRepository<S: SessionStorage> {
    storage: S,
    ideas: Option<Vec<Idea>>,
}

impl<S: SessionStorage> LocalRepository<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            ideas: None,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the persisted idea list.
    ///
    /// A corrupt entry is logged, copied to [`KEY_IDEAS_CORRUPT`] so the next
    /// save cannot destroy it, and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be read, or if
    /// the corrupt entry cannot be set aside.
    pub fn load_ideas(&mut self) -> Result<Vec<Idea>, CoreError> {
        if let Some(cached) = &self.ideas {
            return Ok(cached.clone());
        }
        let ideas = match self.storage.read(KEY_IDEAS)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Idea>>(&raw) {
                Ok(ideas) => ideas,
                Err(error) => {
                    tracing::warn!(
                        key = KEY_IDEAS,
                        backup = KEY_IDEAS_CORRUPT,
                        error = %error,
                        "ignoring unreadable idea list; kept a copy"
                    );
                    self.storage.write(KEY_IDEAS_CORRUPT, &raw)?;
                    Vec::new()
                }
            },
        };
        self.ideas = Some(ideas.clone());
        Ok(ideas)
    }

    /// Persist the idea list and refresh the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    pub fn save_ideas(&mut self, ideas: &[Idea]) -> Result<(), CoreError> {
        self.write_json(KEY_IDEAS, &ideas)?;
        self.ideas = Some(ideas.to_vec());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CoreError`] if the backend cannot be read or the entry is corrupt.
    pub fn load_selection(&self) -> Result<DateSelection, CoreError> {
        Ok(self
            .read_json::<DateSelection>(KEY_SELECTED_DATES)?
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    pub fn save_selection(&mut self, selection: &DateSelection) -> Result<(), CoreError> {
        self.write_json(KEY_SELECTED_DATES, selection)
    }

    /// Load ideas and selection together as a board.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if either entry cannot be read.
    pub fn load_board(&mut self) -> Result<IdeaBoard, CoreError> {
        let ideas = self.load_ideas()?;
        let selection = self.load_selection()?;
        Ok(IdeaBoard::new(ideas, selection))
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    pub fn save_board(&mut self, board: &IdeaBoard) -> Result<(), CoreError> {
        self.save_ideas(board.ideas())?;
        self.save_selection(board.selection())
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be read.
    pub fn has_completed_profile(&self) -> Result<bool, CoreError> {
        self.flag(KEY_COMPLETED_PROFILE)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    pub fn mark_profile_completed(&mut self) -> Result<(), CoreError> {
        self.storage.write(KEY_COMPLETED_PROFILE, FLAG_SET)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be read.
    pub fn has_selected_plan(&self) -> Result<bool, CoreError> {
        self.flag(KEY_SELECTED_PLAN)
    }

    /// The chosen plan, defaulting to `d30` when none was picked or the entry is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be read.
    pub fn plan(&self) -> Result<PlanKey, CoreError> {
        Ok(self
            .storage
            .read(KEY_PLAN)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    pub fn select_plan(&mut self, plan: PlanKey) -> Result<(), CoreError> {
        self.storage.write(KEY_SELECTED_PLAN, FLAG_SET)?;
        self.storage.write(KEY_PLAN, plan.as_str())
    }

    /// # Errors
    ///
    /// Returns [`CoreError`] if the backend cannot be read or the entry is corrupt.
    pub fn current_user(&self) -> Result<Option<User>, CoreError> {
        self.read_json(KEY_AUTH)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    pub fn set_current_user(&mut self, user: &User) -> Result<(), CoreError> {
        self.write_json(KEY_AUTH, user)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    pub fn logout(&mut self) -> Result<(), CoreError> {
        self.storage.remove(KEY_AUTH)
    }

    /// Last brand profile entered locally, used to steer generation.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if the backend cannot be read or the entry is corrupt.
    pub fn profile(&self) -> Result<BrandProfile, CoreError> {
        Ok(self.read_json(KEY_PROFILE)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`CoreError::StorageIo`] if the backend cannot be written.
    pub fn save_profile(&mut self, profile: &BrandProfile) -> Result<(), CoreError> {
        self.write_json(KEY_PROFILE, profile)
    }

    fn flag(&self, key: &str) -> Result<bool, CoreError> {
        Ok(self.storage.read(key)?.as_deref() == Some(FLAG_SET))
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        let Some(raw) = self.storage.read(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| CoreError::StorageDecode {
                key: key.to_string(),
                source,
            })
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), CoreError> {
        let raw = serde_json::to_string(value).map_err(|source| CoreError::StorageDecode {
            key: key.to_string(),
            source,
        })?;
        self.storage.write(key, &raw)
    }
}
