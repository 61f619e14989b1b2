//! Dictionary store service
//!
//! Owns the in-memory collection, the JSON snapshot it is loaded from and
//! saved to, and single-dictionary exports.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{Collection, Dictionary, Translations};
use crate::infrastructure::traits::FileSystem;

/// What happened when the snapshot was read at startup.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Snapshot parsed; the collection holds its dictionaries.
    Loaded { path: PathBuf, dictionaries: usize },
    /// No snapshot yet; the collection starts empty.
    FirstRun { path: PathBuf },
    /// Snapshot could not be read or parsed; the collection starts empty.
    ///
    /// `backup` is `None` when nothing was moved (unreadable file), otherwise
    /// the result of moving the malformed file aside.
    Failed {
        error: ApplicationError,
        backup: Option<ApplicationResult<PathBuf>>,
    },
}

/// Whether a mutation reached the snapshot file.
#[derive(Debug)]
pub enum Persistence {
    /// Snapshot rewritten.
    Saved(PathBuf),
    /// Change held in memory only until the next save.
    Deferred,
    /// Change held in memory; writing the snapshot failed.
    Failed(ApplicationError),
}

impl Persistence {
    pub fn is_saved(&self) -> bool {
        matches!(self, Persistence::Saved(_))
    }
}

/// Service for managing named dictionaries and their translations.
pub struct DictionaryService {
    fs: Arc<dyn FileSystem>,
    snapshot_path: PathBuf,
    save_on_every_change: bool,
    collection: Collection,
}

impl DictionaryService {
    /// Create a service with an empty collection. Nothing is read.
    pub fn new(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        Self {
            fs,
            snapshot_path: settings.snapshot_path.clone(),
            save_on_every_change: settings.save_on_every_change,
            collection: Collection::new(),
        }
    }

    /// Create a service and load the snapshot into it.
    pub fn open(fs: Arc<dyn FileSystem>, settings: &Settings) -> (Self, LoadOutcome) {
        let mut service = Self::new(fs, settings);
        let outcome = service.load();
        (service, outcome)
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Replace the collection with the snapshot contents.
    ///
    /// A missing snapshot is a first run. An unreadable or malformed snapshot
    /// leaves the collection empty; a malformed one (bad JSON or bad UTF-8)
    /// is moved to the first free `<snapshot>.corrupt[.N]` so a later save
    /// cannot overwrite it.
    #[instrument(skip(self), fields(path = %self.snapshot_path.display()))]
    pub fn load(&mut self) -> LoadOutcome {
        self.collection = Collection::new();
        let path = self.snapshot_path.clone();

        let content = match self.fs.read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No snapshot found, starting with empty collection");
                return LoadOutcome::FirstRun { path };
            }
            Err(e) => {
                warn!("Cannot read snapshot: {}", e);
                return LoadOutcome::Failed {
                    error: ApplicationError::OperationFailed {
                        context: format!("read snapshot: {}", path.display()),
                        source: Box::new(e),
                    },
                    backup: None,
                };
            }
        };

        match serde_json::from_slice::<Collection>(&content) {
            Ok(collection) => {
                let dictionaries = collection.len();
                self.collection = collection;
                info!("Loaded {} dictionaries", dictionaries);
                LoadOutcome::Loaded { path, dictionaries }
            }
            Err(source) => {
                warn!("Malformed snapshot: {}", source);
                let backup = Some(self.move_aside(&path));
                LoadOutcome::Failed {
                    error: ApplicationError::MalformedSnapshot { path, source },
                    backup,
                }
            }
        }
    }

    fn move_aside(&self, path: &Path) -> ApplicationResult<PathBuf> {
        let backup = self.free_backup_path(path).ok_or_else(|| {
            ApplicationError::OperationFailed {
                context: format!("move malformed snapshot aside: {}", path.display()),
                source: "no free backup name".into(),
            }
        })?;
        self.fs
            .rename(path, &backup)
            .with_path_context("move malformed snapshot aside", path)?;
        debug!("Moved malformed snapshot to {}", backup.display());
        Ok(backup)
    }

    /// `<snapshot>.corrupt`, then `<snapshot>.corrupt.1`, `.2`, ...; earlier
    /// backups are never replaced.
    fn free_backup_path(&self, path: &Path) -> Option<PathBuf> {
        let backup_name = |suffix: Option<u32>| {
            let mut name: OsString = path.as_os_str().to_owned();
            name.push(".corrupt");
            if let Some(n) = suffix {
                name.push(format!(".{n}"));
            }
            PathBuf::from(name)
        };
        std::iter::once(None)
            .chain((1..).map(Some))
            .map(backup_name)
            .find(|candidate| !self.fs.exists(candidate))
    }

    /// Write the whole collection to the snapshot, replacing its content.
    #[instrument(skip(self), fields(path = %self.snapshot_path.display()))]
    pub fn save(&self) -> ApplicationResult<PathBuf> {
        let path = &self.snapshot_path;
        let json = serde_json::to_string_pretty(&self.collection)
            .with_path_context("serialize snapshot", path)?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create snapshot directory", path)?;
        self.fs
            .write(path, &json)
            .with_path_context("write snapshot", path)?;
        debug!("Saved {} dictionaries", self.collection.len());
        Ok(path.clone())
    }

    fn persist(&self) -> Persistence {
        match self.save() {
            Ok(path) => Persistence::Saved(path),
            Err(e) => {
                warn!("Snapshot not saved: {}", e);
                Persistence::Failed(e)
            }
        }
    }

    /// Replace and delete only persist when configured to.
    fn persist_if_eager(&self) -> Persistence {
        if self.save_on_every_change {
            self.persist()
        } else {
            Persistence::Deferred
        }
    }

    /// Create an empty dictionary, replacing any existing one of that name.
    #[instrument(skip(self))]
    pub fn create_dictionary(&mut self, name: &str) -> Persistence {
        if self.collection.create_dictionary(name) {
            debug!("Replaced existing dictionary");
        }
        self.persist()
    }

    /// Insert or overwrite a word in an existing dictionary.
    #[instrument(skip(self, translations))]
    pub fn add_word(
        &mut self,
        dictionary: &str,
        word: &str,
        translations: Translations,
    ) -> ApplicationResult<Persistence> {
        self.collection.add_word(dictionary, word, translations)?;
        Ok(self.persist())
    }

    /// Overwrite the translations of an existing word.
    #[instrument(skip(self, translations))]
    pub fn replace_word(
        &mut self,
        dictionary: &str,
        word: &str,
        translations: Translations,
    ) -> ApplicationResult<Persistence> {
        self.collection
            .replace_word(dictionary, word, translations)?;
        Ok(self.persist_if_eager())
    }

    /// Remove an existing word.
    #[instrument(skip(self))]
    pub fn delete_word(&mut self, dictionary: &str, word: &str) -> ApplicationResult<Persistence> {
        self.collection.delete_word(dictionary, word)?;
        Ok(self.persist_if_eager())
    }

    /// Translations of a word, in the order they were supplied.
    pub fn search_translation(&self, dictionary: &str, word: &str) -> ApplicationResult<&[String]> {
        Ok(self.collection.translations(dictionary, word)?)
    }

    /// Write one dictionary as JSON to `path`, replacing its content.
    #[instrument(skip(self))]
    pub fn export_to_file(&self, dictionary: &str, path: &Path) -> ApplicationResult<()> {
        let dict = self.collection.dictionary(dictionary)?;
        let json = serde_json::to_string_pretty(dict).with_path_context("serialize export", path)?;
        self.fs
            .write(path, &json)
            .with_path_context("write export", path)?;
        info!("Exported {} words", dict.len());
        Ok(())
    }

    /// Dictionary names in key order.
    pub fn dictionary_names(&self) -> Vec<&str> {
        self.collection.names().collect()
    }

    pub fn dictionary(&self, name: &str) -> ApplicationResult<&Dictionary> {
        Ok(self.collection.dictionary(name)?)
    }
}
