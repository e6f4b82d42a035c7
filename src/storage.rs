use crate::store::AppState;
use anyhow::Context;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait DocumentStore {
    /// Charge le document ; `None` au premier accès (aucun document).
    fn load(&self) -> anyhow::Result<Option<AppState>>;
    /// Réécrit le document en entier.
    fn save(&self, state: &AppState) -> anyhow::Result<()>;
}

pub struct JsonDocumentStore {
    path: PathBuf,
}

impl JsonDocumentStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonDocumentStore {
    fn load(&self) -> anyhow::Result<Option<AppState>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        let state: AppState = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(state))
    }

    /// Écriture atomique : fichier temporaire voisin puis renommage.
    fn save(&self, state: &AppState) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(state)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

/// Chargement au démarrage : toute erreur est journalisée et l'état par défaut utilisé.
pub fn load_or_default(store: &dyn DocumentStore) -> AppState {
    match store.load() {
        Ok(Some(state)) => {
            tracing::info!(
                users = state.users.len(),
                templates = state.templates.len(),
                shifts = state.generated_shifts.len(),
                "state loaded"
            );
            state
        }
        Ok(None) => {
            tracing::info!("no state found (first access), starting empty");
            AppState::default()
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "failed to load state");
            AppState::default()
        }
    }
}

/// Sauvegarde sans propagation d'erreur ni nouvel essai ; renvoie `false` en cas d'échec.
pub fn save_best_effort(store: &dyn DocumentStore, state: &AppState) -> bool {
    match store.save(state) {
        Ok(()) => {
            tracing::info!("state saved");
            true
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "failed to save state");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Collaborator;

    #[test]
    fn missing_file_is_first_access() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDocumentStore::open(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
        assert_eq!(load_or_default(&store), AppState::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDocumentStore::open(dir.path().join("state.json"));
        let mut state = AppState::default();
        state.users.push(Collaborator::new("Anna", "Neri", "anna"));
        assert!(save_best_effort(&store, &state));
        assert_eq!(store.load().unwrap(), Some(state));
    }

    #[test]
    fn unreadable_document_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonDocumentStore::open(&path);
        assert!(store.load().is_err());
        assert_eq!(load_or_default(&store), AppState::default());
    }

    #[test]
    fn failed_save_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDocumentStore::open(dir.path().join("missing").join("state.json"));
        assert!(!save_best_effort(&store, &AppState::default()));
    }
}
