//! Réglages locaux de la CLI (fichier JSON dans le répertoire de config de la plateforme).

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::DEFAULT_CONTRACT_HOURS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Document d'état ; `None` = `state.json` dans le répertoire de données.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
    /// Créneaux visibles à la fois dans la vue texte.
    #[serde(default = "default_visible_slots")]
    pub visible_slots: usize,
    #[serde(default = "default_true")]
    pub show_summary: bool,
    #[serde(default = "default_contract_hours")]
    pub default_contract_hours: f64,
}

fn default_visible_slots() -> usize {
    16 // 8 heures
}

fn default_true() -> bool {
    true
}

fn default_contract_hours() -> f64 {
    DEFAULT_CONTRACT_HOURS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_path: None,
            visible_slots: default_visible_slots(),
            show_summary: true,
            default_contract_hours: DEFAULT_CONTRACT_HOURS,
        }
    }
}

impl Settings {
    /// Lit `path` s'il est donné, sinon le fichier par défaut ; absent = réglages par défaut.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Ok(p) => p,
                Err(err) => {
                    tracing::warn!(error = %err, "no config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Chemin effectif du document d'état.
    pub fn resolved_state_path(&self) -> PathBuf {
        if let Some(p) = &self.state_path {
            return p.clone();
        }
        ProjectDirs::from("it", "turni", "turni")
            .map(|dirs| dirs.data_dir().join("state.json"))
            .unwrap_or_else(|| PathBuf::from("state.json"))
    }

    /// Fichier de réglages : `explicit` s'il est donné, sinon celui de la plateforme.
    pub fn file_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(p) => Ok(p.to_path_buf()),
            None => Self::config_path(),
        }
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("it", "turni", "turni")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"visible_slots": 8}"#).unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.visible_slots, 8);
        assert!(s.show_summary);
        assert_eq!(s.default_contract_hours, 40.0);
    }

    #[test]
    fn missing_file_is_default_and_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        assert_eq!(Settings::load(Some(&path)).unwrap(), Settings::default());
        let s = Settings {
            state_path: Some(dir.path().join("s.json")),
            ..Settings::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(Some(&path)).unwrap(), s);
        assert_eq!(s.resolved_state_path(), dir.path().join("s.json"));
    }
}
