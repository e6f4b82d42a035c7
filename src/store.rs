//! Document racine de l'application et opérations de mise à jour par collection.
//!
//! Le document est chargé une fois puis réécrit en entier : pas de verrou, le
//! dernier qui écrit gagne.

use crate::access::{self, AccessError, Section};
use crate::model::{
    AccessMatrix, AdminLevel, ClockEntry, Collaborator, GeneratedShift, PresetId, ShiftId,
    Template, TemplateId, TimeEntries, TimePreset,
};
use crate::time::{self, TimeError};
use crate::timeclock;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub users: Vec<Collaborator>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub templates: Vec<Template>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub time_presets: Vec<TimePreset>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub generated_shifts: Vec<GeneratedShift>,
    #[serde(default, deserialize_with = "lenient::map")]
    pub time_entries: TimeEntries,
    #[serde(default, deserialize_with = "lenient::map")]
    pub access_matrix: AccessMatrix,
}

/// Décodage tolérant : une collection qui n'a pas la bonne forme devient vide,
/// un élément illisible est ignoré.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(items) = Value::deserialize(deserializer)? else {
            tracing::warn!("expected an array, using an empty collection");
            return Ok(Vec::new());
        };
        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(v) => Some(v),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed item");
                    None
                }
            })
            .collect())
    }

    pub fn map<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Ok(T::default());
        }
        Ok(serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "malformed map, using an empty one");
            T::default()
        }))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("username cannot be empty")]
    EmptyUsername,
    #[error("username already taken: {0}")]
    DuplicateUser(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("unknown template: {0}")]
    UnknownTemplate(TemplateId),
    #[error("unknown preset: {0}")]
    UnknownPreset(PresetId),
    #[error("unknown shift: {0}")]
    UnknownShift(ShiftId),
    #[error("a preset needs at least in1 and out1")]
    IncompletePreset,
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Store : encapsule l'AppState et expose une opération par mutation.
#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn find_user(&self, username: &str) -> Option<&Collaborator> {
        self.state.users.iter().find(|u| u.username == username)
    }

    pub fn find_template(&self, id: &TemplateId) -> Option<&Template> {
        self.state.templates.iter().find(|t| &t.id == id)
    }

    pub fn find_preset(&self, id: &PresetId) -> Option<&TimePreset> {
        self.state.time_presets.iter().find(|p| &p.id == id)
    }

    pub fn find_shift(&self, id: &ShiftId) -> Option<&GeneratedShift> {
        self.state.generated_shifts.iter().find(|s| &s.id == id)
    }

    // --- collaborateurs ---

    pub fn add_user(&mut self, user: Collaborator) -> Result<(), StoreError> {
        let mut user = user;
        user.username = user.username.trim().to_string();
        if user.username.is_empty() {
            return Err(StoreError::EmptyUsername);
        }
        if self.find_user(&user.username).is_some() {
            return Err(StoreError::DuplicateUser(user.username));
        }
        self.state.users.push(user);
        Ok(())
    }

    pub fn update_user(&mut self, username: &str, user: Collaborator) -> Result<(), StoreError> {
        if user.username != username && self.find_user(&user.username).is_some() {
            return Err(StoreError::DuplicateUser(user.username));
        }
        let slot = self
            .state
            .users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))?;
        *slot = user;
        Ok(())
    }

    /// Les grilles existantes gardent la ligne du collaborateur supprimé.
    pub fn delete_user(&mut self, username: &str) -> Result<Collaborator, StoreError> {
        let idx = self
            .state
            .users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))?;
        Ok(self.state.users.remove(idx))
    }

    pub fn add_users(&mut self, users: Vec<Collaborator>) -> Result<usize, StoreError> {
        let count = users.len();
        for user in users {
            self.add_user(user)?;
        }
        Ok(count)
    }

    // --- modèles ---

    pub fn add_template(&mut self, template: Template) {
        self.state.templates.push(template);
    }

    pub fn update_template(&mut self, template: Template) -> Result<(), StoreError> {
        let slot = self
            .state
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| StoreError::UnknownTemplate(template.id.clone()))?;
        *slot = template;
        Ok(())
    }

    pub fn delete_template(&mut self, id: &TemplateId) -> Result<Template, StoreError> {
        let idx = self
            .state
            .templates
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::UnknownTemplate(id.clone()))?;
        Ok(self.state.templates.remove(idx))
    }

    // --- presets ---

    fn validate_preset(preset: &TimePreset) -> Result<TimePreset, StoreError> {
        if preset.in1.trim().is_empty() || preset.out1.trim().is_empty() {
            return Err(StoreError::IncompletePreset);
        }
        let norm = |v: &str| -> Result<String, TimeError> {
            if v.trim().is_empty() {
                Ok(String::new())
            } else {
                time::normalize_clock(v)
            }
        };
        Ok(TimePreset {
            id: preset.id.clone(),
            name: preset.name.clone().filter(|n| !n.trim().is_empty()),
            in1: norm(&preset.in1)?,
            out1: norm(&preset.out1)?,
            in2: norm(&preset.in2)?,
            out2: norm(&preset.out2)?,
        })
    }

    pub fn add_preset(&mut self, preset: TimePreset) -> Result<PresetId, StoreError> {
        let preset = Self::validate_preset(&preset)?;
        let id = preset.id.clone();
        self.state.time_presets.push(preset);
        Ok(id)
    }

    pub fn update_preset(&mut self, preset: TimePreset) -> Result<(), StoreError> {
        let preset = Self::validate_preset(&preset)?;
        let slot = self
            .state
            .time_presets
            .iter_mut()
            .find(|p| p.id == preset.id)
            .ok_or_else(|| StoreError::UnknownPreset(preset.id.clone()))?;
        *slot = preset;
        Ok(())
    }

    pub fn delete_preset(&mut self, id: &PresetId) -> Result<TimePreset, StoreError> {
        let idx = self
            .state
            .time_presets
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StoreError::UnknownPreset(id.clone()))?;
        Ok(self.state.time_presets.remove(idx))
    }

    // --- plannings générés ---

    pub fn add_generated_shift(&mut self, shift: GeneratedShift) {
        self.state.generated_shifts.push(shift);
    }

    pub fn delete_generated_shift(&mut self, id: &ShiftId) -> Result<GeneratedShift, StoreError> {
        let idx = self
            .state
            .generated_shifts
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| StoreError::UnknownShift(id.clone()))?;
        Ok(self.state.generated_shifts.remove(idx))
    }

    // --- pointages ---

    /// Enregistre (ou remplace) le pointage du jour ; une valeur vide est admise.
    pub fn save_time_entry(
        &mut self,
        username: &str,
        date: NaiveDate,
        clock_in: &str,
        clock_out: &str,
    ) -> Result<ClockEntry, StoreError> {
        if self.find_user(username).is_none() {
            return Err(StoreError::UnknownUser(username.to_string()));
        }
        let norm = |v: &str| -> Result<String, TimeError> {
            if v.trim().is_empty() {
                Ok(String::new())
            } else {
                time::normalize_clock(v)
            }
        };
        let entry = ClockEntry::new(norm(clock_in)?, norm(clock_out)?);
        timeclock::save_entry(&mut self.state.time_entries, username, date, entry.clone());
        Ok(entry)
    }

    // --- permissions ---

    pub fn set_access(
        &mut self,
        editor: AdminLevel,
        section: Section,
        role: AdminLevel,
        allowed: bool,
    ) -> Result<(), StoreError> {
        access::set_access(&mut self.state.access_matrix, editor, section, role, allowed)?;
        Ok(())
    }
}
