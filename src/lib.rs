#![forbid(unsafe_code)]
//! Turni : bibliothèque de plannings hebdomadaires du personnel (document JSON unique).
//!
//! - Grille ligne × jour, deux segments horaires par journée.
//! - Modèles de semaine édités sur brouillon, presets horaires, plannings figés.
//! - Vue Gantt par demi-heure (texte ou HTML), récapitulatif hebdomadaire.
//! - Pointages, présences mensuelles, matrice d'accès par rôle.
//! - Dates locales naïves ; horodatages de création en UTC.

pub mod access;
pub mod attendance;
pub mod config;
pub mod editor;
pub mod generator;
pub mod grid;
pub mod io;
pub mod model;
pub mod occupancy;
pub mod render;
pub mod storage;
pub mod store;
pub mod time;
pub mod timeclock;

pub use access::{authenticate, can_access, AccessError, AuthError, Section, DOCUMENTS};
pub use config::Settings;
pub use editor::{create_template, matching_preset, EditorError, TemplateEditor};
pub use generator::{generate_shift, next_monday, sunday_of_week, todays_shift, GenerateError};
pub use grid::{build_empty_grid, empty_cell, row_key_for, Grid};
pub use model::{
    AccessMatrix, AdminLevel, ClockEntry, Collaborator, DayCell, DayKey, GeneratedShift,
    Position, PresetId, ShiftId, Template, TemplateId, TimeEntries, TimePreset,
};
pub use occupancy::is_occupied;
pub use render::{DayView, GridRenderer, HtmlGrid, SummaryView, TextGrid, Viewport};
pub use storage::{load_or_default, save_best_effort, DocumentStore, JsonDocumentStore};
pub use store::{AppState, Store, StoreError};
pub use time::TimeError;
