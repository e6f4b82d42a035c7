//! Édition des modèles de semaine sur des brouillons.
//!
//! Chaque modèle est cloné à l'ouverture ; les modifications restent dans le
//! brouillon jusqu'à `commit`, qui rend la copie à persister.

mod cursor;
mod progress;
mod types;

pub use cursor::GridCursor;
pub use progress::{ContractProgress, ProgressBand, DEFAULT_CONTRACT_HOURS};
pub use types::EditorError;

use crate::grid::{build_empty_grid, empty_cell, row_key_for, RowKeyWarning};
use crate::model::{CellField, Collaborator, DayCell, DayKey, Template, TemplateId, TimePreset};
use crate::time;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Brouillons indexés par id de modèle, plus le curseur de saisie.
#[derive(Debug, Default)]
pub struct TemplateEditor {
    drafts: BTreeMap<TemplateId, Template>,
    roster: Vec<String>,
    focus: Option<(TemplateId, GridCursor)>,
}

impl TemplateEditor {
    pub fn new(templates: &[Template], collaborators: &[Collaborator]) -> Self {
        let mut editor = Self::default();
        editor.set_roster(collaborators);
        editor.sync(templates);
        editor
    }

    /// Recopie les modèles persistés ; à appeler dès que la liste change.
    pub fn sync(&mut self, templates: &[Template]) {
        self.drafts = templates.iter().map(|t| (t.id.clone(), t.clone())).collect();
        if let Some((id, _)) = &self.focus {
            if !self.drafts.contains_key(id) {
                self.focus = None;
            }
        }
    }

    /// Lignes éditables, dans l'ordre de l'effectif (collaborateurs uniquement).
    pub fn set_roster(&mut self, collaborators: &[Collaborator]) {
        self.roster = collaborators
            .iter()
            .filter(|c| c.is_collaborator)
            .map(|c| row_key_for(c).key)
            .collect();
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn drafts(&self) -> impl Iterator<Item = &Template> {
        self.drafts.values()
    }

    pub fn draft(&self, id: &TemplateId) -> Option<&Template> {
        self.drafts.get(id)
    }

    fn draft_mut(&mut self, id: &TemplateId) -> Result<&mut Template, EditorError> {
        self.drafts
            .get_mut(id)
            .ok_or_else(|| EditorError::UnknownTemplate(id.clone()))
    }

    fn cell_mut(&mut self, id: &TemplateId, row: &str, day: DayKey) -> Result<&mut DayCell, EditorError> {
        let in_roster = self.roster.iter().any(|r| r == row);
        let draft = self.draft_mut(id)?;
        if !in_roster && !draft.grid.contains_row(row) {
            return Err(EditorError::UnknownRow(row.to_string()));
        }
        Ok(draft.grid.cell_mut(row, day))
    }

    /// Copie les quatre horaires du preset dans la cellule puis avance le curseur.
    ///
    /// Renvoie le brouillon à jour pour une persistance immédiate.
    pub fn apply_preset(
        &mut self,
        id: &TemplateId,
        row: &str,
        day: DayKey,
        preset: &TimePreset,
    ) -> Result<&Template, EditorError> {
        self.cell_mut(id, row, day)?.apply_preset(preset);
        self.advance_from(id, row, day);
        self.draft_mut(id).map(|t| &*t)
    }

    /// Vide la sélection de preset : la cellule redevient vide.
    pub fn clear_cell(&mut self, id: &TemplateId, row: &str, day: DayKey) -> Result<&Template, EditorError> {
        *self.cell_mut(id, row, day)? = empty_cell();
        self.draft_mut(id).map(|t| &*t)
    }

    /// Saisie directe d'un champ ; les horaires sont normalisés en "HH:MM".
    pub fn update_cell(
        &mut self,
        id: &TemplateId,
        row: &str,
        day: DayKey,
        field: CellField,
        value: &str,
    ) -> Result<&Template, EditorError> {
        let value = if field.is_time() && !value.trim().is_empty() {
            time::normalize_clock(value)?
        } else {
            value.trim().to_string()
        };
        self.cell_mut(id, row, day)?.set(field, value);
        self.draft_mut(id).map(|t| &*t)
    }

    pub fn rename(&mut self, id: &TemplateId, name: &str) -> Result<&Template, EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }
        let draft = self.draft_mut(id)?;
        draft.name = name.to_string();
        Ok(draft)
    }

    /// Copie du brouillon à persister.
    pub fn commit(&self, id: &TemplateId) -> Result<Template, EditorError> {
        self.draft(id)
            .cloned()
            .ok_or_else(|| EditorError::UnknownTemplate(id.clone()))
    }

    /// Nouveau modèle "Copia di …" à partir du brouillon.
    pub fn duplicate(&self, id: &TemplateId, now: DateTime<Utc>) -> Result<Template, EditorError> {
        let mut copy = self.commit(id)?;
        copy.id = TemplateId::random();
        copy.name = format!("Copia di {}", copy.name);
        copy.created_at = Some(now);
        Ok(copy)
    }

    pub fn focus(&self) -> Option<(&TemplateId, GridCursor)> {
        self.focus.as_ref().map(|(id, c)| (id, *c))
    }

    pub fn focus_on(&mut self, id: &TemplateId, row: &str, day: DayKey) {
        if let Some(r) = self.roster.iter().position(|k| k == row) {
            self.focus = Some((id.clone(), GridCursor::new(r, day.index())));
        }
    }

    /// Cellule sous le curseur (clé de ligne, jour).
    pub fn focused_cell(&self) -> Option<(&str, DayKey)> {
        let (_, cursor) = self.focus.as_ref()?;
        let row = self.roster.get(cursor.row)?;
        Some((row.as_str(), *DayKey::ALL.get(cursor.day)?))
    }

    fn advance_from(&mut self, id: &TemplateId, row: &str, day: DayKey) {
        let Some(r) = self.roster.iter().position(|k| k == row) else {
            return;
        };
        if let Some(next) = GridCursor::new(r, day.index()).next(self.roster.len(), DayKey::ALL.len()) {
            tracing::debug!(template = %id, row = next.row, day = next.day, "editor focus advanced");
            self.focus = Some((id.clone(), next));
        }
    }

    pub fn weekly_minutes(&self, id: &TemplateId, row: &str) -> u32 {
        self.draft(id).map_or(0, |t| t.grid.week_minutes(row))
    }

    /// Indicateur heures planifiées / heures du contrat pour un collaborateur.
    pub fn contract_progress(&self, id: &TemplateId, collaborator: &Collaborator) -> ContractProgress {
        let row = row_key_for(collaborator).key;
        ContractProgress::compute(self.weekly_minutes(id, &row), collaborator.contract_hours)
    }
}

/// Nouveau modèle vide pour les collaborateurs de l'effectif.
pub fn create_template(
    name: &str,
    collaborators: &[Collaborator],
    now: DateTime<Utc>,
) -> Result<(Template, Vec<RowKeyWarning>), EditorError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EditorError::EmptyName);
    }
    let staff: Vec<Collaborator> = collaborators
        .iter()
        .filter(|c| c.is_collaborator)
        .cloned()
        .collect();
    let (grid, warnings) = build_empty_grid(&staff, &DayKey::ALL);
    Ok((
        Template {
            id: TemplateId::random(),
            name: name.to_string(),
            grid,
            created_at: Some(now),
        },
        warnings,
    ))
}

/// Preset dont les quatre horaires correspondent exactement à la cellule.
pub fn matching_preset<'a>(cell: &DayCell, presets: &'a [TimePreset]) -> Option<&'a TimePreset> {
    if !cell.first_segment_active() {
        return None;
    }
    presets.iter().find(|p| {
        p.in1 == cell.in1 && p.out1 == cell.out1 && p.in2 == cell.in2 && p.out2 == cell.out2
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PresetId;

    fn staff() -> Vec<Collaborator> {
        let mut admin = Collaborator::new("Boss", "B", "boss");
        admin.is_collaborator = false;
        vec![
            Collaborator::new("Anna", "Neri", "anna"),
            Collaborator::new("Bruno", "Rossi", "bruno"),
            admin,
        ]
    }

    fn preset() -> TimePreset {
        TimePreset {
            id: PresetId::new("p1"),
            name: None,
            in1: "08:00".into(),
            out1: "15:30".into(),
            in2: String::new(),
            out2: String::new(),
        }
    }

    fn editor() -> (TemplateEditor, TemplateId) {
        let (tpl, warnings) = create_template("Settimana tipo", &staff(), Utc::now()).unwrap();
        assert!(warnings.is_empty());
        let id = tpl.id.clone();
        (TemplateEditor::new(&[tpl], &staff()), id)
    }

    #[test]
    fn create_skips_non_collaborators() {
        let (tpl, _) = create_template("  W1 ", &staff(), Utc::now()).unwrap();
        assert_eq!(tpl.name, "W1");
        assert_eq!(tpl.grid.len(), 2);
        assert!(!tpl.grid.contains_row("boss"));
        assert_eq!(create_template(" ", &staff(), Utc::now()).unwrap_err(), EditorError::EmptyName);
    }

    #[test]
    fn apply_preset_advances_focus_day_major() {
        let (mut ed, id) = editor();
        let draft = ed.apply_preset(&id, "anna", DayKey::Domenica, &preset()).unwrap();
        assert_eq!(draft.grid.cell("anna", DayKey::Domenica).out1, "15:30");
        assert_eq!(ed.focused_cell(), Some(("bruno", DayKey::Lunedi)));

        ed.apply_preset(&id, "bruno", DayKey::Domenica, &preset()).unwrap();
        // plus de cellule après la dernière : le curseur ne bouge pas
        assert_eq!(ed.focused_cell(), Some(("bruno", DayKey::Lunedi)));
    }

    #[test]
    fn drafts_do_not_alias_the_saved_template() {
        let (tpl, _) = create_template("W", &staff(), Utc::now()).unwrap();
        let saved = vec![tpl.clone()];
        let mut ed = TemplateEditor::new(&saved, &staff());
        ed.apply_preset(&tpl.id, "anna", DayKey::Lunedi, &preset()).unwrap();
        assert!(saved[0].grid.cell("anna", DayKey::Lunedi).is_empty());
        assert_ne!(ed.commit(&tpl.id).unwrap(), saved[0]);
        ed.sync(&saved);
        assert_eq!(ed.commit(&tpl.id).unwrap(), saved[0]);
    }

    #[test]
    fn unknown_row_is_rejected_but_new_roster_members_are_added() {
        let (mut ed, id) = editor();
        assert_eq!(
            ed.apply_preset(&id, "ghost", DayKey::Lunedi, &preset()).unwrap_err(),
            EditorError::UnknownRow("ghost".into())
        );
        let mut roster = staff();
        roster.push(Collaborator::new("Carla", "Verdi", "carla"));
        ed.set_roster(&roster);
        let draft = ed.apply_preset(&id, "carla", DayKey::Lunedi, &preset()).unwrap();
        assert_eq!(draft.grid.row("carla").unwrap().len(), 7);
    }

    #[test]
    fn update_cell_normalizes_and_validates() {
        let (mut ed, id) = editor();
        let draft = ed
            .update_cell(&id, "anna", DayKey::Martedi, CellField::In1, "9:00")
            .unwrap();
        assert_eq!(draft.grid.cell("anna", DayKey::Martedi).in1, "09:00");
        assert!(matches!(
            ed.update_cell(&id, "anna", DayKey::Martedi, CellField::Out1, "25:00"),
            Err(EditorError::Time(_))
        ));
    }

    #[test]
    fn duplicate_and_rename() {
        let (mut ed, id) = editor();
        ed.rename(&id, "Estate").unwrap();
        let copy = ed.duplicate(&id, Utc::now()).unwrap();
        assert_eq!(copy.name, "Copia di Estate");
        assert_ne!(copy.id, id);
        assert_eq!(ed.rename(&id, "").unwrap_err(), EditorError::EmptyName);
    }

    #[test]
    fn contract_progress_uses_draft_hours() {
        let (mut ed, id) = editor();
        for day in &DayKey::ALL[..5] {
            ed.update_cell(&id, "anna", *day, CellField::In1, "08:00").unwrap();
            ed.update_cell(&id, "anna", *day, CellField::Out1, "16:24").unwrap();
        }
        let p = ed.contract_progress(&id, &staff()[0]);
        assert!((p.percentage - 105.0).abs() < 1e-9);
        assert_eq!(p.band, ProgressBand::Over);
        assert_eq!(p.bar_width, 100.0);
    }

    #[test]
    fn matching_preset_needs_exact_times() {
        let presets = vec![preset()];
        let mut cell = DayCell::empty();
        assert!(matching_preset(&cell, &presets).is_none());
        cell.apply_preset(&presets[0]);
        assert_eq!(matching_preset(&cell, &presets).map(|p| p.id.as_str()), Some("p1"));
        cell.out2 = "23:00".into();
        assert!(matching_preset(&cell, &presets).is_none());
    }
}
