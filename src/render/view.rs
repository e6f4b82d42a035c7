use super::viewport::{CellClick, Viewport};
use crate::grid::Grid;
use crate::model::{Collaborator, DayKey, Position};
use crate::occupancy::is_occupied_at;
use crate::time::{self, Slot};
use chrono::{Datelike, Duration, NaiveDate};
use std::cmp::Ordering;

/// Couleur de barre selon le poste.
pub fn bar_color(position: Position) -> &'static str {
    match position {
        Position::Floor => "#5AC8FA",
        Position::Bar => "#C084FC",
        Position::Kitchen => "#FFA366",
    }
}

/// Ligne affichée : clé de grille, nom court et poste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowInfo {
    pub key: String,
    pub display_name: String,
    pub position: Position,
}

impl RowInfo {
    pub fn from_collaborator(key: &str, collaborator: &Collaborator) -> Self {
        Self {
            key: key.to_string(),
            display_name: collaborator.short_name(),
            position: collaborator.position,
        }
    }

    /// Ligne sans fiche collaborateur (username supprimé depuis la génération).
    pub fn bare(key: &str) -> Self {
        Self {
            key: key.to_string(),
            display_name: key.to_string(),
            position: Position::default(),
        }
    }
}

/// Lignes d'un planning généré : cuisine, salle, bar puis ordre alphabétique.
///
/// `only` restreint l'affichage à une sélection de clés (filtre du visualiseur).
pub fn rows_for_grid(grid: &Grid, users: &[Collaborator], only: Option<&[String]>) -> Vec<RowInfo> {
    let mut rows: Vec<RowInfo> = grid
        .row_keys()
        .filter(|k| only.map_or(true, |keep| keep.iter().any(|o| o.as_str() == *k)))
        .map(|k| match users.iter().find(|u| u.username == k) {
            Some(u) => RowInfo::from_collaborator(k, u),
            None => RowInfo::bare(k),
        })
        .collect();
    rows.sort_by(|a, b| match a.position.display_rank().cmp(&b.position.display_rank()) {
        Ordering::Equal => a.key.cmp(&b.key),
        other => other,
    });
    rows
}

/// Lignes d'un modèle en cours d'édition : collaborateurs, dans l'ordre de l'effectif.
pub fn rows_for_roster(users: &[Collaborator]) -> Vec<RowInfo> {
    users
        .iter()
        .filter(|u| u.is_collaborator)
        .map(|u| RowInfo::from_collaborator(&crate::grid::row_key_for(u).key, u))
        .collect()
}

/// "Lun 20" si la date de début de semaine est connue, sinon "Lunedì".
pub fn day_label(day: DayKey, start_date: Option<NaiveDate>) -> String {
    match start_date {
        Some(start) => {
            let date = start + Duration::days(day.index() as i64);
            format!("{} {:02}", day.short_label(), date.day())
        }
        None => day.label().to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotCell {
    pub occupied: bool,
    /// Arrondi à gauche : début d'une suite de créneaux occupés.
    pub cap_start: bool,
    /// Arrondi à droite : fin d'une suite.
    pub cap_end: bool,
    /// "HH:MM - HH:MM", posé sur le premier créneau de chaque segment.
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DayRow {
    pub info: RowInfo,
    pub cells: Vec<SlotCell>,
    pub minutes: u32,
}

impl DayRow {
    pub fn hours(&self) -> String {
        time::format_decimal_hours(self.minutes)
    }

    pub fn color(&self) -> &'static str {
        bar_color(self.info.position)
    }

    /// Fin (incluse) de la suite occupée qui contient `slot`.
    pub fn run_end(&self, slot: usize) -> usize {
        let mut end = slot;
        while end < self.cells.len() && !self.cells[end].cap_end {
            end += 1;
        }
        end.min(self.cells.len().saturating_sub(1))
    }
}

/// Vue d'une journée : une ligne par collaborateur, une colonne par créneau.
#[derive(Debug, Clone)]
pub struct DayView {
    pub day: DayKey,
    pub title: String,
    pub slots: Vec<Slot>,
    pub rows: Vec<DayRow>,
    pub total_minutes: u32,
}

impl DayView {
    pub fn build(
        grid: &Grid,
        rows: &[RowInfo],
        day: DayKey,
        slots: &[Slot],
        start_date: Option<NaiveDate>,
    ) -> Self {
        let rows: Vec<DayRow> = rows
            .iter()
            .map(|info| build_row(grid, info, day, slots))
            .collect();
        let total_minutes = rows.iter().map(|r| r.minutes).sum();
        Self {
            day,
            title: day_label(day, start_date),
            slots: slots.to_vec(),
            rows,
            total_minutes,
        }
    }

    /// Total de la journée, "Hh Mm".
    pub fn total_label(&self) -> String {
        time::format_hours_minutes(self.total_minutes)
    }

    /// Clic sur la colonne visible `column` de la ligne `row`.
    pub fn hit(&self, viewport: &Viewport, row: usize, column: usize) -> Option<CellClick> {
        let info = &self.rows.get(row)?.info;
        let slot = self.slots.get(viewport.column_to_slot(column)?)?;
        Some(CellClick {
            row_key: info.key.clone(),
            day: self.day,
            slot: slot.label.clone(),
        })
    }
}

fn build_row(grid: &Grid, info: &RowInfo, day: DayKey, slots: &[Slot]) -> DayRow {
    let cell = grid.get(&info.key, day);
    let occupied: Vec<bool> = slots
        .iter()
        .map(|s| cell.is_some_and(|c| is_occupied_at(c, s.minutes)))
        .collect();

    let mut cells: Vec<SlotCell> = occupied
        .iter()
        .enumerate()
        .map(|(i, &busy)| SlotCell {
            occupied: busy,
            cap_start: busy && (i == 0 || !occupied[i - 1]),
            cap_end: busy && (i + 1 == occupied.len() || !occupied[i + 1]),
            label: None,
        })
        .collect();

    if let Some(cell) = cell {
        for (in_t, out_t) in cell.segments() {
            let (Some(start), Some(end)) = (time::time_to_minutes(in_t), time::time_to_minutes(out_t))
            else {
                continue;
            };
            if let Some(anchor) = slots.iter().position(|s| start <= s.minutes && s.minutes < end) {
                cells[anchor].label = Some(format!("{} - {}", clip(in_t), clip(out_t)));
            }
        }
    }

    DayRow {
        info: info.clone(),
        cells,
        minutes: cell.map_or(0, time::cell_minutes),
    }
}

fn clip(t: &str) -> &str {
    t.get(..5).unwrap_or(t)
}

#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub info: RowInfo,
    pub day_minutes: Vec<u32>,
}

impl SummaryRow {
    pub fn total_minutes(&self) -> u32 {
        self.day_minutes.iter().sum()
    }
}

/// Récapitulatif hebdomadaire : heures par jour et total de la semaine.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub days: Vec<DayKey>,
    pub headers: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryView {
    pub fn build(
        grid: &Grid,
        rows: &[RowInfo],
        days: &[DayKey],
        start_date: Option<NaiveDate>,
    ) -> Self {
        let rows = rows
            .iter()
            .map(|info| SummaryRow {
                info: info.clone(),
                day_minutes: days
                    .iter()
                    .map(|d| time::cell_minutes(grid.cell(&info.key, *d)))
                    .collect(),
            })
            .collect();
        Self {
            days: days.to_vec(),
            headers: days.iter().map(|d| day_label(*d, start_date)).collect(),
            rows,
        }
    }
}
