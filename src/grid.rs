//! Grille (ligne × jour) et construction d'une grille vide pour un effectif.
//!
//! Une grille lue depuis le document peut être partielle : toute lecture d'une
//! ligne ou d'un jour absent renvoie la cellule vide partagée.

use crate::model::{Collaborator, DayCell, DayKey};
use crate::time;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static EMPTY_CELL: DayCell = DayCell::EMPTY;

pub type WeekRow = BTreeMap<DayKey, DayCell>;

/// Cellule vide (tous les champs à "").
pub fn empty_cell() -> DayCell {
    DayCell::empty()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    rows: BTreeMap<String, WeekRow>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn contains_row(&self, row: &str) -> bool {
        self.rows.contains_key(row)
    }

    pub fn row_keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn row(&self, row: &str) -> Option<&WeekRow> {
        self.rows.get(row)
    }

    /// Lecture défensive : jamais de panique sur une ligne ou un jour manquant.
    pub fn cell(&self, row: &str, day: DayKey) -> &DayCell {
        self.rows
            .get(row)
            .and_then(|r| r.get(&day))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Lecture stricte (présence réelle dans le document).
    pub fn get(&self, row: &str, day: DayKey) -> Option<&DayCell> {
        self.rows.get(row).and_then(|r| r.get(&day))
    }

    /// Accès en écriture ; une ligne absente est créée avec les 7 jours.
    pub fn cell_mut(&mut self, row: &str, day: DayKey) -> &mut DayCell {
        self.ensure_row(row).entry(day).or_default()
    }

    pub fn ensure_row(&mut self, row: &str) -> &mut WeekRow {
        let week = self.rows.entry(row.to_string()).or_default();
        for day in DayKey::ALL {
            week.entry(day).or_default();
        }
        week
    }

    /// Complète la grille pour un effectif sans toucher aux lignes existantes.
    pub fn ensure_rows<'a, I: IntoIterator<Item = &'a str>>(&mut self, rows: I) {
        for row in rows {
            self.ensure_row(row);
        }
    }

    pub fn remove_row(&mut self, row: &str) -> Option<WeekRow> {
        self.rows.remove(row)
    }

    /// Minutes travaillées par une ligne sur la semaine.
    pub fn week_minutes(&self, row: &str) -> u32 {
        DayKey::ALL
            .iter()
            .map(|d| time::cell_minutes(self.cell(row, *d)))
            .sum()
    }

    /// Minutes travaillées un jour donné, toutes lignes confondues.
    pub fn day_minutes<'a, I: IntoIterator<Item = &'a str>>(&self, rows: I, day: DayKey) -> u32 {
        rows.into_iter()
            .map(|r| time::cell_minutes(self.cell(r, day)))
            .sum()
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, BTreeMap<String, DayCell>>::deserialize(deserializer)?;
        let mut rows = BTreeMap::new();
        for (row_key, days) in raw {
            let mut week = WeekRow::new();
            for (day_raw, cell) in days {
                match DayKey::parse(&day_raw) {
                    Some(day) => {
                        week.insert(day, cell);
                    }
                    None => tracing::warn!(row = %row_key, day = %day_raw, "dropping unknown day key"),
                }
            }
            rows.insert(row_key, week);
        }
        Ok(Self { rows })
    }
}

/// Clé de ligne calculée pour un collaborateur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowKey {
    pub key: String,
    /// `true` si le username était vide et que la clé vient de nom + prénom.
    pub fallback: bool,
}

/// Avertissement remonté à l'appelant quand le repli nom + prénom a servi.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowKeyWarning {
    pub full_name: String,
    pub key: String,
}

/// Username nettoyé, ou à défaut nom + prénom sans accents, espaces ni majuscules.
pub fn row_key_for(collaborator: &Collaborator) -> RowKey {
    let username = collaborator.username.trim();
    if !username.is_empty() {
        return RowKey {
            key: username.to_string(),
            fallback: false,
        };
    }
    let key = format!(
        "{}{}",
        fold_name(&collaborator.name),
        fold_name(&collaborator.surname)
    );
    tracing::warn!(
        name = %collaborator.full_name(),
        key = %key,
        "collaborator has no username, using name-based row key"
    );
    RowKey { key, fallback: true }
}

fn fold_name(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c) && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Grille rectangulaire vide : une ligne par collaborateur, chaque jour demandé vide.
pub fn build_empty_grid(
    collaborators: &[Collaborator],
    days: &[DayKey],
) -> (Grid, Vec<RowKeyWarning>) {
    let mut grid = Grid::new();
    let mut warnings = Vec::new();
    for c in collaborators {
        let rk = row_key_for(c);
        if rk.fallback {
            warnings.push(RowKeyWarning {
                full_name: c.full_name(),
                key: rk.key.clone(),
            });
        }
        let week = grid.rows.entry(rk.key).or_default();
        for day in days {
            week.insert(*day, empty_cell());
        }
    }
    (grid, warnings)
}
