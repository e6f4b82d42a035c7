use crate::model::DayKey;
use std::fmt;
use thiserror::Error;

/// Onglet du sélecteur : un jour ou le récapitulatif.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Day(DayKey),
    Summary,
}

impl Selection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "riepilogo" | "summary" => Some(Selection::Summary),
            other => DayKey::parse(other).map(Selection::Day),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Day(d) => f.write_str(d.as_str()),
            Selection::Summary => f.write_str("riepilogo"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("day selector needs at least one day")]
    NoDays,
    #[error("option not offered by this selector: {0}")]
    NotOffered(Selection),
}

/// Contrôle segmenté des jours ; pas d'état terminal.
#[derive(Debug, Clone)]
pub struct DaySelector {
    days: Vec<DayKey>,
    show_summary: bool,
    current: Selection,
}

impl DaySelector {
    /// Sélection initiale : `initial` s'il fait partie des jours, sinon le premier jour.
    pub fn new(days: &[DayKey], show_summary: bool, initial: Option<DayKey>) -> Result<Self, SelectError> {
        let first = *days.first().ok_or(SelectError::NoDays)?;
        let start = initial.filter(|d| days.contains(d)).unwrap_or(first);
        Ok(Self {
            days: days.to_vec(),
            show_summary,
            current: Selection::Day(start),
        })
    }

    pub fn options(&self) -> Vec<Selection> {
        let mut out: Vec<Selection> = self.days.iter().copied().map(Selection::Day).collect();
        if self.show_summary {
            out.push(Selection::Summary);
        }
        out
    }

    pub fn current(&self) -> Selection {
        self.current
    }

    /// Position de l'onglet actif (pour le curseur du contrôle).
    pub fn index(&self) -> usize {
        self.options()
            .iter()
            .position(|o| *o == self.current)
            .unwrap_or(0)
    }

    pub fn select(&mut self, selection: Selection) -> Result<(), SelectError> {
        if !self.options().contains(&selection) {
            return Err(SelectError::NotOffered(selection));
        }
        self.current = selection;
        Ok(())
    }
}
