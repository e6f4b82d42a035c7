//! Arithmétique des horaires "HH:MM" : minutes depuis minuit, durées de segments,
//! formats d'affichage et axe des créneaux d'une demi-heure.
//!
//! Deux conventions coexistent pour une valeur vide :
//! - `time_to_minutes` renvoie `None` (tests de présence, occupation d'un créneau) ;
//! - `minutes_or_zero` renvoie `0` (sommes de durées).

use crate::model::DayCell;
use thiserror::Error;

/// Premier créneau affiché (08:00).
pub const SLOT_START_MINUTES: u32 = 8 * 60;
/// Dernier créneau affiché, inclus (24:00).
pub const SLOT_END_MINUTES: u32 = 24 * 60;
/// Pas de la grille.
pub const SLOT_STEP_MINUTES: u32 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid time `{0}`: expected HH:MM")]
    Malformed(String),
    #[error("time out of range: {0}")]
    OutOfRange(String),
}

/// Minutes depuis minuit, `None` si la valeur est vide, illisible ou hors de 00:00 ..= 24:00.
///
/// Accepte aussi "HH:MM:SS" (les secondes sont ignorées).
pub fn time_to_minutes(time: &str) -> Option<u32> {
    let time = time.trim();
    if time.is_empty() {
        return None;
    }
    let mut parts = time.split(':');
    let h: u32 = parts.next()?.trim().parse().ok()?;
    let m: u32 = parts.next()?.trim().parse().ok()?;
    if m >= 60 || h > 24 || (h == 24 && m != 0) {
        return None;
    }
    Some(h * 60 + m)
}

/// Variante "somme de durées" : vide ou illisible vaut 0.
pub fn minutes_or_zero(time: &str) -> u32 {
    time_to_minutes(time).unwrap_or(0)
}

/// Validation stricte d'une saisie utilisateur (00:00 ..= 24:00).
pub fn parse_clock(time: &str) -> Result<u32, TimeError> {
    let raw = time.trim();
    let (h, m) = raw
        .split_once(':')
        .ok_or_else(|| TimeError::Malformed(raw.to_string()))?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(TimeError::Malformed(raw.to_string()));
    }
    let h: u32 = h.parse().map_err(|_| TimeError::Malformed(raw.to_string()))?;
    let m: u32 = m.parse().map_err(|_| TimeError::Malformed(raw.to_string()))?;
    if m >= 60 || h > 24 || (h == 24 && m != 0) {
        return Err(TimeError::OutOfRange(raw.to_string()));
    }
    Ok(h * 60 + m)
}

/// Forme canonique "HH:MM" d'une saisie valide.
pub fn normalize_clock(time: &str) -> Result<String, TimeError> {
    parse_clock(time).map(minutes_to_time)
}

pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Durée d'un segment : `out - in` si les deux bornes sont présentes, 0 sinon.
///
/// Pas de passage de minuit : une sortie antérieure à l'entrée compte 0.
pub fn segment_minutes(in_time: &str, out_time: &str) -> u32 {
    match (time_to_minutes(in_time), time_to_minutes(out_time)) {
        (Some(start), Some(end)) => end.saturating_sub(start),
        _ => 0,
    }
}

/// Somme des deux segments d'une journée.
pub fn cell_minutes(cell: &DayCell) -> u32 {
    segment_minutes(&cell.in1, &cell.out1) + segment_minutes(&cell.in2, &cell.out2)
}

/// Heures décimales avec virgule : 450 → "7,5h".
pub fn format_decimal_hours(minutes: u32) -> String {
    let tenths = (u64::from(minutes) * 10 + 30) / 60;
    format!("{},{}h", tenths / 10, tenths % 10)
}

/// Heures et minutes : 450 → "7h 30m", 480 → "8h".
pub fn format_hours_minutes(minutes: u32) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    if m > 0 {
        format!("{h}h {m}m")
    } else {
        format!("{h}h")
    }
}

pub fn cell_hours(cell: &DayCell) -> String {
    format_decimal_hours(cell_minutes(cell))
}

pub fn cell_hours_hm(cell: &DayCell) -> String {
    format_hours_minutes(cell_minutes(cell))
}

/// Un point de l'axe horaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub minutes: u32,
    pub label: String,
}

impl Slot {
    pub fn new(minutes: u32) -> Self {
        Self {
            minutes,
            label: minutes_to_time(minutes),
        }
    }

    pub fn is_full_hour(&self) -> bool {
        self.minutes % 60 == 0
    }

    /// Le créneau de clôture (24:00) n'a pas de libellé d'en-tête.
    pub fn is_closing(&self) -> bool {
        self.minutes == SLOT_END_MINUTES
    }
}

/// Axe 08:00 → 24:00 inclus, toutes les 30 minutes.
pub fn time_slots() -> Vec<Slot> {
    (SLOT_START_MINUTES..=SLOT_END_MINUTES)
        .step_by(SLOT_STEP_MINUTES as usize)
        .map(Slot::new)
        .collect()
}
