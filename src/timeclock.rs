//! Pointages journaliers (entrée / sortie) rangés par utilisateur et par mois.

use crate::model::{ClockEntry, DayKey, GeneratedShift, TimeEntries};
use crate::time;
use chrono::{Datelike, NaiveDate};

/// "YYYY-MM"
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// "YYYY-MM-DD"
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn day_key_for(date: NaiveDate) -> DayKey {
    DayKey::from_weekday(date.weekday())
}

/// Parse une clé de mois "YYYY-MM" en (année, mois).
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (y, m) = key.trim().split_once('-')?;
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

pub fn save_entry(entries: &mut TimeEntries, username: &str, date: NaiveDate, entry: ClockEntry) {
    entries
        .entry(username.to_string())
        .or_default()
        .entry(month_key(date))
        .or_default()
        .insert(date_key(date), entry);
}

pub fn entry_for<'a>(entries: &'a TimeEntries, username: &str, date: NaiveDate) -> Option<&'a ClockEntry> {
    entries
        .get(username)?
        .get(&month_key(date))?
        .get(&date_key(date))
}

/// Valeurs proposées pour la saisie : le pointage existant, sinon le premier
/// segment du premier planning couvrant la date.
pub fn prefill(
    entries: &TimeEntries,
    shifts: &[GeneratedShift],
    username: &str,
    date: NaiveDate,
) -> ClockEntry {
    if let Some(existing) = entry_for(entries, username, date).filter(|e| !e.is_empty()) {
        return existing.clone();
    }
    let day = day_key_for(date);
    shifts
        .iter()
        .filter(|s| s.covers(date))
        .map(|s| s.grid.cell(username, day))
        .find(|cell| cell.first_segment_active())
        .map(|cell| ClockEntry::new(cell.in1.clone(), cell.out1.clone()))
        .unwrap_or_default()
}

/// Durée pointée, 0 si une borne manque ou si la sortie précède l'entrée.
pub fn entry_minutes(entry: &ClockEntry) -> u32 {
    time::segment_minutes(&entry.clock_in, &entry.clock_out)
}

/// Mois ayant des pointages pour l'utilisateur, plus le mois courant, du plus récent au plus ancien.
pub fn user_months(entries: &TimeEntries, username: &str, current: NaiveDate) -> Vec<String> {
    let mut months: Vec<String> = entries
        .get(username)
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();
    months.push(month_key(current));
    months.sort_unstable_by(|a, b| b.cmp(a));
    months.dedup();
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::model::{ShiftId, TemplateId};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn shift() -> GeneratedShift {
        let mut grid = Grid::new();
        let cell = grid.cell_mut("anna", DayKey::Martedi);
        cell.in1 = "09:00".into();
        cell.out1 = "13:00".into();
        cell.in2 = "18:00".into();
        cell.out2 = "22:00".into();
        GeneratedShift {
            id: ShiftId::new("s1"),
            name: "W".into(),
            template_id: TemplateId::new("t1"),
            template_name: "Base".into(),
            start_date: d(2026, 1, 19),
            end_date: d(2026, 1, 25),
            grid,
            created_at: None,
        }
    }

    #[test]
    fn keys() {
        assert_eq!(month_key(d(2026, 3, 5)), "2026-03");
        assert_eq!(date_key(d(2026, 3, 5)), "2026-03-05");
        assert_eq!(parse_month_key("2026-03"), Some((2026, 3)));
        assert_eq!(parse_month_key("2026-13"), None);
    }

    #[test]
    fn prefill_prefers_existing_entry_then_first_segment() {
        let shifts = vec![shift()];
        let mut entries = TimeEntries::new();
        assert_eq!(prefill(&entries, &shifts, "anna", d(2026, 1, 20)), ClockEntry::new("09:00", "13:00"));
        assert_eq!(prefill(&entries, &shifts, "anna", d(2026, 1, 21)), ClockEntry::default());

        save_entry(&mut entries, "anna", d(2026, 1, 20), ClockEntry::new("09:10", "13:05"));
        assert_eq!(prefill(&entries, &shifts, "anna", d(2026, 1, 20)), ClockEntry::new("09:10", "13:05"));
        assert_eq!(entry_minutes(entry_for(&entries, "anna", d(2026, 1, 20)).unwrap()), 235);
    }

    #[test]
    fn prefill_skips_overlapping_shift_without_a_segment() {
        let mut empty = shift();
        empty.id = ShiftId::new("s0");
        empty.grid = Grid::new();
        let shifts = vec![empty, shift()];
        assert_eq!(
            prefill(&TimeEntries::new(), &shifts, "anna", d(2026, 1, 20)),
            ClockEntry::new("09:00", "13:00")
        );
    }

    #[test]
    fn months_are_listed_newest_first() {
        let mut entries = TimeEntries::new();
        save_entry(&mut entries, "anna", d(2025, 12, 1), ClockEntry::new("08:00", "12:00"));
        save_entry(&mut entries, "anna", d(2026, 1, 2), ClockEntry::new("08:00", "12:00"));
        assert_eq!(
            user_months(&entries, "anna", d(2026, 1, 15)),
            vec!["2026-01".to_string(), "2025-12".to_string()]
        );
        assert_eq!(user_months(&entries, "bruno", d(2026, 1, 15)), vec!["2026-01".to_string()]);
    }
}
