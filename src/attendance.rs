//! Récapitulatif mensuel des présences à partir des pointages.

use crate::model::{ClockEntry, Collaborator, TimeEntries};
use crate::time::format_hours_minutes;
use crate::timeclock::{self, date_key, month_key};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Tous les jours du mois, dans l'ordre ; vide si le mois est invalide.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    std::iter::successors(Some(first), |d| Some(*d + Duration::days(1)))
        .take_while(|d| d.month() == month)
        .collect()
}

/// Découpe en semaines, chaque groupe se fermant sur un dimanche.
pub fn week_groups(days: &[NaiveDate]) -> Vec<&[NaiveDate]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for (i, day) in days.iter().enumerate() {
        if day.weekday() == Weekday::Sun {
            groups.push(&days[start..=i]);
            start = i + 1;
        }
    }
    if start < days.len() {
        groups.push(&days[start..]);
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceDay {
    pub date: NaiveDate,
    pub entry: Option<ClockEntry>,
    pub minutes: u32,
    /// Total de la semaine, porté par le dernier jour de chaque groupe.
    pub week_minutes: Option<u32>,
}

impl AttendanceDay {
    pub fn clock_in(&self) -> &str {
        self.entry.as_ref().map_or("", |e| e.clock_in.as_str())
    }

    pub fn clock_out(&self) -> &str {
        self.entry.as_ref().map_or("", |e| e.clock_out.as_str())
    }

    pub fn day_total(&self) -> String {
        format_hours_minutes(self.minutes)
    }

    pub fn week_total(&self) -> Option<String> {
        self.week_minutes.map(format_hours_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttendance {
    pub username: String,
    pub full_name: String,
    pub days: Vec<AttendanceDay>,
}

impl UserAttendance {
    pub fn total_minutes(&self) -> u32 {
        self.days.iter().map(|d| d.minutes).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthReport {
    pub month: String,
    pub users: Vec<UserAttendance>,
}

impl MonthReport {
    pub fn build(users: &[Collaborator], entries: &TimeEntries, year: i32, month: u32) -> Self {
        let days = month_days(year, month);
        let month_key = days.first().map(|d| month_key(*d)).unwrap_or_default();
        let users = users
            .iter()
            .map(|user| {
                let by_date = entries.get(&user.username).and_then(|m| m.get(&month_key));
                let mut rows: Vec<AttendanceDay> = days
                    .iter()
                    .map(|date| {
                        let entry = by_date.and_then(|e| e.get(&date_key(*date))).cloned();
                        let minutes = entry.as_ref().map_or(0, timeclock::entry_minutes);
                        AttendanceDay {
                            date: *date,
                            entry,
                            minutes,
                            week_minutes: None,
                        }
                    })
                    .collect();
                let mut start = 0;
                for group in week_groups(&days) {
                    let end = start + group.len();
                    let total = rows[start..end].iter().map(|d| d.minutes).sum();
                    rows[end - 1].week_minutes = Some(total);
                    start = end;
                }
                UserAttendance {
                    username: user.username.clone(),
                    full_name: user.full_name(),
                    days: rows,
                }
            })
            .collect();
        Self {
            month: month_key,
            users,
        }
    }
}

/// Mois présents dans les pointages de tous les utilisateurs, plus le mois courant.
pub fn available_months(entries: &TimeEntries, current: NaiveDate) -> Vec<String> {
    let mut months: BTreeSet<String> = entries.values().flat_map(|m| m.keys().cloned()).collect();
    months.insert(month_key(current));
    months.into_iter().rev().collect()
}
