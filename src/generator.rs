//! Génération d'un planning figé à partir d'un modèle.

use crate::model::{GeneratedShift, ShiftId, Template, TemplateId};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("shift name cannot be empty")]
    EmptyName,
    #[error("unknown template: {0}")]
    UnknownTemplate(TemplateId),
}

/// Lundi proposé par défaut : aujourd'hui si lundi, sinon le lundi suivant.
pub fn next_monday(today: NaiveDate) -> NaiveDate {
    let days = match today.weekday() {
        Weekday::Sun => 1,
        Weekday::Mon => 0,
        other => 8 - i64::from(other.number_from_monday()),
    };
    today + Duration::days(days)
}

/// Dimanche de la semaine de `date` (la date elle-même si c'est un dimanche).
pub fn sunday_of_week(date: NaiveDate) -> NaiveDate {
    let days = match date.weekday() {
        Weekday::Sun => 0,
        other => 7 - i64::from(other.number_from_monday()),
    };
    date + Duration::days(days)
}

/// Copie profonde de la grille du modèle dans un nouveau planning.
pub fn generate_shift(
    templates: &[Template],
    template_id: &TemplateId,
    name: &str,
    start: NaiveDate,
    now: DateTime<Utc>,
) -> Result<GeneratedShift, GenerateError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GenerateError::EmptyName);
    }
    let template = templates
        .iter()
        .find(|t| &t.id == template_id)
        .ok_or_else(|| GenerateError::UnknownTemplate(template_id.clone()))?;
    Ok(GeneratedShift {
        id: ShiftId::random(),
        name: name.to_string(),
        template_id: template.id.clone(),
        template_name: template.name.clone(),
        start_date: start,
        end_date: sunday_of_week(start),
        grid: template.grid.clone(),
        created_at: Some(now),
    })
}

/// Planning du jour pour un collaborateur ; le plus récent l'emporte.
pub fn todays_shift<'a>(
    shifts: &'a [GeneratedShift],
    row_key: &str,
    today: NaiveDate,
) -> Option<&'a GeneratedShift> {
    shifts
        .iter()
        .filter(|s| s.covers(today) && s.grid.contains_row(row_key))
        .max_by_key(|s| s.start_date)
}
