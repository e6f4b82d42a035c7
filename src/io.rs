use crate::attendance::MonthReport;
use crate::model::{AdminLevel, Collaborator, Position};
use crate::store::AppState;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de collaborateurs depuis CSV, header
/// `username,nome,cognome[,posizione][,collaboratore][,livello][,ore_contratto][,password]`
pub fn import_collaborators_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Collaborator>> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_collaborators(rdr)
}

fn read_collaborators<R: std::io::Read>(mut rdr: csv::Reader<R>) -> anyhow::Result<Vec<Collaborator>> {
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let username = rec.get(0).context("missing username")?.trim();
        let name = rec.get(1).context("missing nome")?.trim();
        let surname = rec.get(2).unwrap_or("").trim();
        if username.is_empty() || name.is_empty() {
            bail!("invalid collaborator row (empty username or nome)");
        }
        let mut c = Collaborator::new(name, surname, username);
        if let Some(raw) = non_empty(rec.get(3)) {
            c.position = Position::parse(raw)
                .with_context(|| format!("invalid posizione `{raw}` for {username}"))?;
        }
        if let Some(raw) = non_empty(rec.get(4)) {
            c.is_collaborator = parse_bool(raw)
                .with_context(|| format!("invalid collaboratore value for {username}"))?;
        }
        if let Some(raw) = non_empty(rec.get(5)) {
            let level: u8 = raw
                .parse()
                .with_context(|| format!("invalid livello for {username}"))?;
            c.admin_level = AdminLevel::from(level);
        }
        if let Some(raw) = non_empty(rec.get(6)) {
            c.contract_hours = raw
                .replace(',', ".")
                .parse()
                .with_context(|| format!("invalid ore_contratto for {username}"))?;
        }
        if let Some(raw) = non_empty(rec.get(7)) {
            c.password = raw.to_string();
        }
        out.push(c);
    }
    Ok(out)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "si" | "sì" | "s" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON du document (jolie mise en forme)
pub fn export_state_json<P: AsRef<Path>>(path: P, state: &AppState) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(state)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des présences: header `username,date,in,out,totale_giorno,totale_settimana`
pub fn export_attendance_csv<P: AsRef<Path>>(path: P, report: &MonthReport) -> anyhow::Result<()> {
    let w = WriterBuilder::new().has_headers(true).from_path(path)?;
    write_attendance(w, report)
}

fn write_attendance<W: std::io::Write>(mut w: csv::Writer<W>, report: &MonthReport) -> anyhow::Result<()> {
    w.write_record(["username", "date", "in", "out", "totale_giorno", "totale_settimana"])?;
    for user in &report.users {
        for day in &user.days {
            let date = day.date.format("%Y-%m-%d").to_string();
            let total = day.day_total();
            let week = day.week_total().unwrap_or_default();
            w.write_record([
                user.username.as_str(),
                date.as_str(),
                day.clock_in(),
                day.clock_out(),
                total.as_str(),
                week.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClockEntry, TimeEntries};
    use crate::timeclock::save_entry;
    use chrono::NaiveDate;

    #[test]
    fn reads_optional_columns() {
        let data = "username,nome,cognome,posizione,collaboratore,livello,ore_contratto\n\
                    anna,Anna,Neri,cucina,si,1,\"24,5\"\n\
                    boss,Mario,Rossi,,no,2\n";
        let rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes());
        let users = read_collaborators(rdr).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].position, Position::Kitchen);
        assert_eq!(users[0].admin_level, AdminLevel::Manager);
        assert_eq!(users[0].contract_hours, 24.5);
        assert!(!users[1].is_collaborator);
        assert_eq!(users[1].position, Position::Floor);
        assert_eq!(users[1].contract_hours, 40.0);
    }

    #[test]
    fn rejects_bad_values() {
        let data = "username,nome,cognome,posizione\nanna,Anna,Neri,terrazza\n";
        let rdr = ReaderBuilder::new().has_headers(true).from_reader(data.as_bytes());
        assert!(read_collaborators(rdr).is_err());
        let data = "username,nome\n,Anna\n";
        let rdr = ReaderBuilder::new().has_headers(true).from_reader(data.as_bytes());
        assert!(read_collaborators(rdr).is_err());
    }

    #[test]
    fn attendance_rows_carry_week_totals() {
        let users = vec![Collaborator::new("Anna", "Neri", "anna")];
        let mut entries = TimeEntries::new();
        let day = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
        save_entry(&mut entries, "anna", day, ClockEntry::new("10:00", "12:00"));
        let report = MonthReport::build(&users, &entries, 2026, 1);

        let mut buf = Vec::new();
        write_attendance(WriterBuilder::new().from_writer(&mut buf), &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 32);
        assert_eq!(lines[0], "username,date,in,out,totale_giorno,totale_settimana");
        assert_eq!(lines[4], "anna,2026-01-04,10:00,12:00,2h,2h");
        assert_eq!(lines[5], "anna,2026-01-05,,,0h,");
    }
}
