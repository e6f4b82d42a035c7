#![forbid(unsafe_code)]
use chrono::{NaiveDate, Utc};
use turni::editor::{create_template, ProgressBand, TemplateEditor};
use turni::generator::generate_shift;
use turni::model::{CellField, PresetId};
use turni::timeclock::prefill;
use turni::{Collaborator, DayKey, TimeEntries, TimePreset};

fn staff() -> Vec<Collaborator> {
    vec![
        Collaborator::new("Anna", "Neri", "anna"),
        Collaborator::new("Bruno", "Rossi", "bruno"),
    ]
}

fn morning() -> TimePreset {
    TimePreset {
        id: PresetId::new("mattina"),
        name: Some("Mattina".into()),
        in1: "08:00".into(),
        out1: "15:30".into(),
        in2: String::new(),
        out2: String::new(),
    }
}

#[test]
fn apply_then_clear_restores_the_empty_grid() {
    let (template, _) = create_template("Base", &staff(), Utc::now()).unwrap();
    let original = template.clone();
    let mut editor = TemplateEditor::new(&[template], &staff());

    editor
        .apply_preset(&original.id, "bruno", DayKey::Giovedi, &morning())
        .unwrap();
    assert_ne!(editor.commit(&original.id).unwrap(), original);
    editor.clear_cell(&original.id, "bruno", DayKey::Giovedi).unwrap();
    assert_eq!(editor.commit(&original.id).unwrap(), original);
}

#[test]
fn week_of_presets_reaches_the_contract() {
    let (template, _) = create_template("Base", &staff(), Utc::now()).unwrap();
    let id = template.id.clone();
    let mut editor = TemplateEditor::new(&[template], &staff());
    editor.focus_on(&id, "anna", DayKey::Lunedi);

    // saisie au clavier : chaque application avance le curseur
    for _ in 0..5 {
        let (row, day) = editor.focused_cell().unwrap();
        let (row, day) = (row.to_string(), day);
        editor.apply_preset(&id, &row, day, &morning()).unwrap();
    }
    assert_eq!(editor.focused_cell(), Some(("anna", DayKey::Sabato)));
    editor
        .update_cell(&id, "anna", DayKey::Sabato, CellField::In1, "10:00")
        .unwrap();
    editor
        .update_cell(&id, "anna", DayKey::Sabato, CellField::Out1, "14:30")
        .unwrap();

    // 5 × 7h30 + 4h30 = 42h
    assert_eq!(editor.weekly_minutes(&id, "anna"), 42 * 60);
    let progress = editor.contract_progress(&id, &staff()[0]);
    assert!((progress.percentage - 105.0).abs() < 1e-9);
    assert_eq!(progress.band, ProgressBand::Over);
    assert_eq!(progress.bar_width, 100.0);
}

#[test]
fn generated_shift_feeds_the_time_clock() {
    let (template, _) = create_template("Base", &staff(), Utc::now()).unwrap();
    let id = template.id.clone();
    let mut editor = TemplateEditor::new(&[template], &staff());
    editor
        .apply_preset(&id, "anna", DayKey::Martedi, &morning())
        .unwrap();
    let saved = editor.commit(&id).unwrap();

    let start = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
    let shift = generate_shift(&[saved], &id, "Settimana 4", start, Utc::now()).unwrap();
    assert_eq!(shift.end_date, NaiveDate::from_ymd_opt(2026, 1, 25).unwrap());

    // la grille du planning ne suit plus le brouillon
    editor.clear_cell(&id, "anna", DayKey::Martedi).unwrap();
    assert_eq!(shift.grid.cell("anna", DayKey::Martedi).out1, "15:30");

    let shifts = vec![shift];
    let entry = prefill(&TimeEntries::new(), &shifts, "anna", start);
    assert_eq!((entry.clock_in.as_str(), entry.clock_out.as_str()), ("08:00", "15:30"));
}
