#![forbid(unsafe_code)]
use chrono::Utc;
use proptest::prelude::*;
use proptest::test_runner::Config;
use turni::editor::{create_template, TemplateEditor};
use turni::model::PresetId;
use turni::occupancy::is_occupied_at;
use turni::time::{minutes_to_time, segment_minutes};
use turni::{can_access, AccessMatrix, AdminLevel, Collaborator, DayCell, DayKey, Section, TimePreset};

fn clock() -> impl Strategy<Value = u32> {
    0_u32..=1440
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn segment_duration_is_clamped_difference(a in clock(), b in clock()) {
        let got = segment_minutes(&minutes_to_time(a), &minutes_to_time(b));
        prop_assert_eq!(got, b.saturating_sub(a));
    }

    #[test]
    fn occupancy_is_half_open(start in 0_u32..1440, len in 1_u32..600, probe in clock()) {
        let end = (start + len).min(1440);
        let cell = DayCell {
            in1: minutes_to_time(start),
            out1: minutes_to_time(end),
            ..DayCell::default()
        };
        prop_assert!(is_occupied_at(&cell, start) || start == end);
        prop_assert!(!is_occupied_at(&cell, end));
        prop_assert_eq!(is_occupied_at(&cell, probe), start <= probe && probe < end);
    }

    #[test]
    fn apply_then_clear_is_identity(row in 0_usize..2, day in 0_usize..7, a in 0_u32..720, b in 720_u32..1440) {
        let staff = vec![
            Collaborator::new("Anna", "Neri", "anna"),
            Collaborator::new("Bruno", "Rossi", "bruno"),
        ];
        let (template, _) = create_template("W", &staff, Utc::now()).unwrap();
        let original = template.clone();
        let mut editor = TemplateEditor::new(&[template], &staff);
        let preset = TimePreset {
            id: PresetId::new("p"),
            name: None,
            in1: minutes_to_time(a),
            out1: minutes_to_time(b),
            in2: String::new(),
            out2: String::new(),
        };
        let row = ["anna", "bruno"][row];
        let day = DayKey::ALL[day];
        editor.apply_preset(&original.id, row, day, &preset).unwrap();
        editor.clear_cell(&original.id, row, day).unwrap();
        prop_assert_eq!(editor.commit(&original.id).unwrap(), original);
    }

    #[test]
    fn unset_matrix_entries_allow(level in 0_u8..3, idx in 0_usize..9) {
        let section = Section::ALL[idx];
        let level = AdminLevel::from(level);
        let allowed = can_access(level, section, &AccessMatrix::new());
        prop_assert_eq!(allowed, !section.boss_only() || level == AdminLevel::Boss);
    }
}
