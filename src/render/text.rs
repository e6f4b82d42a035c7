use super::view::{DayRow, DayView, SummaryView};
use super::viewport::Viewport;
use super::GridRenderer;
use crate::time;

const NAME_WIDTH: usize = 14;
const SUMMARY_CELL_WIDTH: usize = 7;

/// Rendu terminal : deux caractères par créneau, barres `(==)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextGrid;

impl GridRenderer for TextGrid {
    fn render_day(&self, view: &DayView, viewport: &Viewport) -> String {
        let range = viewport.visible_range();
        let mut out = String::new();

        out.push_str(&format!("{}  Totale: {}\n", view.title, view.total_label()));

        let mut header = format!("{:<NAME_WIDTH$}|", "Collaboratore");
        for slot in &view.slots[range.clone()] {
            if slot.is_closing() {
                header.push_str("  ");
            } else if slot.is_full_hour() {
                header.push_str(&slot.label[..2]);
            } else {
                header.push_str("· ");
            }
        }
        header.push_str("| Ore");
        out.push_str(&header);
        out.push('\n');

        for row in &view.rows {
            out.push_str(&format!("{:<NAME_WIDTH$}|", fit(&row.info.display_name)));
            out.push_str(&render_bar(row, range.clone()));
            out.push_str(&format!("| {}\n", row.hours()));
        }
        out
    }

    fn render_summary(&self, view: &SummaryView) -> String {
        let mut out = format!("{:<NAME_WIDTH$}", "Collaboratore");
        for h in &view.headers {
            out.push_str(&format!(" | {:>SUMMARY_CELL_WIDTH$}", h));
        }
        out.push_str(" | TOTALE\n");
        for row in &view.rows {
            out.push_str(&format!("{:<NAME_WIDTH$}", fit(&row.info.display_name)));
            for m in &row.day_minutes {
                out.push_str(&format!(
                    " | {:>SUMMARY_CELL_WIDTH$}",
                    time::format_decimal_hours(*m)
                ));
            }
            out.push_str(&format!(" | {}\n", time::format_hours_minutes(row.total_minutes())));
        }
        out
    }
}

fn fit(name: &str) -> String {
    name.chars().take(NAME_WIDTH - 1).collect()
}

/// Barre d'une ligne sur la plage visible, libellés incrustés dans la barre.
fn render_bar(row: &DayRow, range: std::ops::Range<usize>) -> String {
    let mut chars: Vec<char> = Vec::with_capacity(range.len() * 2);
    for cell in &row.cells[range.clone()] {
        if cell.occupied {
            chars.push(if cell.cap_start { '(' } else { '=' });
            chars.push(if cell.cap_end { ')' } else { '=' });
        } else {
            chars.push(' ');
            chars.push(' ');
        }
    }

    for slot in range.clone() {
        let Some(label) = &row.cells[slot].label else {
            continue;
        };
        let end = row.run_end(slot).min(range.end - 1);
        let limit = (end - range.start) * 2 + 1;
        let mut pos = (slot - range.start) * 2 + 1;
        for ch in label.chars() {
            if pos >= limit {
                break;
            }
            chars[pos] = ch;
            pos += 1;
        }
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::model::DayKey;
    use crate::render::view::RowInfo;
    use crate::time::time_slots;

    fn view() -> DayView {
        let mut grid = Grid::new();
        let c = grid.cell_mut("anna", DayKey::Lunedi);
        c.in1 = "08:00".into();
        c.out1 = "09:00".into();
        c.in2 = "10:00".into();
        c.out2 = "10:30".into();
        DayView::build(&grid, &[RowInfo::bare("anna")], DayKey::Lunedi, &time_slots(), None)
    }

    #[test]
    fn short_runs_are_capped_on_both_ends() {
        let view = view();
        let vp = Viewport::new(view.slots.len(), 6);
        let text = TextGrid.render_day(&view, &vp);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Lunedì  Totale: 1h 30m");
        assert_eq!(lines[1], "Collaboratore |08· 09· 10· | Ore");
        // 08:00-09:00 tient sur deux créneaux : le libellé est tronqué à la barre
        assert_eq!(lines[2], "anna          |(08)    ()  | 1,5h");
    }

    #[test]
    fn scrolled_out_labels_are_hidden() {
        let view = view();
        let mut vp = Viewport::new(view.slots.len(), 4);
        vp.scroll_to(1);
        let text = TextGrid.render_day(&view, &vp);
        assert!(text.contains("|=)    ()|"));
    }
}
