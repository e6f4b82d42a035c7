use super::view::{DayView, SummaryView};
use super::viewport::Viewport;
use super::GridRenderer;
use crate::time;

const SLOT_WIDTH_PX: u32 = 40;
const NAME_WIDTH_PX: u32 = 100;
const TOTAL_COLOR: &str = "#27ae60";

/// Rendu HTML autonome : colonne des noms figée (`position: sticky`) et axe horaire
/// dans un seul conteneur défilant, en-tête compris.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlGrid;

impl GridRenderer for HtmlGrid {
    fn render_day(&self, view: &DayView, viewport: &Viewport) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "<section class=\"gantt-day\" data-day=\"{}\">\n<h3>{} <span style=\"background:{TOTAL_COLOR};color:#fff;padding:4px 12px;border-radius:8px\">Totale: {}</span></h3>\n",
            view.day,
            escape(&view.title),
            view.total_label()
        ));
        out.push_str(&format!(
            "<div class=\"gantt-scroll\" data-scroll-slot=\"{}\" style=\"overflow-x:auto\">\n<table style=\"border-collapse:collapse;table-layout:fixed;font-size:11px\">\n<thead><tr>",
            viewport.offset()
        ));
        out.push_str(&format!(
            "<th style=\"position:sticky;left:0;z-index:2;min-width:{NAME_WIDTH_PX}px\">Collaboratore</th>"
        ));
        for slot in &view.slots {
            let text = if slot.is_closing() {
                ""
            } else if slot.is_full_hour() {
                slot.label.as_str()
            } else {
                "·"
            };
            out.push_str(&format!("<th style=\"width:{SLOT_WIDTH_PX}px\">{text}</th>"));
        }
        out.push_str("<th>Ore</th></tr></thead>\n<tbody>\n");

        for row in &view.rows {
            out.push_str(&format!(
                "<tr data-row=\"{}\"><td style=\"position:sticky;left:0;z-index:1;white-space:nowrap\">{}</td>",
                escape(&row.info.key),
                escape(&row.info.display_name)
            ));
            for (cell, slot) in row.cells.iter().zip(&view.slots) {
                if !cell.occupied {
                    out.push_str(&format!("<td data-slot=\"{}\"></td>", slot.label));
                    continue;
                }
                let left = if cell.cap_start { "999px" } else { "0" };
                let right = if cell.cap_end { "999px" } else { "0" };
                out.push_str(&format!(
                    "<td data-slot=\"{}\" style=\"background:{};border-radius:{left} {right} {right} {left};position:relative\">",
                    slot.label,
                    row.color()
                ));
                if let Some(label) = &cell.label {
                    out.push_str(&format!(
                        "<span style=\"position:absolute;left:10px;color:#fff;font-weight:700;white-space:nowrap\">{}</span>",
                        escape(label)
                    ));
                }
                out.push_str("</td>");
            }
            out.push_str(&format!("<td><b>{}</b></td></tr>\n", row.hours()));
        }
        out.push_str("</tbody>\n</table>\n</div>\n</section>\n");
        out
    }

    fn render_summary(&self, view: &SummaryView) -> String {
        let mut out = String::from(
            "<section class=\"gantt-summary\">\n<h3>Riepilogo ore settimanali</h3>\n<table style=\"border-collapse:collapse;font-size:11px\">\n<thead><tr><th>Collaboratore</th>",
        );
        for h in &view.headers {
            out.push_str(&format!("<th>{}</th>", escape(h)));
        }
        out.push_str(&format!(
            "<th style=\"background:{TOTAL_COLOR};color:#fff\">TOTALE</th></tr></thead>\n<tbody>\n"
        ));
        for row in &view.rows {
            out.push_str(&format!("<tr><td>{}</td>", escape(&row.info.display_name)));
            for m in &row.day_minutes {
                out.push_str(&format!("<td>{}</td>", time::format_decimal_hours(*m)));
            }
            out.push_str(&format!(
                "<td style=\"color:{TOTAL_COLOR};font-weight:bold\">{}</td></tr>\n",
                time::format_hours_minutes(row.total_minutes())
            ));
        }
        out.push_str("</tbody>\n</table>\n</section>\n");
        out
    }
}

/// Page complète autour d'un fragment.
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"it\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
