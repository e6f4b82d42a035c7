//! Vue Gantt d'une semaine : modèle de vue (barres, arrondis, libellés, totaux),
//! sélecteur de jour, défilement partagé et rendus texte / HTML.

mod html;
mod selector;
mod text;
mod view;
mod viewport;

pub use html::{page, HtmlGrid};
pub use selector::{DaySelector, SelectError, Selection};
pub use text::TextGrid;
pub use view::{
    bar_color, day_label, rows_for_grid, rows_for_roster, DayRow, DayView, RowInfo, SlotCell,
    SummaryRow, SummaryView,
};
pub use viewport::{CellClick, Viewport};

/// Permet de brancher un autre support de rendu (terminal, HTML, etc.).
pub trait GridRenderer {
    fn render_day(&self, view: &DayView, viewport: &Viewport) -> String;
    fn render_summary(&self, view: &SummaryView) -> String;
}
