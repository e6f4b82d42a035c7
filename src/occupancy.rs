use crate::grid::Grid;
use crate::model::{DayCell, DayKey};
use crate::time::time_to_minutes;

/// Le créneau `minutes` tombe-t-il dans un segment actif de la cellule ?
///
/// Intervalles semi-ouverts `[in, out)` : l'entrée est occupée, la sortie non.
pub fn is_occupied_at(cell: &DayCell, minutes: u32) -> bool {
    in_segment(&cell.in1, &cell.out1, minutes) || in_segment(&cell.in2, &cell.out2, minutes)
}

fn in_segment(in_time: &str, out_time: &str, minutes: u32) -> bool {
    match (time_to_minutes(in_time), time_to_minutes(out_time)) {
        (Some(start), Some(end)) => start <= minutes && minutes < end,
        _ => false,
    }
}

/// Occupation d'un créneau ("HH:MM") pour une ligne et un jour.
///
/// Cellule absente ou libellé illisible : `false`.
pub fn is_occupied(grid: &Grid, row: &str, day: DayKey, slot_label: &str) -> bool {
    let Some(cell) = grid.get(row, day) else {
        return false;
    };
    match time_to_minutes(slot_label) {
        Some(minutes) => is_occupied_at(cell, minutes),
        None => false,
    }
}
