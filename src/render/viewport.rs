use crate::model::DayKey;
use std::ops::Range;

/// Défilement horizontal partagé entre l'en-tête des créneaux et le corps de la grille.
///
/// Les deux surfaces lisent le même décalage : il n'y a rien à synchroniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    width: usize,
    total: usize,
}

impl Viewport {
    /// `total` créneaux sur l'axe, `width` visibles à la fois (au moins 1).
    pub fn new(total: usize, width: usize) -> Self {
        Self {
            offset: 0,
            width: width.max(1),
            total,
        }
    }

    /// Vue sans défilement (tout l'axe visible).
    pub fn full(total: usize) -> Self {
        Self::new(total, total)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.width)
    }

    pub fn scroll_to(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.scroll_to(target);
    }

    /// Indices des créneaux visibles.
    pub fn visible_range(&self) -> Range<usize> {
        self.offset..(self.offset + self.width).min(self.total)
    }

    /// Colonne visible → indice de créneau sur l'axe complet.
    pub fn column_to_slot(&self, column: usize) -> Option<usize> {
        let slot = self.offset + column;
        self.visible_range().contains(&slot).then_some(slot)
    }
}

/// Charge utile d'un clic sur une cellule ; le rendu ne garde aucun état d'édition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellClick {
    pub row_key: String,
    pub day: DayKey,
    pub slot: String,
}
