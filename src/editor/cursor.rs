/// Position de saisie dans la grille d'un modèle (ligne, jour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCursor {
    pub row: usize,
    pub day: usize,
}

impl GridCursor {
    pub fn new(row: usize, day: usize) -> Self {
        Self { row, day }
    }

    /// Cellule suivante, jour par jour puis ligne suivante ; `None` après la dernière.
    pub fn next(self, rows: usize, days: usize) -> Option<Self> {
        if days == 0 {
            return None;
        }
        let (row, day) = if self.day + 1 < days {
            (self.row, self.day + 1)
        } else {
            (self.row + 1, 0)
        };
        (row < rows).then_some(Self { row, day })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_day_major() {
        assert_eq!(GridCursor::new(0, 2).next(3, 7), Some(GridCursor::new(0, 3)));
        assert_eq!(GridCursor::new(0, 6).next(3, 7), Some(GridCursor::new(1, 0)));
        assert_eq!(GridCursor::new(2, 6).next(3, 7), None);
        assert_eq!(GridCursor::new(0, 0).next(1, 0), None);
    }
}
