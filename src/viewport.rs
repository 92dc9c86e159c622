/// Mapping between terminal cells and play-area coordinates.
///
/// The terminal frame reserves row 0 for the HUD, row 1 and row `h-2` for
/// the border, the last row for the controls hint, and column 0 / `w-1`
/// for the side walls.  Everything inside is the play area, stretched to
/// cover `[0, width] × [0, height]`.

use crate::geometry::Point;

/// Top-left play cell: one column past the left wall, one row below the top bar.
const ORIGIN_COL: u16 = 1;
const ORIGIN_ROW: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Screen offset of the play area, in cells.
    pub origin: Point,
    /// Play-area size in cells.
    pub cells: Point,
    /// Play-area size in world units.
    pub area: Point,
}

impl Viewport {
    /// Build the viewport for a terminal of `cols × rows` cells.
    pub fn new(cols: u16, rows: u16, width: f64, height: f64) -> Self {
        let play_cols = cols.saturating_sub(2).max(1);
        let play_rows = rows.saturating_sub(4).max(1);
        Self {
            origin: Point::new(ORIGIN_COL as f64, ORIGIN_ROW as f64),
            cells: Point::new(play_cols as f64, play_rows as f64),
            area: Point::new(width, height),
        }
    }

    /// A viewport where one cell is one world unit and there is no offset.
    pub fn identity(width: f64, height: f64) -> Self {
        Self {
            origin: Point::ZERO,
            cells: Point::new(width, height),
            area: Point::new(width, height),
        }
    }

    /// World units covered by one cell on each axis.
    pub fn cell_size(&self) -> Point {
        self.area / self.cells
    }

    /// Translate a screen position (in cells) into play-area coordinates.
    pub fn to_play_area(&self, screen: Point) -> Point {
        (screen - self.origin) * self.cell_size()
    }

    /// The cell a play-area point is drawn in, kept inside the play region.
    pub fn to_cell(&self, p: Point) -> (u16, u16) {
        let s = (p / self.cell_size()).floor();
        let col = s.x.clamp(0.0, self.cells.x - 1.0);
        let row = s.y.clamp(0.0, self.cells.y - 1.0);
        (
            (self.origin.x + col) as u16,
            (self.origin.y + row) as u16,
        )
    }

    /// The screen position at the centre of a terminal cell.
    pub fn cell_centre(col: u16, row: u16) -> Point {
        Point::new(col as f64 + 0.5, row as f64 + 0.5)
    }
}
