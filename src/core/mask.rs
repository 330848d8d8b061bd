use std::fmt;

/// Marks which offsets of a `(2r+1)²` window lie inside the circle of radius `r`.
///
/// Cell `(dx + r, dy + r)` is set iff `sqrt(dx² + dy²) <= r`, with the distance
/// narrowed to `f32` before the comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircularMask {
    radius: usize,
    side: usize,
    cells: Vec<bool>,
}

impl CircularMask {
    pub fn new(radius: usize) -> Self {
        let side = radius * 2 + 1;
        let mut cells = Vec::with_capacity(side * side);
        for x in 0..side {
            for y in 0..side {
                let diff_x = x as f64 - radius as f64;
                let diff_y = y as f64 - radius as f64;
                let distance = (diff_x * diff_x + diff_y * diff_y).sqrt() as f32;
                cells.push(distance <= radius as f32);
            }
        }

        Self {
            radius,
            side,
            cells,
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Whether offset `(dx, dy)` from the center is inside the circle.
    /// Offsets outside the window are never inside.
    #[inline]
    pub fn contains(&self, dx: isize, dy: isize) -> bool {
        let radius = self.radius as isize;
        if dx.abs() > radius || dy.abs() > radius {
            return false;
        }
        self.cell((dx + radius) as usize, (dy + radius) as usize)
    }

    /// Grid access by window coordinates, `0..side` on both axes.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> bool {
        self.cells[x * self.side + y]
    }

    /// Number of offsets inside the circle.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|inside| **inside).count()
    }
}

impl fmt::Display for CircularMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.side {
            for y in 0..self.side {
                f.write_str(if self.cell(x, y) { " *" } else { "  " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
