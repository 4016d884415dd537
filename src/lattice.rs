/// Binary occupation grid with periodic (toroidal) boundary conditions.
///
/// Cells are stored row-major. Every coordinate accessor takes signed
/// coordinates and wraps them, so `get(-1, 0)` reads column `width - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

/// Offsets of the four orthogonal neighbours: up, down, left, right.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

impl Lattice {
    /// Creates an all-empty lattice.
    ///
    /// Dimensions are validated by the configuration layer; a zero dimension
    /// is bumped to 1 so that wrapping never divides by zero.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_sites(&self) -> usize {
        self.cells.len()
    }

    /// Row-major occupation values, one byte (0 or 1) per site.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline(always)]
    fn wrap(coord: i64, dim: usize) -> usize {
        coord.rem_euclid(dim as i64) as usize
    }

    #[inline(always)]
    fn index(&self, x: i64, y: i64) -> usize {
        Self::wrap(y, self.height) * self.width + Self::wrap(x, self.width)
    }

    /// Occupation (0 or 1) at the wrapped coordinate.
    pub fn get(&self, x: i64, y: i64) -> u8 {
        self.cells[self.index(x, y)]
    }

    /// Writes the occupation at the wrapped coordinate. Any non-zero value stores 1.
    pub fn set(&mut self, x: i64, y: i64, value: u8) {
        let idx = self.index(x, y);
        self.cells[idx] = u8::from(value != 0);
    }

    /// Flips the site in place and returns the new occupation.
    pub fn flip(&mut self, x: i64, y: i64) -> u8 {
        let idx = self.index(x, y);
        self.cells[idx] = 1 - self.cells[idx];
        self.cells[idx]
    }

    /// Sum of the occupation of the four orthogonal neighbours, in `[0, 4]`.
    pub fn neighbor_sum(&self, x: i64, y: i64) -> u8 {
        // Wrap first so the +/-1 offsets cannot overflow at the i64 extremes.
        let x = Self::wrap(x, self.width) as i64;
        let y = Self::wrap(y, self.height) as i64;
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| self.get(x + dx, y + dy))
            .sum()
    }

    /// Number of occupied sites.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Empties every site.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0);
    }

    /// Iterates `(x, y, occupation)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &c)| (idx % width, idx / width, c))
    }
}
