use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeSeq as _};

/// Largest bounding box edge of any shape in the catalog.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Color identity of a locked cell or a piece.
///
/// The palette is independent of [`PieceKind`]: depending on the
/// [`ColorPolicy`](crate::ColorPolicy), two pieces of the same kind may carry
/// different colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Cyan,
}

impl Color {
    pub const PALETTE: [Color; 7] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Orange,
        Color::Purple,
        Color::Cyan,
    ];

    /// Single character used in compact board dumps.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Orange => 'O',
            Color::Purple => 'P',
            Color::Cyan => 'C',
        }
    }
}

impl Distribution<Color> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        Color::PALETTE[rng.random_range(0..Color::PALETTE.len())]
    }
}

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// L-piece.
    L = 5,
    /// J-piece.
    J = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::L,
        PieceKind::J,
    ];

    /// Returns the spawn orientation of this kind.
    #[must_use]
    pub const fn shape(self) -> Shape {
        SPAWN_SHAPES[self as usize]
    }

    /// Returns the palette entry conventionally paired with this kind.
    #[must_use]
    pub const fn canonical_color(self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::O => Color::Yellow,
            PieceKind::T => Color::Purple,
            PieceKind::S => Color::Green,
            PieceKind::Z => Color::Red,
            PieceKind::L => Color::Orange,
            PieceKind::J => Color::Blue,
        }
    }
}

/// Occupancy matrix of a piece, at most 4×4.
///
/// Cells outside `width × height` are always empty, so two shapes compare
/// equal exactly when their visible matrices are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Builds a shape from a row-major 0/1 matrix.
    ///
    /// Evaluated at compile time for the catalog; an oversized matrix fails the build.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_matrix<const W: usize, const H: usize>(matrix: [[u8; W]; H]) -> Self {
        assert!(W >= 1 && W <= MAX_SHAPE_SIZE);
        assert!(H >= 1 && H <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = matrix[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            width: W as u8,
            height: H as u8,
            cells,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.cells[y][x]
    }

    /// Iterates over the rows of the visible matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Returns `(x, y)` offsets of occupied cells relative to the top-left corner.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, &cell)| cell.then_some((x, y)))
        })
    }

    /// Rotates 90° clockwise: transpose, then reverse the order of each row.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let (width, height) = (self.width(), self.height());
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in cells.iter_mut().enumerate().take(width) {
            for (x, cell) in row.iter_mut().enumerate().take(height) {
                *cell = self.cells[height - 1 - x][y];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

// Rows as strings, e.g. `[".#.", "###"]` for the T spawn orientation.
impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.height()))?;
        for row in self.rows() {
            let line: String = row.iter().map(|&c| if c { '#' } else { '.' }).collect();
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}

const SPAWN_SHAPES: [Shape; PieceKind::LEN] = [
    // I-piece
    Shape::from_matrix([[1, 1, 1, 1]]),
    // O-piece
    Shape::from_matrix([[1, 1], [1, 1]]),
    // T-piece
    Shape::from_matrix([[0, 1, 0], [1, 1, 1]]),
    // S-piece
    Shape::from_matrix([[1, 1, 0], [0, 1, 1]]),
    // Z-piece
    Shape::from_matrix([[0, 1, 1], [1, 1, 0]]),
    // L-piece
    Shape::from_matrix([[1, 0, 0], [1, 1, 1]]),
    // J-piece
    Shape::from_matrix([[0, 0, 1], [1, 1, 1]]),
];

/// A piece placed relative to a board.
///
/// `x`/`y` is the top-left corner of the shape's bounding box in board
/// coordinates. `y` may be negative while a piece is kicked above the visible
/// area. Pieces are values: movement and rotation return new pieces.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Color, Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T, Color::Purple).spawned(10);
/// assert_eq!((piece.x(), piece.y()), (4, 0));
/// let moved = piece.shifted(-1, 1);
/// assert_eq!((moved.x(), moved.y()), (3, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    shape: Shape,
    x: i32,
    y: i32,
}

impl Piece {
    /// Creates a piece in its spawn orientation at the board origin.
    #[must_use]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            shape: kind.shape(),
            x: 0,
            y: 0,
        }
    }

    /// Moves the piece to the spawn position of a board `board_width` cells wide.
    ///
    /// The shape keeps its current orientation; it is centered horizontally
    /// (`board_width / 2 - shape_width / 2`) on the top row.
    #[must_use]
    pub fn spawned(self, board_width: usize) -> Self {
        let column = (board_width / 2).saturating_sub(self.shape.width() / 2);
        Self {
            x: i32::try_from(column).unwrap_or(i32::MAX),
            y: 0,
            ..self
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Rotates the shape clockwise in place, without any collision check.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            ..*self
        }
    }

    /// Returns board coordinates of the occupied cells.
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_cells()
            .map(move |(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    fn matrix(shape: &Shape) -> Vec<Vec<bool>> {
        shape.rows().map(<[bool]>::to_vec).collect()
    }

    #[test]
    fn test_spawn_shapes_have_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.shape().occupied_cells().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let mut rotated = shape;
            for _ in 0..4 {
                rotated = rotated.rotated_clockwise();
            }
            assert_eq!(rotated, shape, "{kind:?}");
            assert_eq!(matrix(&rotated), matrix(&shape), "{kind:?}");
        }
    }

    #[test]
    fn test_o_piece_is_rotation_fixed_point() {
        let shape = PieceKind::O.shape();
        assert_eq!(shape.rotated_clockwise(), shape);
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let i = PieceKind::I.shape();
        let vertical = i.rotated_clockwise();
        assert_eq!((vertical.width(), vertical.height()), (1, 4));
        assert!((0..4).all(|y| vertical.is_occupied(0, y)));
    }

    #[test]
    fn test_rotate_t_clockwise() {
        // .#.      #.
        // ###  ->  ##
        //          #.
        let rotated = PieceKind::T.shape().rotated_clockwise();
        assert_eq!(
            matrix(&rotated),
            vec![
                vec![true, false],
                vec![true, true],
                vec![true, false],
            ]
        );
    }

    #[test]
    fn test_spawn_is_centered() {
        let expected = [
            (PieceKind::I, 3),
            (PieceKind::O, 4),
            (PieceKind::T, 4),
            (PieceKind::S, 4),
            (PieceKind::Z, 4),
            (PieceKind::L, 4),
            (PieceKind::J, 4),
        ];
        for (kind, x) in expected {
            let piece = Piece::new(kind, Color::Red).shifted(7, 9).spawned(10);
            assert_eq!((piece.x(), piece.y()), (x, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_occupied_positions_follow_origin() {
        let piece = Piece::new(PieceKind::O, Color::Yellow).shifted(2, -1);
        let mut cells: Vec<_> = piece.occupied_positions().collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![(2, -1), (2, 0), (3, -1), (3, 0)]);
    }

    #[test]
    fn test_shape_serialization() {
        let value = serde_json::to_value(PieceKind::T.shape()).unwrap();
        assert_eq!(value, json!([".#.", "###"]));
    }

    #[test]
    fn test_canonical_colors_are_distinct() {
        let colors: HashSet<_> = PieceKind::ALL
            .iter()
            .map(|kind| kind.canonical_color())
            .collect();
        assert_eq!(colors.len(), Color::PALETTE.len());
    }
}
