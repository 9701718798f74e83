use super::{board::Board, piece::Piece};

/// Offsets tried, in order, after a rotation: in place, left, right, up.
pub const KICK_OFFSETS: [(i32, i32); 4] = [(0, 0), (-1, 0), (1, 0), (0, -1)];

/// Returns `true` if `piece` moved by `(dx, dy)` would overlap a wall, the
/// floor, or an occupied board cell.
///
/// Cells above row 0 never collide: pieces may stick out of the top of the
/// board while spawning or after an upward kick.
#[must_use]
pub fn collides(board: &Board, piece: &Piece, dx: i32, dy: i32) -> bool {
    piece.occupied_positions().any(|(x, y)| {
        let Ok(x) = usize::try_from(x + dx) else {
            return true;
        };
        if x >= board.width() {
            return true;
        }
        let Ok(y) = usize::try_from(y + dy) else {
            return false;
        };
        if y >= board.height() {
            return true;
        }
        board.cell(x, y).is_some_and(|cell| cell.is_occupied())
    })
}

/// Rotates `piece` clockwise, applying the first kick in [`KICK_OFFSETS`]
/// that leaves it in a legal position.
///
/// Returns `None` if every kick collides.
#[must_use]
pub fn rotate_with_kicks(board: &Board, piece: &Piece) -> Option<Piece> {
    let rotated = piece.rotated();
    KICK_OFFSETS
        .iter()
        .find(|&&(dx, dy)| !collides(board, &rotated, dx, dy))
        .map(|&(dx, dy)| rotated.shifted(dx, dy))
}

/// Number of rows `piece` can fall straight down before it would collide.
///
/// Bounded by the board height, so a piece hanging far above the board still
/// terminates.
#[must_use]
pub fn drop_distance(board: &Board, piece: &Piece) -> i32 {
    let limit = i32::try_from(board.height()).unwrap_or(i32::MAX);
    let mut distance = 0;
    while distance < limit && !collides(board, piece, 0, distance + 1) {
        distance += 1;
    }
    distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Color, PieceKind};

    fn empty_board() -> Board {
        Board::new(20, 10).unwrap()
    }

    fn spawn(kind: PieceKind) -> Piece {
        Piece::new(kind, kind.canonical_color()).spawned(10)
    }

    fn board_with(cells: &[(usize, usize)]) -> Board {
        let mut rows = vec![vec![Cell::Empty; 10]; 20];
        for &(x, y) in cells {
            rows[y][x] = Cell::Occupied(Color::Red);
        }
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_spawned_pieces_do_not_collide_on_empty_board() {
        let board = empty_board();
        for kind in PieceKind::ALL {
            assert!(!collides(&board, &spawn(kind), 0, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_walls_and_floor_collide() {
        let board = empty_board();
        let piece = Piece::new(PieceKind::O, Color::Yellow);
        assert!(collides(&board, &piece, -1, 0));
        assert!(!collides(&board, &piece, 8, 0));
        assert!(collides(&board, &piece, 9, 0));
        assert!(!collides(&board, &piece, 0, 18));
        assert!(collides(&board, &piece, 0, 19));
    }

    #[test]
    fn test_above_top_does_not_collide() {
        let board = empty_board();
        let piece = spawn(PieceKind::T);
        assert!(!collides(&board, &piece, 0, -3));
    }

    #[test]
    fn test_occupied_cell_collides() {
        let board = board_with(&[(4, 1)]);
        let piece = spawn(PieceKind::O);
        assert!(collides(&board, &piece, 0, 0));
        assert!(!collides(&board, &piece, 2, 0));
    }

    #[test]
    fn test_rotation_in_open_space_does_not_kick() {
        let board = empty_board();
        let piece = spawn(PieceKind::T).shifted(0, 5);
        let rotated = rotate_with_kicks(&board, &piece).unwrap();
        assert_eq!((rotated.x(), rotated.y()), (piece.x(), piece.y()));
        assert_eq!(rotated.shape(), &piece.shape().rotated_clockwise());
    }

    #[test]
    fn test_rotation_kicks_left_at_right_wall() {
        let board = empty_board();
        // Vertical I in the rightmost column; rotating back to horizontal
        // needs four columns, so no single-step kick fits.
        let vertical = Piece::new(PieceKind::I, Color::Cyan)
            .rotated()
            .shifted(9, 5);
        assert!(rotate_with_kicks(&board, &vertical).is_none());

        // A vertical J against the right wall becomes 3 wide and kicks left.
        let j = Piece::new(PieceKind::J, Color::Blue).rotated().shifted(8, 5);
        assert!(!collides(&board, &j, 0, 0));
        let rotated = rotate_with_kicks(&board, &j).unwrap();
        assert_eq!((rotated.x(), rotated.y()), (7, 5));
    }

    #[test]
    fn test_rotation_kicks_right_at_left_wall() {
        // Vertical S against the left wall:
        // .#
        // ##
        // #.
        // The in-place rotation needs (0, 5), which is blocked, and the left
        // kick leaves the board, so the right kick wins.
        let board = board_with(&[(0, 5)]);
        let piece = Piece::new(PieceKind::S, Color::Green)
            .rotated()
            .shifted(0, 5);
        assert!(!collides(&board, &piece, 0, 0));
        let rotated = rotate_with_kicks(&board, &piece).unwrap();
        assert_eq!((rotated.x(), rotated.y()), (1, 5));
    }

    #[test]
    fn test_rotation_kicks_up_last() {
        // T pointing left (.# / ## / .#) rotating back to spawn orientation.
        // (6, 6) blocks in-place and right, (3, 6) blocks left.
        let board = board_with(&[(6, 6), (3, 6)]);
        let piece = Piece::new(PieceKind::T, Color::Purple)
            .rotated()
            .rotated()
            .rotated()
            .shifted(4, 5);
        assert!(!collides(&board, &piece, 0, 0));
        let rotated = rotate_with_kicks(&board, &piece).unwrap();
        assert_eq!((rotated.x(), rotated.y()), (4, 4));
        assert_eq!(rotated.shape(), &PieceKind::T.shape());
    }

    #[test]
    fn test_rotation_rejected_when_all_kicks_collide() {
        let board = empty_board();
        let piece = Piece::new(PieceKind::I, Color::Cyan)
            .rotated()
            .shifted(0, 10);
        // Horizontal I needs x in 0..=6; from x=0 the in-place rotation fits.
        assert!(rotate_with_kicks(&board, &piece).is_some());

        let walled = board_with(&[(1, 10), (2, 10), (3, 10), (1, 9), (2, 9), (3, 9)]);
        assert!(rotate_with_kicks(&walled, &piece).is_none());
    }

    #[test]
    fn test_drop_distance_on_empty_board() {
        let board = empty_board();
        assert_eq!(drop_distance(&board, &spawn(PieceKind::I)), 19);
        assert_eq!(drop_distance(&board, &spawn(PieceKind::O)), 18);
    }

    #[test]
    fn test_drop_distance_onto_stack() {
        let board = board_with(&[(4, 10)]);
        assert_eq!(drop_distance(&board, &spawn(PieceKind::O)), 8);
    }
}
