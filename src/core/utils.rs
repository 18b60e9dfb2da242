use std::fmt::{self, Display};
use std::str::FromStr;

/// A cell of the 8x8 board.
///
/// Rank `0` is Black's back rank (the top row of a rendered board) and rank `7`
/// is White's, so White pawns advance toward decreasing ranks. The field order
/// makes the derived ordering row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    pub const fn new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square { rank, file })
        } else {
            None
        }
    }

    pub(crate) const fn origin() -> Square {
        Square { rank: 0, file: 0 }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    pub fn offset(self, (file_step, rank_step): Direction) -> Option<Square> {
        let file = self.file as i8 + file_step;
        let rank = self.rank as i8 + rank_step;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// Every square of the board, rank by rank.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(|idx| Square {
            rank: idx / 8,
            file: idx % 8,
        })
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, 8 - self.rank)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("`{0}` is not a square name")]
pub struct ParseSquareError(String);

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let err = || ParseSquareError(name.to_string());
        let mut chars = name.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) => (file, rank),
            _ => return Err(err()),
        };
        let file = file as u8 - b'a';
        let rank = 8 - (rank as u8 - b'0');
        Square::new(file, rank).ok_or_else(err)
    }
}

/// Unit step as `(file, rank)` deltas.
pub type Direction = (i8, i8);

/** Tables directions for pieces */
pub const BISHOP_DIR: &[Direction] = &[(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ROOK_DIR: &[Direction] = &[(0, 1), (-1, 0), (0, -1), (1, 0)];
pub const QUEEN_DIR: &[Direction] = &[
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 0),
];

/** Possible moves for pieces */
pub const KING_MOVES: &[Direction] = QUEEN_DIR;
pub const KNIGHT_MOVES: &[Direction] = &[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Signed `(file, rank)` difference from `from` to `to`.
#[inline]
pub fn delta(from: Square, to: Square) -> Direction {
    (
        to.file as i8 - from.file as i8,
        to.rank as i8 - from.rank as i8,
    )
}

/// Chebyshev distance, the number of king steps between two squares.
pub fn distance(from: Square, to: Square) -> u8 {
    from.file.abs_diff(to.file).max(from.rank.abs_diff(to.rank))
}

pub fn is_in_straight_line(a: Square, b: Square) -> bool {
    a != b && (a.file == b.file || a.rank == b.rank)
}

pub fn is_in_diagonal_line(a: Square, b: Square) -> bool {
    a != b && a.file.abs_diff(b.file) == a.rank.abs_diff(b.rank)
}

#[derive(Debug)]
pub struct BetweenIterator {
    current: Square,
    target: Square,
    step: Direction,
}

impl Iterator for BetweenIterator {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let next = self.current.offset(self.step)?;
        if next == self.target {
            None
        } else {
            self.current = next;
            Some(next)
        }
    }
}

/// Squares strictly between `from` and `to`, walking from `from`.
///
/// Both squares must share a file, a rank or a diagonal; for any other pair the
/// iterator is empty.
pub fn between(from: Square, to: Square) -> BetweenIterator {
    let (file_diff, rank_diff) = delta(from, to);
    let step = if is_in_straight_line(from, to) || is_in_diagonal_line(from, to) {
        (file_diff.signum(), rank_diff.signum())
    } else {
        (0, 0)
    };
    BetweenIterator {
        current: from,
        // a zero step never leaves `from`, so stop right away
        target: if step == (0, 0) { from } else { to },
        step,
    }
}

pub struct DirectionIterator {
    position: Square,
    direction: Direction,
}

impl Iterator for DirectionIterator {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.position = self.position.offset(self.direction)?;
        Some(self.position)
    }
}

/// Ray from `position` (exclusive) to the board edge.
pub fn in_direction(position: Square, direction: Direction) -> DirectionIterator {
    DirectionIterator {
        position,
        direction,
    }
}
