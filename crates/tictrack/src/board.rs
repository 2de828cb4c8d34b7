use serde::{Deserialize, Serialize};

/// Content of a single cell as seen by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    Empty,
    X,
    O,
}

/// A mark the resolver asks to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Glyph used when rendering the mark as text.
    pub fn glyph(self) -> char {
        match self {
            Mark::X => 'x',
            Mark::O => 'o',
        }
    }
}

impl From<Mark> for Symbol {
    fn from(m: Mark) -> Self {
        match m {
            Mark::X => Symbol::X,
            Mark::O => Symbol::O,
        }
    }
}

/// Row-major 9-cell board, index 0 = top-left, 8 = bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState(pub [Symbol; 9]);

impl BoardState {
    pub fn empty() -> Self {
        Self([Symbol::Empty; 9])
    }

    pub fn count(&self, s: Symbol) -> usize {
        self.0.iter().filter(|&&c| c == s).count()
    }

    /// Winner of the board, if any line is complete.
    pub fn winner(&self) -> Option<Mark> {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8],
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8],
            [0, 4, 8],
            [2, 4, 6],
        ];
        for line in LINES {
            let a = self.0[line[0]];
            if a != Symbol::Empty && a == self.0[line[1]] && a == self.0[line[2]] {
                return match a {
                    Symbol::X => Some(Mark::X),
                    Symbol::O => Some(Mark::O),
                    Symbol::Empty => None,
                };
            }
        }
        None
    }
}

/// A (cell index, mark) pair produced by the move resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedMove {
    /// Row-major cell index, 0-8.
    pub cell: usize,
    pub mark: Mark,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_on_a_row_and_a_diagonal() {
        let mut b = BoardState::empty();
        b.0[0] = Symbol::X;
        b.0[1] = Symbol::X;
        b.0[2] = Symbol::X;
        assert_eq!(b.winner(), Some(Mark::X));

        let mut d = BoardState::empty();
        d.0[2] = Symbol::O;
        d.0[4] = Symbol::O;
        d.0[6] = Symbol::O;
        assert_eq!(d.winner(), Some(Mark::O));
    }

    #[test]
    fn empty_board_has_no_winner() {
        assert_eq!(BoardState::empty().winner(), None);
    }
}
