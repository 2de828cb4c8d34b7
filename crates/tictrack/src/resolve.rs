use crate::{BoardState, Mark, SuggestedMove, Symbol};

/// External move-decision seam.
///
/// Given a 9-symbol board the resolver returns the next move to suggest, or
/// `None` when there is nothing to recommend: the board is full, a player
/// has already won, or the state is inconsistent (for example both players
/// holding a completed line).
pub trait MoveResolver {
    fn resolve(&self, board: &BoardState) -> Option<SuggestedMove>;
}

/// Reference resolver: win if possible, otherwise block, otherwise take the
/// center, a corner, or the first free cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicResolver;

impl HeuristicResolver {
    fn completing_cell(board: &BoardState, mark: Mark) -> Option<usize> {
        let symbol = Symbol::from(mark);
        for i in 0..9 {
            if board.0[i] != Symbol::Empty {
                continue;
            }
            let mut trial = *board;
            trial.0[i] = symbol;
            if trial.winner() == Some(mark) {
                return Some(i);
            }
        }
        None
    }
}

impl MoveResolver for HeuristicResolver {
    fn resolve(&self, board: &BoardState) -> Option<SuggestedMove> {
        if board.winner().is_some() {
            return None;
        }

        let xs = board.count(Symbol::X);
        let os = board.count(Symbol::O);
        if xs + os >= 9 {
            return None;
        }
        // X moves first; any other count relationship is a misread board.
        let mark = match xs as i32 - os as i32 {
            0 => Mark::X,
            1 => Mark::O,
            _ => return None,
        };

        let cell = Self::completing_cell(board, mark)
            .or_else(|| {
                let opponent = match mark {
                    Mark::X => Mark::O,
                    Mark::O => Mark::X,
                };
                Self::completing_cell(board, opponent)
            })
            .or_else(|| (board.0[4] == Symbol::Empty).then_some(4))
            .or_else(|| [0, 2, 6, 8].into_iter().find(|&i| board.0[i] == Symbol::Empty))
            .or_else(|| (0..9).find(|&i| board.0[i] == Symbol::Empty))?;

        Some(SuggestedMove { cell, mark })
    }
}
