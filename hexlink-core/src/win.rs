//! Edge-to-edge connectivity check

use std::collections::VecDeque;

use crate::board::{Board, Colour, Pos};

/// True when `colour` has an unbroken chain between its two edges.
///
/// Breadth-first from every stone on the colour's start edge (top row for
/// First, left column for Second). Each cell enters the frontier at most
/// once, so the search visits at most size² cells. Returns false for
/// `Empty` and for boards where no chain exists yet.
pub fn has_won(board: &Board, colour: Colour) -> bool {
    let size = board.size();

    let starts: Vec<Pos> = match colour {
        Colour::First => (0..size).map(|col| Pos::new(0, col)).collect(),
        Colour::Second => (0..size).map(|row| Pos::new(row, 0)).collect(),
        Colour::Empty => return false,
    };
    let reached_goal = |pos: Pos| match colour {
        Colour::First => pos.row == size - 1,
        _ => pos.col == size - 1,
    };

    let mut visited = vec![false; size * size];
    let mut frontier = VecDeque::new();

    for pos in starts {
        if board.get(pos) == Some(colour) {
            visited[pos.row * size + pos.col] = true;
            frontier.push_back(pos);
        }
    }

    while let Some(pos) = frontier.pop_front() {
        if reached_goal(pos) {
            return true;
        }
        for next in pos.neighbours(size) {
            let idx = next.row * size + next.col;
            if !visited[idx] && board.get(next) == Some(colour) {
                visited[idx] = true;
                frontier.push_back(next);
            }
        }
    }

    false
}

/// Winner of the board, checking First before Second
pub fn detect_winner(board: &Board) -> Option<Colour> {
    [Colour::First, Colour::Second]
        .into_iter()
        .find(|&colour| has_won(board, colour))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: &str, size: usize) -> Board {
        Board::deserialize(rows, size).unwrap()
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        let board = Board::new(5).unwrap();
        assert!(!has_won(&board, Colour::First));
        assert!(!has_won(&board, Colour::Second));
        assert!(!has_won(&board, Colour::Empty));
        assert_eq!(detect_winner(&board), None);
    }

    #[test]
    fn test_first_column_chain() {
        // (0,0) (1,0) (2,0) red, two blue stones alongside
        let board = board_from("RB0,RB0,R00", 3);
        assert!(has_won(&board, Colour::First));
        assert!(!has_won(&board, Colour::Second));
        assert_eq!(detect_winner(&board), Some(Colour::First));
    }

    #[test]
    fn test_diagonal_adjacency() {
        // (0,2) -> (1,1) -> (2,0) uses the (1,-1) offset
        let board = board_from("00R,0R0,R00", 3);
        assert!(has_won(&board, Colour::First));

        // (0,0) -> (1,1) is not adjacent on a hex grid
        let board = board_from("R00,0R0,00R", 3);
        assert!(!has_won(&board, Colour::First));
    }

    #[test]
    fn test_second_row_chain() {
        let board = board_from("000,BBB,000", 3);
        assert!(has_won(&board, Colour::Second));
        assert!(!has_won(&board, Colour::First));
    }

    #[test]
    fn test_winding_chain() {
        // Red path with a sideways detour
        let board = board_from("0R000,0R000,0RRR0,000R0,RRRR0", 5);
        assert!(has_won(&board, Colour::First));
    }

    #[test]
    fn test_single_cell_board() {
        let mut board = Board::new(1).unwrap();
        assert_eq!(detect_winner(&board), None);
        board.set_cell(Pos::new(0, 0), Colour::Second).unwrap();
        assert!(has_won(&board, Colour::Second));
        assert!(!has_won(&board, Colour::First));
    }

    #[test]
    fn test_large_board_does_not_overflow_stack() {
        // Serpentine red path across a 60x60 board
        let size = 60;
        let mut board = Board::new(size).unwrap();
        for row in 0..size {
            if row % 2 == 0 {
                for col in 0..size {
                    board.set_cell(Pos::new(row, col), Colour::First).unwrap();
                }
            } else {
                let col = if row % 4 == 1 { size - 1 } else { 0 };
                board.set_cell(Pos::new(row, col), Colour::First).unwrap();
            }
        }
        assert!(has_won(&board, Colour::First));
    }
}
