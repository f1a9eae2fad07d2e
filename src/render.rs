use crate::grid::{Grid, Position};
use crate::observer::{CellRole, SearchObserver};

/// Observer that remembers the latest role of every cell and draws the board
/// as text.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    size: usize,
    roles: Vec<Option<CellRole>>,
}

impl TerminalRenderer {
    pub fn new(size: usize) -> Self {
        TerminalRenderer {
            size,
            roles: vec![None; size * size],
        }
    }

    pub fn role(&self, pos: Position) -> Option<CellRole> {
        if pos.row < self.size && pos.col < self.size {
            self.roles[pos.row * self.size + pos.col]
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.roles.iter_mut().for_each(|r| *r = None);
    }

    /// Text frame with a legend, column header and row numbers.
    pub fn frame(&self, grid: &Grid, start: Option<Position>, goal: Option<Position>) -> String {
        let mut out = String::new();
        out.push_str("Legend: S=Start, G=Goal, #=Wall, o=Frontier, x=Closed, *=Path, .=Empty\n");

        out.push_str("   ");
        for col in 0..grid.size() {
            out.push_str(&format!("{:2}", col % 10));
        }
        out.push('\n');

        for row in 0..grid.size() {
            out.push_str(&format!("{:2} ", row));
            for col in 0..grid.size() {
                let pos = Position::new(row, col);
                let ch = if Some(pos) == start {
                    'S'
                } else if Some(pos) == goal {
                    'G'
                } else if !grid.is_passable(pos) {
                    '#'
                } else {
                    match self.role(pos) {
                        Some(CellRole::Path) => '*',
                        Some(CellRole::Closed) => 'x',
                        Some(CellRole::Frontier) => 'o',
                        None => '.',
                    }
                };
                out.push(ch);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }

    /// Clear the terminal screen (only used when visualization is enabled)
    pub fn clear_screen() {
        print!("\x1B[2J\x1B[1;1H");
    }
}

impl SearchObserver for TerminalRenderer {
    fn on_cell(&mut self, pos: Position, role: CellRole) {
        if pos.row < self.size && pos.col < self.size {
            self.roles[pos.row * self.size + pos.col] = Some(role);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::a_star::search_with;
    use crate::algorithms::cost::Heuristic;

    #[test]
    fn frame_shows_search_progress() {
        let mut grid = Grid::new(3).unwrap();
        grid.set_blocked(Position::new(1, 1), true).unwrap();
        let mut renderer = TerminalRenderer::new(3);
        let start = Position::new(0, 0);
        let goal = Position::new(2, 2);
        search_with(&grid, start, goal, Heuristic::Manhattan, &mut renderer, || false).unwrap();

        let frame = renderer.frame(&grid, Some(start), Some(goal));
        let rows: Vec<&str> = frame.lines().skip(2).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with(" 0 S "));
        assert_eq!(&rows[1][5..6], "#");
        assert!(rows[2].ends_with("G "));
        assert!(rows.iter().any(|r| r.contains('*')));
    }

    #[test]
    fn unknown_cells_have_no_role() {
        let mut renderer = TerminalRenderer::new(2);
        renderer.on_cell(Position::new(1, 0), CellRole::Frontier);
        renderer.on_cell(Position::new(9, 9), CellRole::Closed);
        assert_eq!(renderer.role(Position::new(1, 0)), Some(CellRole::Frontier));
        assert_eq!(renderer.role(Position::new(9, 9)), None);
        renderer.clear();
        assert_eq!(renderer.role(Position::new(1, 0)), None);
    }
}
