use std::fmt;
use std::time::Duration;

use crate::algorithms::path::Path;

/// Counters collected over one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Cells popped from the frontier and expanded (the goal included).
    pub expanded: usize,
    /// Cells pushed onto the frontier, the start included.
    pub discovered: usize,
    /// Successful strictly-cheaper cost updates.
    pub relaxations: usize,
    pub path_cells: usize,
    pub path_cost: f64,
    pub elapsed: Duration,
}

impl SearchStatistics {
    pub fn record_path(&mut self, path: &Path) {
        self.path_cells = path.len();
        self.path_cost = path.cost();
    }

    /// Expanded cells per path cell; 0.0 when no path was found.
    pub fn expansion_ratio(&self) -> f64 {
        if self.path_cells > 0 {
            self.expanded as f64 / self.path_cells as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Expanded cells: {}", self.expanded)?;
        writeln!(f, "Discovered cells: {}", self.discovered)?;
        writeln!(f, "Relaxations: {}", self.relaxations)?;
        if self.path_cells > 0 {
            writeln!(f, "Path cells: {}", self.path_cells)?;
            writeln!(f, "Path cost: {:.1}", self.path_cost)?;
            writeln!(f, "Expansion ratio: {:.2}", self.expansion_ratio())?;
        } else {
            writeln!(f, "Path: none")?;
        }
        writeln!(f, "Search time: {:.2?}", self.elapsed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    #[test]
    fn ratio_is_zero_without_a_path() {
        let stats = SearchStatistics {
            expanded: 12,
            ..Default::default()
        };
        assert_eq!(stats.expansion_ratio(), 0.0);
        assert!(stats.to_string().contains("Path: none"));
    }

    #[test]
    fn report_includes_path_cost() {
        let mut stats = SearchStatistics {
            expanded: 6,
            ..Default::default()
        };
        stats.record_path(&Path::from_cells(vec![
            Position::new(0, 0),
            Position::new(1, 1),
            Position::new(2, 2),
        ]));
        assert_eq!(stats.path_cells, 3);
        assert_eq!(stats.expansion_ratio(), 2.0);
        let report = stats.to_string();
        assert!(report.contains("Path cost: 2.8"));
        assert!(report.contains("Path cells: 3"));
    }
}
