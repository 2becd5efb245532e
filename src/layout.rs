use crate::ir::{MachineSpec, TransitionTable};
use std::collections::HashMap;
use thiserror::Error;

/// Rectangular layout canvas: one state per occupied cell.
pub type Grid = Vec<Vec<Option<String>>>;

/// Search failures are surfaced as typed errors instead of the silently
/// empty diagram the layout constraints would otherwise degrade into.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no grid placement satisfies the layout constraints")]
    NoLayout,
    #[error("{count} states exceed the layout search limit of {limit}")]
    TooManyStates { count: usize, limit: usize },
}

/// The search enumerates every permutation per candidate shape, so the
/// default cutoff stays in exact-search territory.
pub const DEFAULT_MAX_STATES: usize = 8;

/// Exhaustive grid placement search.
///
/// Candidate shapes are rectangles holding the state count exactly or with
/// one spare trailing cell, visited in increasing `(rows, cols)` order.
/// Within a shape, permutations are generated recursively by picking each
/// remaining state in input order (lexicographic with respect to the state
/// list), which fixes how cost ties resolve: the first minimum wins.
///
/// Hard constraints: the initial state sits in column 0 of its row; with
/// `accepting_at_row_end` (the accepting-by-arrow convention) each row must
/// end in an empty or accepting cell and no accepting state other than the
/// initial one may occupy a non-rightmost cell.
pub fn search_grid(
    machine: &MachineSpec,
    table: &TransitionTable,
    accepting_at_row_end: bool,
    max_states: usize,
) -> Result<Grid, LayoutError> {
    let states = &machine.states;
    let n = states.len();
    if n == 0 {
        return Err(LayoutError::NoLayout);
    }
    if n > max_states {
        return Err(LayoutError::TooManyStates {
            count: n,
            limit: max_states,
        });
    }

    let index_of: HashMap<&str, usize> = states
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    // The initial state is guaranteed present by the parser; embedding
    // callers that skip it get the explicit no-layout result.
    let Some(&initial) = index_of.get(machine.initial.as_str()) else {
        return Err(LayoutError::NoLayout);
    };
    let accepting: Vec<bool> = states.iter().map(|s| machine.is_accepting(s)).collect();

    // One entry per (source, symbol, destination) triple; a two-symbol edge
    // is paid for twice. Triples touching unplaced identifiers cost nothing.
    let cost_edges: Vec<(usize, usize)> = table
        .triples()
        .filter_map(|(src, _, dst)| {
            let a = *index_of.get(src)?;
            let b = *index_of.get(dst)?;
            (a != b).then_some((a, b))
        })
        .collect();

    let mut search = Search {
        n,
        initial,
        accepting,
        cost_edges,
        accepting_at_row_end,
        position: vec![(0, 0); n],
        best: None,
    };

    for rows in 1..=n + 1 {
        for cols in 1..=n + 1 {
            if rows * cols == n || rows * cols == n + 1 {
                let mut perm = Vec::with_capacity(n);
                let mut used = vec![false; n];
                search.permute(rows, cols, &mut perm, &mut used);
            }
        }
    }

    let Some((_, rows, cols, perm)) = search.best else {
        return Err(LayoutError::NoLayout);
    };

    let mut grid: Grid = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| perm.get(row * cols + col).map(|&s| states[s].clone()))
                .collect()
        })
        .collect();
    // A (n+1, 1) shape leaves its whole last row empty.
    while grid.last().is_some_and(|row| row.iter().all(Option::is_none)) {
        grid.pop();
    }
    Ok(grid)
}

/// Total Manhattan length of the transitions drawn on `grid`.
pub fn grid_cost(grid: &Grid, table: &TransitionTable) -> u32 {
    let mut position: HashMap<&str, (i32, i32)> = HashMap::new();
    for (row, cells) in grid.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(state) = cell {
                position.insert(state.as_str(), (row as i32, col as i32));
            }
        }
    }
    table
        .triples()
        .filter_map(|(src, _, dst)| {
            let &(r1, c1) = position.get(src)?;
            let &(r2, c2) = position.get(dst)?;
            Some((r1 - r2).unsigned_abs() + (c1 - c2).unsigned_abs())
        })
        .sum()
}

struct Search {
    n: usize,
    initial: usize,
    accepting: Vec<bool>,
    cost_edges: Vec<(usize, usize)>,
    accepting_at_row_end: bool,
    /// Scratch: cell coordinates per state index, rebuilt per candidate.
    position: Vec<(i32, i32)>,
    best: Option<(u32, usize, usize, Vec<usize>)>,
}

impl Search {
    fn permute(&mut self, rows: usize, cols: usize, perm: &mut Vec<usize>, used: &mut [bool]) {
        if perm.len() == self.n {
            self.consider(rows, cols, perm);
            return;
        }
        for i in 0..self.n {
            if used[i] {
                continue;
            }
            used[i] = true;
            perm.push(i);
            self.permute(rows, cols, perm, used);
            perm.pop();
            used[i] = false;
        }
    }

    fn consider(&mut self, rows: usize, cols: usize, perm: &[usize]) {
        if !self.satisfies_constraints(rows, cols, perm) {
            return;
        }
        for (cell, &state) in perm.iter().enumerate() {
            self.position[state] = ((cell / cols) as i32, (cell % cols) as i32);
        }
        let cost: u32 = self
            .cost_edges
            .iter()
            .map(|&(a, b)| {
                let (r1, c1) = self.position[a];
                let (r2, c2) = self.position[b];
                (r1 - r2).unsigned_abs() + (c1 - c2).unsigned_abs()
            })
            .sum();
        if self.best.as_ref().is_none_or(|(best, ..)| cost < *best) {
            self.best = Some((cost, rows, cols, perm.to_vec()));
        }
    }

    fn satisfies_constraints(&self, rows: usize, cols: usize, perm: &[usize]) -> bool {
        let initial_cell = perm.iter().position(|&s| s == self.initial).unwrap_or(0);
        if initial_cell % cols != 0 {
            return false;
        }
        if !self.accepting_at_row_end {
            return true;
        }
        for row in 0..rows {
            let start = row * cols;
            let occupied = self.n.saturating_sub(start).min(cols);
            if occupied == 0 {
                continue;
            }
            // Full rows must end in an accepting state; short rows end in
            // the one spare empty cell, which always passes.
            if occupied == cols && !self.accepting[perm[start + cols - 1]] {
                return false;
            }
            for col in 0..occupied.saturating_sub(1) {
                let state = perm[start + col];
                if self.accepting[state] && state != self.initial {
                    return false;
                }
            }
        }
        true
    }
}
