use crate::ir::{ConnectionDegree, MachineSpec, TransitionTable};
use crate::layout::Grid;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSide {
    Above,
    Below,
    Left,
    Right,
}

/// Bend keyword for a curved edge. Mutual pairs deliberately share the
/// keyword: two `bend left` arcs drawn in opposite directions land on
/// opposite sides of the connecting line, which is what keeps them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bend {
    Left,
    Right,
}

/// Side of the edge the symbol label is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    SelfLoop { side: LoopSide },
    Straight { anchor: Anchor },
    Bent { bend: Bend, anchor: Anchor },
}

/// One drawable edge: the ordered endpoint pair, its sorted symbol labels
/// and the routing decision.
#[derive(Debug, Clone)]
pub struct RoutedEdge {
    pub from: String,
    pub to: String,
    pub symbols: Vec<String>,
    pub decision: RoutingDecision,
}

/// Route every transition on the chosen grid.
///
/// Pairs are visited in (from, to) nested order over the original state
/// list; the emitter reproduces this order verbatim, so it is part of the
/// output contract. Unconnected pairs produce nothing.
pub fn route_edges(machine: &MachineSpec, table: &TransitionTable, grid: &Grid) -> Vec<RoutedEdge> {
    let position = cell_positions(grid);
    let rows = grid.len();
    let cols = grid.first().map_or(0, Vec::len);
    let mut edges = Vec::new();
    let mut decided_bends: HashMap<(usize, usize), Bend> = HashMap::new();

    for (ai, a) in machine.states.iter().enumerate() {
        for (bi, b) in machine.states.iter().enumerate() {
            if ai == bi {
                if table.has_self_loop(a) {
                    let side = position
                        .get(a.as_str())
                        .map_or(LoopSide::Below, |&cell| free_side(grid, cell));
                    edges.push(RoutedEdge {
                        from: a.clone(),
                        to: a.clone(),
                        symbols: owned(table.symbols_between(a, a)),
                        decision: RoutingDecision::SelfLoop { side },
                    });
                }
                continue;
            }

            let symbols = table.symbols_between(a, b);
            if symbols.is_empty() {
                continue;
            }
            let (Some(&pa), Some(&pb)) = (position.get(a.as_str()), position.get(b.as_str()))
            else {
                continue;
            };

            let decision = if let Some(&bend) = decided_bends.get(&(bi, ai)) {
                // Reverse of an already-drawn mutual edge: same bend
                // keyword, opposite label side.
                RoutingDecision::Bent {
                    bend,
                    anchor: Anchor::Below,
                }
            } else if table.connection_degree(a, b) == ConnectionDegree::OneWay
                && segment_clear(&position, a, b, pa, pb)
            {
                RoutingDecision::Straight {
                    anchor: Anchor::Above,
                }
            } else {
                let bend = bend_direction(pa, pb, rows, cols);
                decided_bends.insert((ai, bi), bend);
                RoutingDecision::Bent {
                    bend,
                    anchor: Anchor::Above,
                }
            };

            edges.push(RoutedEdge {
                from: a.clone(),
                to: b.clone(),
                symbols: owned(symbols),
                decision,
            });
        }
    }
    edges
}

fn owned(symbols: Vec<&str>) -> Vec<String> {
    symbols.into_iter().map(str::to_string).collect()
}

fn cell_positions(grid: &Grid) -> HashMap<&str, (i32, i32)> {
    let mut position = HashMap::new();
    for (row, cells) in grid.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(state) = cell {
                position.insert(state.as_str(), (row as i32, col as i32));
            }
        }
    }
    position
}

/// First direction whose neighboring cell exists in the grid and is empty,
/// in {above, below, left, right} priority order. A cell with no empty
/// in-grid neighbor (interior cells, and every cell of a full grid) takes
/// the "below" default.
fn free_side(grid: &Grid, (row, col): (i32, i32)) -> LoopSide {
    let candidates = [
        (LoopSide::Above, (row - 1, col)),
        (LoopSide::Below, (row + 1, col)),
        (LoopSide::Left, (row, col - 1)),
        (LoopSide::Right, (row, col + 1)),
    ];
    for (side, (r, c)) in candidates {
        let empty = r >= 0
            && c >= 0
            && grid
                .get(r as usize)
                .and_then(|cells| cells.get(c as usize))
                .is_some_and(Option::is_none);
        if empty {
            return side;
        }
    }
    LoopSide::Below
}

/// True when no other occupied cell lies strictly between the two cells on
/// their connecting line (integer collinearity plus betweenness).
fn segment_clear(
    position: &HashMap<&str, (i32, i32)>,
    a: &str,
    b: &str,
    (r1, c1): (i32, i32),
    (r2, c2): (i32, i32),
) -> bool {
    for (&state, &(r, c)) in position {
        if state == a || state == b {
            continue;
        }
        let collinear = (r2 - r1) * (c - c1) == (c2 - c1) * (r - r1);
        let between = r >= r1.min(r2) && r <= r1.max(r2) && c >= c1.min(c2) && c <= c1.max(c2);
        if collinear && between {
            return false;
        }
    }
    true
}

/// Bend keyword from the pair's grid position: top-row edges arc above the
/// row, bottom-row edges below, edges along the outer columns arc outward,
/// anything else defaults on column order.
fn bend_direction((r1, c1): (i32, i32), (r2, c2): (i32, i32), rows: usize, cols: usize) -> Bend {
    let bottom = rows as i32 - 1;
    let rightmost = cols as i32 - 1;
    if r1 == 0 && r2 == 0 {
        if c1 < c2 { Bend::Left } else { Bend::Right }
    } else if r1 == bottom && r2 == bottom {
        if c1 < c2 { Bend::Right } else { Bend::Left }
    } else if c1 == 0 && c2 == 0 {
        if r1 < r2 { Bend::Right } else { Bend::Left }
    } else if c1 == rightmost && c2 == rightmost {
        if r1 < r2 { Bend::Left } else { Bend::Right }
    } else if c1 <= c2 {
        Bend::Left
    } else {
        Bend::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(states: &[&str], initial: &str, transitions: &str) -> MachineSpec {
        MachineSpec {
            states: states.iter().map(|s| s.to_string()).collect(),
            initial: initial.to_string(),
            accepting: Vec::new(),
            transitions: transitions
                .split(';')
                .filter(|r| !r.trim().is_empty())
                .map(|r| r.split(',').map(|f| f.trim().to_string()).collect())
                .collect(),
        }
    }

    fn grid(rows: &[&[Option<&str>]]) -> Grid {
        rows.iter()
            .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
            .collect()
    }

    fn find<'a>(edges: &'a [RoutedEdge], from: &str, to: &str) -> &'a RoutedEdge {
        edges
            .iter()
            .find(|e| e.from == from && e.to == to)
            .unwrap_or_else(|| panic!("missing edge {from} -> {to}"))
    }

    #[test]
    fn lone_state_loops_below() {
        let m = machine(&["q1"], "q1", "q1,0,1,q1");
        let table = TransitionTable::build(&m.transitions);
        let g = grid(&[&[Some("q1")]]);
        let edges = route_edges(&m, &table, &g);
        assert_eq!(edges.len(), 1);
        assert_eq!(
            edges[0].decision,
            RoutingDecision::SelfLoop {
                side: LoopSide::Below
            }
        );
        assert_eq!(edges[0].symbols, vec!["0", "1"]);
    }

    #[test]
    fn loop_side_takes_the_empty_neighbor() {
        let m = machine(&["q0", "q1", "q2"], "q0", "q2,a,q2");
        let table = TransitionTable::build(&m.transitions);
        // q2 sits at (1,0); the cell above it is occupied, the one to its
        // right is empty.
        let g = grid(&[
            &[Some("q0"), Some("q1")],
            &[Some("q2"), None],
        ]);
        let edges = route_edges(&m, &table, &g);
        assert_eq!(
            find(&edges, "q2", "q2").decision,
            RoutingDecision::SelfLoop {
                side: LoopSide::Right
            }
        );
    }

    #[test]
    fn one_way_adjacent_pair_goes_straight() {
        let m = machine(&["q1", "q2"], "q1", "q1,0,q1; q1,1,q2");
        let table = TransitionTable::build(&m.transitions);
        let g = grid(&[&[Some("q1"), Some("q2")]]);
        let edges = route_edges(&m, &table, &g);
        let edge = find(&edges, "q1", "q2");
        assert_eq!(
            edge.decision,
            RoutingDecision::Straight {
                anchor: Anchor::Above
            }
        );
        assert_eq!(edge.symbols, vec!["1"]);
    }

    #[test]
    fn blocked_segment_bends() {
        let m = machine(&["q0", "q1", "q2"], "q0", "q0,a,q2");
        let table = TransitionTable::build(&m.transitions);
        let g = grid(&[&[Some("q0"), Some("q1"), Some("q2")]]);
        let edges = route_edges(&m, &table, &g);
        assert_eq!(
            find(&edges, "q0", "q2").decision,
            RoutingDecision::Bent {
                bend: Bend::Left,
                anchor: Anchor::Above
            }
        );
    }

    #[test]
    fn diagonal_with_clear_line_goes_straight() {
        let m = machine(&["q0", "q1", "q2", "q3"], "q0", "q0,a,q3");
        let table = TransitionTable::build(&m.transitions);
        let g = grid(&[
            &[Some("q0"), Some("q1")],
            &[Some("q2"), Some("q3")],
        ]);
        let edges = route_edges(&m, &table, &g);
        assert_eq!(
            find(&edges, "q0", "q3").decision,
            RoutingDecision::Straight {
                anchor: Anchor::Above
            }
        );
    }

    #[test]
    fn mutual_pair_shares_bend_and_splits_anchors() {
        let m = machine(&["q1", "q2"], "q1", "q1,0,q2; q2,0,q1");
        let table = TransitionTable::build(&m.transitions);
        let g = grid(&[&[Some("q1"), Some("q2")]]);
        let edges = route_edges(&m, &table, &g);
        let forward = find(&edges, "q1", "q2");
        let backward = find(&edges, "q2", "q1");
        let RoutingDecision::Bent { bend: fb, anchor: fa } = forward.decision else {
            panic!("forward not bent: {:?}", forward.decision);
        };
        let RoutingDecision::Bent { bend: bb, anchor: ba } = backward.decision else {
            panic!("backward not bent: {:?}", backward.decision);
        };
        // Same keyword drawn from opposite endpoints puts the two arcs on
        // opposite sides; the labels split above/below with them.
        assert_eq!(fb, bb);
        assert_eq!(fa, Anchor::Above);
        assert_eq!(ba, Anchor::Below);
    }

    #[test]
    fn unconnected_pairs_produce_nothing() {
        let m = machine(&["q0", "q1", "q2"], "q0", "q0,a,q1");
        let table = TransitionTable::build(&m.transitions);
        let g = grid(&[&[Some("q0"), Some("q1"), Some("q2")]]);
        let edges = route_edges(&m, &table, &g);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, "q0");
        assert_eq!(edges[0].to, "q1");
    }

    #[test]
    fn self_loops_never_route_as_line_edges() {
        let m = machine(&["q0", "q1"], "q0", "q0,a,q0; q0,b,q1");
        let table = TransitionTable::build(&m.transitions);
        let g = grid(&[&[Some("q0"), Some("q1")]]);
        let edges = route_edges(&m, &table, &g);
        for edge in &edges {
            if edge.from == edge.to {
                assert!(matches!(edge.decision, RoutingDecision::SelfLoop { .. }));
            } else {
                assert!(!matches!(edge.decision, RoutingDecision::SelfLoop { .. }));
            }
        }
    }

    #[test]
    fn bend_directions_follow_grid_position() {
        let rows = 3;
        let cols = 3;
        // Top row, heading right: arc above.
        assert_eq!(bend_direction((0, 0), (0, 2), rows, cols), Bend::Left);
        assert_eq!(bend_direction((0, 2), (0, 0), rows, cols), Bend::Right);
        // Bottom row: the opposite.
        assert_eq!(bend_direction((2, 0), (2, 2), rows, cols), Bend::Right);
        assert_eq!(bend_direction((2, 2), (2, 0), rows, cols), Bend::Left);
        // Outer columns arc outward.
        assert_eq!(bend_direction((1, 0), (2, 0), rows, cols), Bend::Right);

        assert_eq!(bend_direction((1, 2), (2, 2), rows, cols), Bend::Left);
        // Interior default: column comparison.
        assert_eq!(bend_direction((1, 1), (2, 2), rows, cols), Bend::Left);
        assert_eq!(bend_direction((1, 2), (2, 1), rows, cols), Bend::Right);
    }

    #[test]
    fn edges_follow_state_list_order() {
        let m = machine(
            &["q2", "q0", "q1"],
            "q0",
            "q0,a,q1; q1,a,q2; q2,a,q0",
        );
        let table = TransitionTable::build(&m.transitions);
        let g = grid(&[&[Some("q0"), Some("q1"), Some("q2")]]);
        let edges = route_edges(&m, &table, &g);
        let order: Vec<(&str, &str)> = edges
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(order, vec![("q2", "q0"), ("q0", "q1"), ("q1", "q2")]);
    }
}
