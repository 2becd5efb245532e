use crate::config::{AcceptingStyle, Config, SymbolFormat};
use crate::ir::{MachineSpec, TransitionTable};
use crate::layout::{Grid, LayoutError, search_grid};
use crate::route::{Anchor, Bend, LoopSide, RoutedEdge, RoutingDecision, route_edges};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

static STATE_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z])([0-9]*)$").unwrap());

/// Full pipeline: normalize the transition relation, search the grid,
/// route the edges, emit the picture.
pub fn generate(machine: &MachineSpec, config: &Config) -> Result<String, LayoutError> {
    let table = TransitionTable::build(&machine.transitions);
    let arrow_accepting = config.style.accepting == AcceptingStyle::ByArrow;
    let grid = search_grid(machine, &table, arrow_accepting, config.layout.max_states)?;
    let edges = route_edges(machine, &table, &grid);
    Ok(emit_tikz(machine, &grid, &edges, config))
}

/// Walk the grid row-major for node declarations, then the routing
/// decisions in order for edge declarations. The output ordering is part
/// of the contract: identical input yields byte-identical markup.
pub fn emit_tikz(machine: &MachineSpec, grid: &Grid, edges: &[RoutedEdge], config: &Config) -> String {
    let style = &config.style;
    let theme = &config.theme;
    let names = node_names(&machine.states);
    let name_of = |id: &str| match names.get(id) {
        Some(name) => name.clone(),
        None => node_name(id),
    };
    let mut out = String::new();

    out.push_str("\\usetikzlibrary{automata,positioning}\n");
    let mut options = vec![
        "->".to_string(),
        format!(">={}", style.arrow_tip.token()),
        "shorten >=1pt".to_string(),
        "auto".to_string(),
        format!("node distance={}cm", style.node_distance),
        style.line_width.clone(),
        format!("bend angle={}", style.bend_angle),
        format!("every loop/.style={{min distance={}mm}}", style.loop_min_distance),
        format!(
            "every state/.style={{fill={},draw={},text={}}}",
            theme.state_fill, theme.state_draw, theme.text_color
        ),
        format!("every edge/.append style={{draw={}}}", theme.line_color),
    ];
    if style.accepting == AcceptingStyle::ByArrow {
        options.push("accepting by arrow".to_string());
    }
    out.push_str(&format!("\\begin{{tikzpicture}}[{}]\n", options.join(",")));

    // Nodes: the first cell is absolute, each later row head hangs below
    // the previous row head, everything else chains rightward.
    let mut prev_row_head: Option<String> = None;
    for cells in grid {
        let mut row_head: Option<String> = None;
        let mut prev: Option<String> = None;
        for cell in cells {
            let Some(state) = cell else {
                continue;
            };
            let name = name_of(state);
            let mut node_options = vec!["state".to_string()];
            if *state == machine.initial {
                node_options.push("initial".to_string());
            }
            if machine.is_accepting(state) {
                node_options.push("accepting".to_string());
            }
            let placement = match (&prev, &prev_row_head) {
                (Some(left), _) => format!(" [right of={}]", left),
                (None, Some(head)) => format!(" [below of={}]", head),
                (None, None) => String::new(),
            };
            out.push_str(&format!(
                "  \\node[{}] ({}){} {{{}}};\n",
                node_options.join(","),
                name,
                placement,
                format_state_label(state)
            ));
            if row_head.is_none() {
                row_head = Some(name.clone());
            }
            prev = Some(name);
        }
        if row_head.is_some() {
            prev_row_head = row_head;
        }
    }

    if !edges.is_empty() {
        out.push_str("  \\path");
        for (idx, edge) in edges.iter().enumerate() {
            if idx > 0 {
                out.push_str("\n       ");
            }
            let from = name_of(&edge.from);
            let to = name_of(&edge.to);
            let label: Vec<String> = edge
                .symbols
                .iter()
                .map(|s| format_symbol(s, style.symbols))
                .collect();
            let label = label.join(",");
            let text = match edge.decision {
                RoutingDecision::SelfLoop { side } => format!(
                    " ({}) edge [loop {}] node {{{}}} ({})",
                    from,
                    side_token(side),
                    label,
                    to
                ),
                RoutingDecision::Straight { anchor } => format!(
                    " ({}) edge node [{}] {{{}}} ({})",
                    from,
                    anchor_token(anchor),
                    label,
                    to
                ),
                RoutingDecision::Bent { bend, anchor } => format!(
                    " ({}) edge [bend {}] node [{}] {{{}}} ({})",
                    from,
                    bend_token(bend),
                    anchor_token(anchor),
                    label,
                    to
                ),
            };
            out.push_str(&text);
        }
        out.push_str(";\n");
    }

    out.push_str("\\end{tikzpicture}\n");
    out
}

fn side_token(side: LoopSide) -> &'static str {
    match side {
        LoopSide::Above => "above",
        LoopSide::Below => "below",
        LoopSide::Left => "left",
        LoopSide::Right => "right",
    }
}

fn anchor_token(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Above => "above",
        Anchor::Below => "below",
    }
}

fn bend_token(bend: Bend) -> &'static str {
    match bend {
        Bend::Left => "left",
        Bend::Right => "right",
    }
}

/// TikZ node names share a flat namespace and a restricted alphabet.
/// Sanitization can collapse distinct identifiers (`s.1` and `s-1` both
/// sanitize to `s-1`), so names are assigned per machine in state-list
/// order, suffixing `-2`, `-3`, ... on collision. The display label keeps
/// the original identifier either way.
fn node_names(states: &[String]) -> HashMap<String, String> {
    let mut taken = HashSet::new();
    let mut names = HashMap::new();
    for state in states {
        let base = node_name(state);
        let mut name = base.clone();
        let mut suffix = 2;
        while !taken.insert(name.clone()) {
            name = format!("{base}-{suffix}");
            suffix += 1;
        }
        names.insert(state.clone(), name);
    }
    names
}

fn node_name(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// `letter` + optional digits renders as a subscripted math atom; anything
/// else is emitted verbatim, TeX-escaped.
fn format_state_label(id: &str) -> String {
    if let Some(caps) = STATE_LABEL_RE.captures(id) {
        let letter = &caps[1];
        let digits = &caps[2];
        if digits.is_empty() {
            return format!("${letter}$");
        }
        return format!("${letter}_{{{digits}}}$");
    }
    escape_tex(id)
}

fn format_symbol(symbol: &str, format: SymbolFormat) -> String {
    match format {
        SymbolFormat::Verbatim => escape_tex(symbol),
        SymbolFormat::Monospace => format!("\\texttt{{{}}}", escape_tex(symbol)),
        SymbolFormat::Math => format!("${}$", symbol),
    }
}

fn escape_tex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

/// The rendering capability this crate hands its output to. The core never
/// manages the consumer's lifecycle; it only invokes `render` once per
/// generated diagram.
pub trait Renderer {
    fn render(&mut self, diagram: &str) -> Result<()>;
}

/// Writes the diagram to a file, or stdout when no path is set.
pub struct WriteRenderer {
    output: Option<PathBuf>,
}

impl WriteRenderer {
    pub fn new(output: Option<&Path>) -> Self {
        Self {
            output: output.map(Path::to_path_buf),
        }
    }
}

impl Renderer for WriteRenderer {
    fn render(&mut self, diagram: &str) -> Result<()> {
        match &self.output {
            Some(path) => {
                std::fs::write(path, diagram)?;
            }
            None => {
                print!("{}", diagram);
            }
        }
        Ok(())
    }
}
