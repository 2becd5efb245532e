use crate::ir::MachineSpec;
use anyhow::{Result, bail};

/// Parse result plus the non-fatal degradations encountered on the way.
/// Malformed transition records never fail the parse; they are reported
/// here so callers can surface them.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub machine: MachineSpec,
    pub warnings: Vec<String>,
}

/// Parse the line-oriented machine description.
///
/// One directive per line (`states:`, `initial:`, `accepting:`,
/// `transitions:`), `#` starts a comment, blank lines are skipped.
/// Directives may repeat: `initial` is last-wins, the list directives
/// append.
pub fn parse_machine(input: &str) -> Result<ParseOutput> {
    let mut out = ParseOutput::default();
    let mut initial: Option<String> = None;

    for (line_no, raw_line) in input.lines().enumerate() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some((keyword, value)) = line.split_once(':') else {
            bail!("line {}: expected `keyword: value`", line_no + 1);
        };
        let value = value.trim();
        match keyword.trim().to_ascii_lowercase().as_str() {
            "states" => parse_states(value, &mut out),
            "initial" => initial = Some(value.to_string()),
            "accepting" => parse_accepting(value, &mut out.machine),
            "transitions" => parse_transitions(value, &mut out),
            other => bail!("line {}: unknown directive `{}`", line_no + 1, other),
        }
    }

    if out.machine.states.is_empty() {
        bail!("no states declared");
    }
    let Some(initial) = initial else {
        bail!("no initial state declared");
    };
    if !out.machine.states.iter().any(|s| *s == initial) {
        bail!("initial state `{}` is not in the state list", initial);
    }
    out.machine.initial = initial;

    // Accepting states outside the declared set can never be placed; drop
    // them with a warning rather than let the layout constraints chase them.
    let declared = out.machine.states.clone();
    out.machine.accepting.retain(|id| {
        let known = declared.iter().any(|s| s == id);
        if !known {
            out.warnings
                .push(format!("accepting state `{}` is not in the state list", id));
        }
        known
    });

    check_transition_endpoints(&mut out);
    Ok(out)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Identifiers split on whitespace or commas; `/` is the row-separator
/// token from the single-row input variant and carries no meaning here
/// (the grid search recomputes the shape), so it is accepted and dropped.
fn parse_states(value: &str, out: &mut ParseOutput) {
    for token in value.split(|c: char| c.is_whitespace() || c == ',') {
        let token = token.trim();
        if token.is_empty() || token == "/" {
            continue;
        }
        if out.machine.states.iter().any(|s| s == token) {
            out.warnings
                .push(format!("duplicate state `{}` ignored", token));
            continue;
        }
        out.machine.states.push(token.to_string());
    }
}

fn parse_accepting(value: &str, machine: &mut MachineSpec) {
    for token in value.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if !machine.accepting.iter().any(|s| s == token) {
            machine.accepting.push(token.to_string());
        }
    }
}

fn parse_transitions(value: &str, out: &mut ParseOutput) {
    for record_text in value.split(';') {
        let record: Vec<String> = record_text
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if record.is_empty() {
            continue;
        }
        if record.len() < 3 {
            out.warnings.push(format!(
                "transition record `{}` has no symbols",
                record.join(",")
            ));
        }
        out.machine.transitions.push(record);
    }
}

fn check_transition_endpoints(out: &mut ParseOutput) {
    let mut flagged: Vec<String> = Vec::new();
    for record in &out.machine.transitions {
        for endpoint in [record.first(), record.last()].into_iter().flatten() {
            if !out.machine.states.iter().any(|s| s == endpoint)
                && !flagged.iter().any(|s| s == endpoint)
            {
                flagged.push(endpoint.clone());
            }
        }
    }
    for id in flagged {
        out.warnings
            .push(format!("transition references undeclared state `{}`", id));
    }
}
