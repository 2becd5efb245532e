use crate::config::{AcceptingStyle, SymbolFormat, load_config};
use crate::emit::{Renderer, WriteRenderer, generate};
use crate::parser::parse_machine;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "tikzfsm", version, about = "Finite-state automaton to TikZ diagram generator")]
pub struct Args {
    /// Input machine description (.fsm) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (.tex/.tikz). Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON5 overrides plus theme preset)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Accepting-state marking convention
    #[arg(long = "accepting", value_enum)]
    pub accepting: Option<AcceptingArg>,

    /// Symbol label formatting
    #[arg(long = "symbols", value_enum)]
    pub symbols: Option<SymbolsArg>,

    /// State count limit for the exact layout search
    #[arg(long = "maxStates")]
    pub max_states: Option<usize>,

    /// Node distance in centimeters
    #[arg(long = "nodeDistance")]
    pub node_distance: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum AcceptingArg {
    DoubleBorder,
    Arrow,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SymbolsArg {
    Verbatim,
    Monospace,
    Math,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(accepting) = args.accepting {
        config.style.accepting = match accepting {
            AcceptingArg::DoubleBorder => AcceptingStyle::ByDoubleBorder,
            AcceptingArg::Arrow => AcceptingStyle::ByArrow,
        };
    }
    if let Some(symbols) = args.symbols {
        config.style.symbols = match symbols {
            SymbolsArg::Verbatim => SymbolFormat::Verbatim,
            SymbolsArg::Monospace => SymbolFormat::Monospace,
            SymbolsArg::Math => SymbolFormat::Math,
        };
    }
    if let Some(max_states) = args.max_states {
        config.layout.max_states = max_states;
    }
    if let Some(node_distance) = args.node_distance {
        config.style.node_distance = node_distance;
    }

    let input = read_input(args.input.as_deref())?;
    let parsed = parse_machine(&input)?;
    for warning in &parsed.warnings {
        eprintln!("warning: {warning}");
    }

    let diagram = generate(&parsed.machine, &config)?;
    WriteRenderer::new(args.output.as_deref()).render(&diagram)?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
