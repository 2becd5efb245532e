#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod emit;
pub mod ir;
pub mod layout;
pub mod parser;
pub mod route;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{AcceptingStyle, Config, StyleConfig, SymbolFormat};
pub use emit::{Renderer, WriteRenderer, emit_tikz, generate};
pub use ir::{ConnectionDegree, MachineSpec, TransitionTable};
pub use layout::{Grid, LayoutError, grid_cost, search_grid};
pub use parser::{ParseOutput, parse_machine};
pub use route::{RoutedEdge, RoutingDecision, route_edges};
pub use theme::Theme;
