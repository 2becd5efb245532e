use crate::layout::DEFAULT_MAX_STATES;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How accepting states are marked. The arrow variant needs free space at
/// the end of each row, so it additionally switches on the row-end
/// placement constraint in the layout search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcceptingStyle {
    ByDoubleBorder,
    ByArrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowTip {
    Stealth,
    Latex,
    To,
}

impl ArrowTip {
    pub fn token(self) -> &'static str {
        match self {
            Self::Stealth => "stealth",
            Self::Latex => "latex",
            Self::To => "to",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolFormat {
    Verbatim,
    Monospace,
    Math,
}

/// Presentation knobs. Everything here is passed through into the emitted
/// markup; only `accepting` feeds back into layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Centimeters between neighboring nodes.
    pub node_distance: f32,
    /// Degrees of curvature for bent edges.
    pub bend_angle: u32,
    /// Millimeters a self-loop extends away from its node.
    pub loop_min_distance: f32,
    pub accepting: AcceptingStyle,
    pub arrow_tip: ArrowTip,
    pub symbols: SymbolFormat,
    /// TikZ line-width token (`thin`, `semithick`, `thick`, ...).
    pub line_width: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            node_distance: 2.5,
            bend_angle: 30,
            loop_min_distance: 8.0,
            accepting: AcceptingStyle::ByDoubleBorder,
            arrow_tip: ArrowTip::Stealth,
            symbols: SymbolFormat::Verbatim,
            line_width: "semithick".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// State count above which the exact search refuses to run.
    pub max_states: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_states: DEFAULT_MAX_STATES,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub style: StyleConfig,
    pub layout: LayoutConfig,
    pub theme: Theme,
}

/// Config file: a flat JSON5 object of optional overrides on top of the
/// defaults, plus a theme preset name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    theme: Option<String>,
    node_distance: Option<f32>,
    bend_angle: Option<u32>,
    loop_min_distance: Option<f32>,
    accepting: Option<AcceptingStyle>,
    arrow_tip: Option<ArrowTip>,
    symbols: Option<SymbolFormat>,
    line_width: Option<String>,
    max_states: Option<usize>,
    state_fill: Option<String>,
    state_draw: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    // Plain `.json` files are held to strict JSON; anything else gets the
    // JSON5 reader (comments, trailing commas, unquoted keys).
    let parsed: ConfigFile = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents)?
    } else {
        json5::from_str(&contents)?
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "plain" | "default" => config.theme = Theme::plain(),
            "blueprint" => config.theme = Theme::blueprint(),
            other => anyhow::bail!("unknown theme preset `{}`", other),
        }
    }
    if let Some(v) = parsed.node_distance {
        config.style.node_distance = v;
    }
    if let Some(v) = parsed.bend_angle {
        config.style.bend_angle = v;
    }
    if let Some(v) = parsed.loop_min_distance {
        config.style.loop_min_distance = v;
    }
    if let Some(v) = parsed.accepting {
        config.style.accepting = v;
    }
    if let Some(v) = parsed.arrow_tip {
        config.style.arrow_tip = v;
    }
    if let Some(v) = parsed.symbols {
        config.style.symbols = v;
    }
    if let Some(v) = parsed.line_width {
        config.style.line_width = v;
    }
    if let Some(v) = parsed.max_states {
        config.layout.max_states = v;
    }
    if let Some(v) = parsed.state_fill {
        config.theme.state_fill = v;
    }
    if let Some(v) = parsed.state_draw {
        config.theme.state_draw = v;
    }
    if let Some(v) = parsed.text_color {
        config.theme.text_color = v;
    }
    if let Some(v) = parsed.line_color {
        config.theme.line_color = v;
    }

    Ok(config)
}
