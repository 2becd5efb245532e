use serde::{Deserialize, Serialize};

/// Color values passed through verbatim into the emitted picture options;
/// any xcolor expression works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub state_fill: String,
    pub state_draw: String,
    pub text_color: String,
    pub line_color: String,
}

impl Theme {
    pub fn plain() -> Self {
        Self {
            state_fill: "white".to_string(),
            state_draw: "black".to_string(),
            text_color: "black".to_string(),
            line_color: "black".to_string(),
        }
    }

    pub fn blueprint() -> Self {
        Self {
            state_fill: "blue!8".to_string(),
            state_draw: "blue!60!black".to_string(),
            text_color: "blue!60!black".to_string(),
            line_color: "blue!50!black".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::plain()
    }
}
