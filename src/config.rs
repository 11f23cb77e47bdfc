use serde::{Deserialize, Serialize};

/// Grid used to place the states of a freshly built automaton.
///
/// States are laid out left to right, `spacing_x` apart, wrapping onto a new
/// row every `columns` states. Missing fields take their default values, so
/// `{}` is a valid configuration.
///
/// With `columns == 0` there is one long row whose states alternate between
/// two lines `spacing_y` apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub origin_x: f64,
    pub origin_y: f64,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            origin_x: 50.0,
            origin_y: 50.0,
            spacing_x: 100.0,
            spacing_y: 150.0,
            columns: 0,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
