use serde::{Deserialize, Serialize};

/// What a branch set selects before the user has clicked anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum DefaultSelection {
    /// Nothing is selected; no branch content shows.
    #[default]
    None,
    /// The first listed option is selected.
    First,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeOptions {
    pub default_selection: DefaultSelection,
}

impl TreeOptions {
    pub fn default_selection(mut self, default_selection: DefaultSelection) -> Self {
        self.default_selection = default_selection;
        self
    }
}
