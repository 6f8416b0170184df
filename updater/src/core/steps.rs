//! The fixed step plan.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three maintenance programs, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    RefreshCache,
    UpdateGames,
    UpdateSearch,
}

impl Step {
    /// Every step, in the order the pipeline runs them.
    pub const ALL: [Step; 3] = [Step::RefreshCache, Step::UpdateGames, Step::UpdateSearch];

    pub fn name(self) -> &'static str {
        match self {
            Step::RefreshCache => "refresh_cache",
            Step::UpdateGames => "update_games",
            Step::UpdateSearch => "update_search",
        }
    }

    /// File name of the program, relative to the scripts directory.
    pub fn script_file(self) -> String {
        format!("{}.py", self.name())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
