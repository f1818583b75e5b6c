//! Navigation and view switching utilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Dashboard,
    Students,
    Classes,
    Teachers,
    Topics,
    Activities,
    Assignments,
    Diagnostics,
    Interventions,
    Notes,
    Reports,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Students => "Students",
            View::Classes => "Classes",
            View::Teachers => "Teachers",
            View::Topics => "Curriculum",
            View::Activities => "Activities",
            View::Assignments => "Assignments",
            View::Diagnostics => "Diagnostics",
            View::Interventions => "Interventions",
            View::Notes => "Notes",
            View::Reports => "Reports",
        }
    }

    pub fn all() -> &'static [View] {
        &[
            View::Dashboard,
            View::Students,
            View::Classes,
            View::Teachers,
            View::Topics,
            View::Activities,
            View::Assignments,
            View::Diagnostics,
            View::Interventions,
            View::Notes,
            View::Reports,
        ]
    }

    /// Views an account with the teacher role may open.
    pub fn visible_to_teacher(&self) -> bool {
        !matches!(self, View::Teachers)
    }

    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|v| v == self)
            .unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let next = (idx + 1) % all.len();
        all[next]
    }

    pub fn previous(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}
