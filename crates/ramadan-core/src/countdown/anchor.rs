use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schedule::Prayer;

/// A fasting boundary bound to one prayer time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnchorEvent {
    /// Breaking the fast, at Maghrib.
    Iftar,
    /// End of the pre-dawn meal, at Fajr.
    SuhoorEnd,
}

impl AnchorEvent {
    pub const ALL: [AnchorEvent; 2] = [AnchorEvent::Iftar, AnchorEvent::SuhoorEnd];

    pub fn prayer(self) -> Prayer {
        match self {
            AnchorEvent::Iftar => Prayer::Maghrib,
            AnchorEvent::SuhoorEnd => Prayer::Fajr,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnchorEvent::Iftar => "Iftar",
            AnchorEvent::SuhoorEnd => "Suhoor",
        }
    }
}

impl fmt::Display for AnchorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
