//! # System Purposes
//!
//! The assistant personas a conversation can be assigned. Each one has a
//! short symbol shown in the sidebar and a label used by the responder.

/// Purpose assigned to new conversations.
pub const DEFAULT_PURPOSE_ID: &str = "Generic";

/// Shown when a conversation references a purpose that is not in the table.
pub const UNKNOWN_SYMBOL: &str = "❓";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemPurpose {
    pub id: &'static str,
    pub label: &'static str,
    pub symbol: &'static str,
}

pub const SYSTEM_PURPOSES: &[SystemPurpose] = &[
    SystemPurpose { id: "Generic", label: "Default", symbol: "🧠" },
    SystemPurpose { id: "Developer", label: "Developer", symbol: "💻" },
    SystemPurpose { id: "Scientist", label: "Scientist", symbol: "🔬" },
    SystemPurpose { id: "Catalyst", label: "Catalyst", symbol: "🚀" },
    SystemPurpose { id: "Executive", label: "Executive", symbol: "👔" },
    SystemPurpose { id: "Custom", label: "Custom", symbol: "✨" },
];

pub fn find(id: &str) -> Option<&'static SystemPurpose> {
    SYSTEM_PURPOSES.iter().find(|p| p.id == id)
}

pub fn symbol_for(id: &str) -> &'static str {
    find(id).map(|p| p.symbol).unwrap_or(UNKNOWN_SYMBOL)
}
