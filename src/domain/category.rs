use serde::{Deserialize, Serialize};

/// Category pre-selected for new entries.
pub const DEFAULT_CATEGORY: &str = "Transport";

/// Icon shown for labels outside the known set.
pub const FALLBACK_ICON: &str = "❓";

/// Known category labels. Transactions store the label as a free-form string,
/// so anything not listed here is still accepted and rendered with
/// [`FALLBACK_ICON`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Shopping,
    Bills,
    Salary,
    Entertainment,
    Transport,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Travel,
        Category::Shopping,
        Category::Bills,
        Category::Salary,
        Category::Entertainment,
        Category::Transport,
        Category::Miscellaneous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Salary => "Salary",
            Category::Entertainment => "Entertainment",
            Category::Transport => "Transport",
            Category::Miscellaneous => "Miscellaneous",
        }
    }

    /// Case-insensitive lookup of a known label.
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(s))
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Food => "🍽️",
            Category::Travel => "🚗",
            Category::Shopping => "🛍️",
            Category::Bills => "💸",
            Category::Salary => "💼",
            Category::Entertainment => "🎮",
            Category::Transport => "🚌",
            Category::Miscellaneous => "✋",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Icon for any category label, known or not.
pub fn category_icon(label: &str) -> &'static str {
    Category::from_label(label)
        .map(|category| category.icon())
        .unwrap_or(FALLBACK_ICON)
}
