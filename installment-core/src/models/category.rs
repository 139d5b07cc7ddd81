use std::fmt;

use serde::{Deserialize, Serialize};

/// Purchase categories offered by the calculator.
///
/// Simulations store the category as free text so that older saved data
/// keeps loading; this enum is the validated entry path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Groceries,
    Home,
    Beauty,
    Entertainment,
    Fitness,
    Health,
    Education,
    Travel,
    Automotive,
    Services,
    Pets,
    Subscriptions,
    Investments,
    Other,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Self::Electronics,
            Self::Clothing,
            Self::Groceries,
            Self::Home,
            Self::Beauty,
            Self::Entertainment,
            Self::Fitness,
            Self::Health,
            Self::Education,
            Self::Travel,
            Self::Automotive,
            Self::Services,
            Self::Pets,
            Self::Subscriptions,
            Self::Investments,
            Self::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Groceries => "groceries",
            Self::Home => "home",
            Self::Beauty => "beauty",
            Self::Entertainment => "entertainment",
            Self::Fitness => "fitness",
            Self::Health => "health",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::Automotive => "automotive",
            Self::Services => "services",
            Self::Pets => "pets",
            Self::Subscriptions => "subscriptions",
            Self::Investments => "investments",
            Self::Other => "other",
        }
    }

    /// Human-readable label shown in pick-lists.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::Groceries => "Groceries",
            Self::Home => "Home",
            Self::Beauty => "Beauty & Personal Care",
            Self::Entertainment => "Entertainment",
            Self::Fitness => "Fitness & Sports",
            Self::Health => "Health & Wellness",
            Self::Education => "Education & Books",
            Self::Travel => "Travel & Tourism",
            Self::Automotive => "Automotive",
            Self::Services => "Services",
            Self::Pets => "Pet Supplies",
            Self::Subscriptions => "Subscriptions",
            Self::Investments => "Investments",
            Self::Other => "Other",
        }
    }

    /// Parses a stored category value. Matching is case-insensitive and
    /// ignores surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Category {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
