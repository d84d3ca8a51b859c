//! Static registry of municipal service categories.

use serde::Serialize;

/// Symbolic icon the shell maps to a rendering primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Icon {
    Trash,
    Droplets,
    Zap,
    Ruler,
    Lightbulb,
    FileText,
    BadgeCheck,
    LayoutDashboard,
}

/// Symbolic style token for the category tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Swatch {
    Orange,
    Blue,
    Yellow,
    Gray,
    Amber,
    Emerald,
    Purple,
    Teal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: Icon,
    pub color: Swatch,
}

#[rustfmt::skip]
pub const CATEGORIES: &[Category] = &[
    Category { id: "garbage", name: "Garbage", icon: Icon::Trash, color: Swatch::Orange },
    Category { id: "water", name: "Water Supply", icon: Icon::Droplets, color: Swatch::Blue },
    Category { id: "electricity", name: "Electricity", icon: Icon::Zap, color: Swatch::Yellow },
    Category { id: "roads", name: "Roads", icon: Icon::Ruler, color: Swatch::Gray },
    Category { id: "streetlights", name: "Street Lights", icon: Icon::Lightbulb, color: Swatch::Amber },
    Category { id: "tax", name: "Property Tax", icon: Icon::FileText, color: Swatch::Emerald },
    Category { id: "certificates", name: "Certificates", icon: Icon::BadgeCheck, color: Swatch::Purple },
    Category { id: "others", name: "Other Services", icon: Icon::LayoutDashboard, color: Swatch::Teal },
];

/// Category offered by the home screen's empty state.
pub const FALLBACK_CATEGORY_ID: &str = "others";

pub const SLOGANS: &[&str] = &[
    "Any citizen can raise a complaint in 2 minutes.",
    "Digital Council - Smart Citizen",
    "One click - A thousand solutions",
    "Your voice, our priority",
];

#[must_use]
pub fn by_id(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

#[must_use]
pub fn by_name(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// Icon for a complaint type; free-text types fall back to the garbage icon.
#[must_use]
pub fn icon_for_type(type_name: &str) -> Icon {
    by_name(type_name).map_or(Icon::Trash, |c| c.icon)
}
