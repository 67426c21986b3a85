//! # Complaint Category Catalog
//!
//! The static category catalog served to dashboard dropdowns. Categories
//! are labels only — complaints store the category name as free text with
//! no referential integrity against this catalog.

use serde::Serialize;

/// A complaint category entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Stable numeric identifier.
    pub id: u32,
    /// Display name; also the value stored on complaints as `type`.
    pub name: &'static str,
    /// Emoji glyph shown in dropdowns.
    pub icon: &'static str,
    /// Accent color name for the dashboard.
    pub color: &'static str,
}

/// The full category catalog, in display order.
pub fn catalog() -> &'static [Category] {
    const CATALOG: &[Category] = &[
        Category { id: 1, name: "Potholes", icon: "🕳️", color: "orange" },
        Category { id: 2, name: "Garbage", icon: "🗑️", color: "green" },
        Category { id: 3, name: "Street Light", icon: "💡", color: "yellow" },
        Category { id: 4, name: "Drainage", icon: "🚰", color: "blue" },
        Category { id: 5, name: "Sewage", icon: "🚿", color: "brown" },
        Category { id: 6, name: "Roads", icon: "🛣️", color: "gray" },
        Category { id: 7, name: "Traffic Light", icon: "🚦", color: "red" },
        Category { id: 8, name: "Water Supply", icon: "💧", color: "cyan" },
        Category { id: 9, name: "Graffiti", icon: "🎨", color: "purple" },
    ];
    CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_nine_categories() {
        assert_eq!(catalog().len(), 9);
    }

    #[test]
    fn ids_are_sequential_and_unique() {
        for (i, category) in catalog().iter().enumerate() {
            assert_eq!(category.id, i as u32 + 1);
        }
    }

    #[test]
    fn serializes_with_all_fields() {
        let json = serde_json::to_value(&catalog()[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Potholes");
        assert_eq!(json["color"], "orange");
    }
}
