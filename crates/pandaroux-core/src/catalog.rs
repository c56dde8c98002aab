//! ============================================================================
//! Category Catalog - fixed set of clothing classes
//! ============================================================================
//! Built once at first access and never mutated afterwards.
//! ============================================================================

use once_cell::sync::Lazy;

use crate::types::{Category, CategoryId, PandaError};

static CATALOG: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        entry(CategoryId::Tops, "Hauts", "shirt", "#D97142"),
        entry(CategoryId::Bottoms, "Bas", "toy-brick", "#2C5F4F"),
        entry(CategoryId::Shoes, "Chaussures", "footprints", "#E8C77A"),
        entry(CategoryId::Headwear, "Couvre-chef", "crown", "#B85A31"),
        entry(CategoryId::Accessories, "Accessoires", "gem", "#8A6FA8"),
    ]
});

fn entry(id: CategoryId, name: &str, icon: &str, color: &str) -> Category {
    Category {
        id,
        display_name: name.to_string(),
        icon_ref: icon.to_string(),
        accent_color: color.to_string(),
    }
}

/// All categories, in picker order
pub fn all() -> &'static [Category] {
    &CATALOG
}

pub fn get(id: CategoryId) -> &'static Category {
    // Every CategoryId variant has exactly one entry
    CATALOG
        .iter()
        .find(|c| c.id == id)
        .unwrap_or(&CATALOG[0])
}

/// Look up a category by its token
pub fn find(token: &str) -> Result<&'static Category, PandaError> {
    CategoryId::from_str(token)
        .map(get)
        .ok_or_else(|| PandaError::UnknownCategory(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_id() {
        assert_eq!(all().len(), CategoryId::DISPLAY_ORDER.len());
        for id in CategoryId::DISPLAY_ORDER {
            assert_eq!(get(id).id, id);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("tops").unwrap().display_name, "Hauts");
        assert_eq!(find("SHOES").unwrap().accent_color, "#E8C77A");
        assert_eq!(
            find("socks"),
            Err(PandaError::UnknownCategory("socks".into()))
        );
    }
}
