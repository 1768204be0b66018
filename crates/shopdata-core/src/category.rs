//! Product categories and the keyword table used to infer a catalog category
//! from a free-text product name.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Phone,
    Laptop,
    Smartwatch,
    Tablet,
}

impl ProductCategory {
    /// Categories in keyword-matching order. The first category with a
    /// matching keyword wins.
    pub const DETECTION_ORDER: [ProductCategory; 4] = [
        ProductCategory::Phone,
        ProductCategory::Laptop,
        ProductCategory::Smartwatch,
        ProductCategory::Tablet,
    ];

    /// Lowercase name substrings that identify this category.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            ProductCategory::Phone => &["điện thoại", "phone", "smartphone", "iphone", "android"],
            ProductCategory::Laptop => &["laptop", "máy tính xách tay", "notebook", "macbook"],
            ProductCategory::Smartwatch => &["đồng hồ", "smartwatch", "watch"],
            ProductCategory::Tablet => &["máy tính bảng", "tablet", "ipad"],
        }
    }

    /// Infers the category from a product name by keyword matching.
    ///
    /// Matching is case-insensitive (Unicode lowercase). Returns `None` when no
    /// keyword of any category occurs in the name.
    #[must_use]
    pub fn detect(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::DETECTION_ORDER
            .into_iter()
            .find(|category| category.keywords().iter().any(|k| lower.contains(k)))
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductCategory::Phone => write!(f, "phone"),
            ProductCategory::Laptop => write!(f, "laptop"),
            ProductCategory::Smartwatch => write!(f, "smartwatch"),
            ProductCategory::Tablet => write!(f, "tablet"),
        }
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phone" | "phones" => Ok(ProductCategory::Phone),
            "laptop" | "laptops" => Ok(ProductCategory::Laptop),
            "smartwatch" | "smartwatches" => Ok(ProductCategory::Smartwatch),
            "tablet" | "tablets" => Ok(ProductCategory::Tablet),
            other => Err(format!(
                "unknown category '{other}' (expected phone, laptop, smartwatch or tablet)"
            )),
        }
    }
}
