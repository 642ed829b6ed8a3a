//! Catalog records: products and categories.
//!
//! Field names serialize in camelCase to match the documents stored in the
//! `products` and `categories` collections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

/// A product document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    /// Expected to be below `price`; not enforced on write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    /// Category id. Older documents written by the admin console use
    /// `categoryId`.
    #[serde(alias = "categoryId")]
    pub category: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub stock: u32,
    /// Image ids, resolved to URLs by the storefront.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews.
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// The price a customer pays: the sale price when present, else the list
    /// price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether a sale price is set and actually below the list price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.price)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// List price formatted for display.
    #[must_use]
    pub fn price_display(&self) -> String {
        Price::usd(self.price).display()
    }

    /// Effective price formatted for display.
    #[must_use]
    pub fn effective_price_display(&self) -> String {
        Price::usd(self.effective_price()).display()
    }

    /// First image id, used for cards and table thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A product that has not been written to the store yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    pub category: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub stock: u32,
    pub images: Vec<String>,
    pub rating: f64,
    pub reviews: u32,
    pub tags: Vec<String>,
    pub featured: bool,
}

impl NewProduct {
    /// Brand assigned to products created from the admin console.
    pub const HOUSE_BRAND: &'static str = "BBS";

    /// Category assigned to products created from the admin console.
    pub const DEFAULT_CATEGORY: &'static str = "default";

    /// A bare product as created from the admin "Add Product" form.
    ///
    /// Pricing, stock and images are filled in later; tags come from the
    /// comma-separated key features.
    #[must_use]
    pub fn draft(name: &str, description: &str, features: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            description: description.trim().to_owned(),
            price: Decimal::ZERO,
            sale_price: None,
            category: CategoryId::new(Self::DEFAULT_CATEGORY),
            brand: Some(Self::HOUSE_BRAND.to_owned()),
            stock: 0,
            images: Vec::new(),
            rating: 0.0,
            reviews: 0,
            tags: split_features(features),
            featured: false,
        }
    }

    /// Attach the id assigned by the store.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            sale_price: self.sale_price,
            category: self.category,
            brand: self.brand,
            stock: self.stock,
            images: self.images,
            rating: self.rating,
            reviews: self.reviews,
            tags: self.tags,
            featured: self.featured,
        }
    }
}

/// Split a comma-separated feature list into trimmed, non-empty tags.
#[must_use]
pub fn split_features(features: &str) -> Vec<String> {
    features
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A category document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Image id for the category tile.
    #[serde(default)]
    pub image: String,
    /// Denormalized count; nothing keeps it in sync with the catalog.
    #[serde(default)]
    pub product_count: u32,
}

/// Filter selections on the product listing page.
///
/// A product is shown when it matches every active predicate; `None`
/// means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name. Empty matches all.
    pub search: String,
    pub category: Option<CategoryId>,
    pub brand: Option<String>,
}

impl ProductFilter {
    /// Value of a select box that disables that predicate.
    pub const ALL: &'static str = "all";

    /// Build a filter from raw query parameters.
    ///
    /// Missing, blank and `"all"` selections disable the predicate.
    #[must_use]
    pub fn from_params(search: Option<&str>, category: Option<&str>, brand: Option<&str>) -> Self {
        let selection = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != Self::ALL)
                .map(str::to_owned)
        };

        Self {
            search: search.map(str::trim).unwrap_or_default().to_owned(),
            category: selection(category).map(CategoryId::new),
            brand: selection(brand),
        }
    }

    /// Whether a product satisfies every active predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self.search.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|category| product.category == *category);
        let brand_ok = self
            .brand
            .as_deref()
            .is_none_or(|brand| product.brand.as_deref() == Some(brand));

        search_ok && category_ok && brand_ok
    }

    /// Products matching the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    /// Selected category id, or `"all"`.
    #[must_use]
    pub fn category_param(&self) -> &str {
        self.category.as_ref().map_or(Self::ALL, CategoryId::as_str)
    }

    /// Selected brand, or `"all"`.
    #[must_use]
    pub fn brand_param(&self) -> &str {
        self.brand.as_deref().unwrap_or(Self::ALL)
    }
}

/// Distinct brands in order of first appearance.
#[must_use]
pub fn unique_brands(products: &[Product]) -> Vec<String> {
    let mut brands: Vec<String> = Vec::new();
    for brand in products.iter().filter_map(|p| p.brand.as_deref()) {
        if !brands.iter().any(|b| b == brand) {
            brands.push(brand.to_owned());
        }
    }
    brands
}

/// Star breakdown for a 0-5 rating.
///
/// Any fractional part renders as one half star; the rest are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    pub const MAX: u8 = 5;

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_rating(rating: f64) -> Self {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, f64::from(Self::MAX))
        } else {
            0.0
        };
        // Clamped to 0..=5 above, so the cast cannot truncate.
        let full = rating.floor() as u8;
        let half = rating.fract() > 0.0;
        let empty = Self::MAX - full - u8::from(half);
        Self { full, half, empty }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, category: &str, brand: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: String::new(),
            price: Decimal::new(10_000, 2),
            sale_price: None,
            category: CategoryId::new(category),
            brand: Some(brand.to_owned()),
            stock: 1,
            images: vec![format!("{id}-1")],
            rating: 4.5,
            reviews: 10,
            tags: Vec::new(),
            featured: false,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("prod1", "RetroShot Pro Camera", "cameras", "RetroLens"),
            product("prod2", "Aura-X Headphones", "audio", "SonicSphere"),
            product("prod7", "AeroView 4K Drone", "cameras", "SkyHigh"),
            product("prod8", "MixMaster Go DJ Console", "audio", "BeatDrop"),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let products = catalog();
        let filter = ProductFilter::from_params(None, Some("all"), Some("all"));
        assert_eq!(filter.apply(&products).len(), products.len());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let products = catalog();
        let filter = ProductFilter::from_params(Some("cAmErA"), None, None);
        assert_eq!(ids(&filter.apply(&products)), vec!["prod1"]);
    }

    #[test]
    fn test_filters_intersect() {
        let products = catalog();

        let by_category = ProductFilter::from_params(None, Some("cameras"), None);
        assert_eq!(ids(&by_category.apply(&products)), vec!["prod1", "prod7"]);

        let by_brand = ProductFilter::from_params(None, None, Some("SkyHigh"));
        assert_eq!(ids(&by_brand.apply(&products)), vec!["prod7"]);

        let all_three = ProductFilter::from_params(Some("drone"), Some("cameras"), Some("SkyHigh"));
        assert_eq!(ids(&all_three.apply(&products)), vec!["prod7"]);

        let disjoint = ProductFilter::from_params(None, Some("audio"), Some("SkyHigh"));
        assert!(disjoint.apply(&products).is_empty());
    }

    #[test]
    fn test_brand_filter_skips_products_without_brand() {
        let mut products = catalog();
        products[0].brand = None;
        let filter = ProductFilter::from_params(None, None, Some("RetroLens"));
        assert!(filter.apply(&products).is_empty());
    }

    #[test]
    fn test_params_round_trip_to_select_values() {
        let filter = ProductFilter::from_params(Some(" mic "), Some(""), Some("ClearVoice"));
        assert_eq!(filter.search, "mic");
        assert_eq!(filter.category_param(), "all");
        assert_eq!(filter.brand_param(), "ClearVoice");
    }

    #[test]
    fn test_unique_brands_keeps_first_seen_order() {
        let mut products = catalog();
        products.push(product("prod9", "Another Camera", "cameras", "RetroLens"));
        assert_eq!(
            unique_brands(&products),
            vec!["RetroLens", "SonicSphere", "SkyHigh", "BeatDrop"]
        );
    }

    #[test]
    fn test_effective_price_prefers_sale_price() {
        let mut p = product("prod2", "Aura-X", "audio", "SonicSphere");
        p.price = Decimal::new(349, 0);
        assert_eq!(p.effective_price(), Decimal::new(349, 0));
        assert!(!p.is_on_sale());

        p.sale_price = Some(Decimal::new(299, 0));
        assert_eq!(p.effective_price(), Decimal::new(299, 0));
        assert!(p.is_on_sale());
        assert_eq!(p.effective_price_display(), "$299.00");
    }

    #[test]
    fn test_star_rating_breakdown() {
        assert_eq!(
            StarRating::from_rating(4.8),
            StarRating { full: 4, half: true, empty: 0 }
        );
        assert_eq!(
            StarRating::from_rating(4.0),
            StarRating { full: 4, half: false, empty: 1 }
        );
        assert_eq!(
            StarRating::from_rating(0.0),
            StarRating { full: 0, half: false, empty: 5 }
        );
        assert_eq!(
            StarRating::from_rating(7.2),
            StarRating { full: 5, half: false, empty: 0 }
        );
        assert_eq!(
            StarRating::from_rating(f64::NAN),
            StarRating { full: 0, half: false, empty: 5 }
        );
    }

    #[test]
    fn test_draft_product_from_admin_form() {
        let draft = NewProduct::draft("Studio Monitor", "Flat response.", "speaker, , studio ,");
        assert_eq!(draft.tags, vec!["speaker", "studio"]);
        assert_eq!(draft.brand.as_deref(), Some("BBS"));
        assert_eq!(draft.category.as_str(), "default");
        assert_eq!(draft.price, Decimal::ZERO);

        let product = draft.with_id(ProductId::new("new1"));
        assert_eq!(product.id.as_str(), "new1");
        assert!(!product.in_stock());
    }

    #[test]
    fn test_product_document_shape() {
        let json = serde_json::json!({
            "id": "prod2",
            "name": "Aura-X Noise-Cancelling Headphones",
            "description": "Immerse yourself in pure sound.",
            "price": 349.00,
            "salePrice": 299.00,
            "category": "audio",
            "brand": "SonicSphere",
            "stock": 30,
            "images": ["prod2-1", "prod2-2"],
            "rating": 4.9,
            "reviews": 540,
            "tags": ["audio", "headphones"],
            "featured": true
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.sale_price, Some(Decimal::new(299, 0)));
        assert_eq!(product.primary_image(), Some("prod2-1"));
        assert!(product.featured);

        let legacy = serde_json::json!({
            "id": "new1",
            "name": "Draft",
            "price": "0",
            "categoryId": "default"
        });
        let product: Product = serde_json::from_value(legacy).unwrap();
        assert_eq!(product.category.as_str(), "default");
        assert!(!product.featured);
    }
}
