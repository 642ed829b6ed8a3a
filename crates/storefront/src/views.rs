//! Display data shared by several templates.
//!
//! Templates get pre-formatted strings; money, dates and image URLs are
//! rendered here rather than in the templates.

use bbs_core::{Category, Order, Product, StarRating, User};

/// Image shown when a record has no image id.
pub const FALLBACK_IMAGE: &str = "placeholder";

/// URL for an image id.
#[must_use]
pub fn image_url(id: &str) -> String {
    let id = if id.is_empty() { FALLBACK_IMAGE } else { id };
    format!("/images/{}", urlencoding::encode(id))
}

/// Star row for a rating.
#[derive(Debug, Clone)]
pub struct StarsView {
    pub full: Vec<()>,
    pub half: bool,
    pub empty: Vec<()>,
    pub label: String,
}

impl StarsView {
    #[must_use]
    pub fn new(rating: f64) -> Self {
        let stars = StarRating::from_rating(rating);
        Self {
            full: vec![(); usize::from(stars.full)],
            half: stars.half,
            empty: vec![(); usize::from(stars.empty)],
            label: format!("{rating:.1} out of 5"),
        }
    }
}

/// Product card for grids.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: String,
    /// List price, struck through when the product is on sale.
    pub list_price: String,
    pub on_sale: bool,
    pub stars: StarsView,
    pub reviews: u32,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: image_url(product.primary_image().unwrap_or_default()),
            price: product.effective_price_display(),
            list_price: product.price_display(),
            on_sale: product.is_on_sale(),
            stars: StarsView::new(product.rating),
            reviews: product.reviews,
        }
    }
}

impl ProductCard {
    #[must_use]
    pub fn for_all<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<Self> {
        products.into_iter().map(Self::from).collect()
    }
}

/// Category tile linking to the filtered listing.
#[derive(Debug, Clone)]
pub struct CategoryTile {
    pub name: String,
    pub href: String,
    pub image: String,
}

impl From<&Category> for CategoryTile {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            href: format!(
                "/products?category={}",
                urlencoding::encode(category.id.as_str())
            ),
            image: image_url(&category.image),
        }
    }
}

/// Order table row.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub customer_name: String,
    pub customer_avatar: String,
    pub date: String,
    pub status: &'static str,
    pub status_class: &'static str,
    pub total: String,
    pub item_count: u32,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.customer_name.clone(),
            customer_avatar: image_url(&order.customer_avatar),
            date: order.date.format("%b %-d, %Y").to_string(),
            status: order.status.label(),
            status_class: order.status.badge_class(),
            total: order.total_display(),
            item_count: order.item_count,
        }
    }
}

/// Customer table row.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub name: String,
    pub initials: String,
    pub email: String,
    pub avatar: String,
    pub joined: String,
    pub order_count: u32,
    pub is_admin: bool,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            name: user.full_name(),
            initials: user.initials(),
            email: user.email.to_string(),
            avatar: image_url(&user.avatar),
            joined: user.joined.format("%b %-d, %Y").to_string(),
            order_count: user.order_count,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbs_core::{CategoryId, ProductId};
    use rust_decimal::Decimal;

    fn product(sale_price: Option<Decimal>) -> Product {
        Product {
            id: ProductId::new("prod2"),
            name: "SoundWave Pro Headphones".to_string(),
            description: String::new(),
            price: Decimal::new(34999, 2),
            sale_price,
            category: CategoryId::new("audio"),
            brand: Some("SoundWave".to_string()),
            stock: 50,
            images: vec!["prod2-1".to_string()],
            rating: 4.5,
            reviews: 342,
            tags: Vec::new(),
            featured: true,
        }
    }

    #[test]
    fn test_card_on_sale() {
        let card = ProductCard::from(&product(Some(Decimal::new(29999, 2))));
        assert!(card.on_sale);
        assert_eq!(card.price, "$299.99");
        assert_eq!(card.list_price, "$349.99");
        assert_eq!(card.image, "/images/prod2-1");
        assert_eq!(card.stars.full.len(), 4);
        assert!(card.stars.half);
        assert!(card.stars.empty.is_empty());
    }

    #[test]
    fn test_card_without_images_uses_fallback() {
        let mut p = product(None);
        p.images.clear();
        let card = ProductCard::from(&p);
        assert!(!card.on_sale);
        assert_eq!(card.image, "/images/placeholder");
    }

    #[test]
    fn test_category_href_is_encoded() {
        let tile = CategoryTile::from(&Category {
            id: CategoryId::new("home theater"),
            name: "Home Theater".to_string(),
            image: String::new(),
            product_count: 0,
        });
        assert_eq!(tile.href, "/products?category=home%20theater");
    }
}
