//! Order repository.

use bbs_core::{NewOrder, Order, OrderId, UserId};
use serde_json::Value;
use tracing::instrument;

use super::{DocumentStore, RepositoryError, collections, decode_all, encode};

/// Repository for customer orders.
pub struct OrderRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let docs = self.store.list(collections::ORDERS).await?;
        let mut orders: Vec<Order> = decode_all(collections::ORDERS, docs)?;
        newest_first(&mut orders);
        Ok(orders)
    }

    /// Orders placed by one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        let docs = self
            .store
            .filter_eq(
                collections::ORDERS,
                "userId",
                &Value::String(user_id.as_str().to_owned()),
            )
            .await?;
        let mut orders: Vec<Order> = decode_all(collections::ORDERS, docs)?;
        newest_first(&mut orders);
        Ok(orders)
    }

    /// Record a new order under a generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    #[instrument(skip(self, order), fields(total = %order.total))]
    pub async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let doc = encode(collections::ORDERS, &order)?;
        let id = self.store.insert(collections::ORDERS, doc).await?;
        Ok(order.with_id(OrderId::new(id)))
    }

    /// Create or replace an order under its own id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn put(&self, order: &Order) -> Result<(), RepositoryError> {
        let doc = encode(collections::ORDERS, order)?;
        self.store
            .put(collections::ORDERS, order.id.as_str(), doc)
            .await?;
        Ok(())
    }
}

/// Sort by date descending; same-day orders keep id order.
fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::MemoryDocumentStore;
    use bbs_core::OrderStatus;

    fn new_order(user: Option<&str>, day: u32) -> NewOrder {
        NewOrder {
            user_id: user.map(UserId::new),
            customer_name: "Alice Johnson".to_owned(),
            customer_avatar: "user-avatar-1".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            status: OrderStatus::Pending,
            total: Decimal::new(6999, 2),
            item_count: 1,
        }
    }

    #[tokio::test]
    async fn test_list_for_user_filters_and_sorts() {
        let store = MemoryDocumentStore::new();
        let repo = OrderRepository::new(&store);

        repo.create(new_order(Some("user1"), 3)).await.unwrap();
        repo.create(new_order(Some("user2"), 4)).await.unwrap();
        repo.create(new_order(Some("user1"), 9)).await.unwrap();
        repo.create(new_order(None, 10)).await.unwrap();

        let mine = repo.list_for_user(&UserId::new("user1")).await.unwrap();
        let days: Vec<String> = mine.iter().map(|o| o.date.to_string()).collect();
        assert_eq!(days, vec!["2024-05-09", "2024-05-03"]);

        assert_eq!(repo.list().await.unwrap().len(), 4);
    }
}
