//! Order-level context passed alongside a transaction.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Order and customer a charge belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContext {
    pub order_id: String,
    pub customer_id: String,
    /// The customer does not exist at the gateway yet
    pub is_new_customer: bool,
}

impl OrderContext {
    /// Creates a new order context.
    ///
    /// # Validation
    /// - Order id and customer id cannot be blank
    pub fn new(
        order_id: impl Into<String>,
        customer_id: impl Into<String>,
        is_new_customer: bool,
    ) -> Result<Self, DomainError> {
        let order_id = order_id.into();
        let customer_id = customer_id.into();
        if order_id.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Order id cannot be empty".into(),
            ));
        }
        if customer_id.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Customer id cannot be empty".into(),
            ));
        }
        Ok(Self {
            order_id,
            customer_id,
            is_new_customer,
        })
    }
}

/// Context of a transaction: either plain, or bearing an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionContext {
    #[default]
    Plain,
    Order(OrderContext),
}

impl TransactionContext {
    /// Returns the order context, if this context carries one.
    pub fn order(&self) -> Option<&OrderContext> {
        match self {
            TransactionContext::Plain => None,
            TransactionContext::Order(order) => Some(order),
        }
    }
}

impl From<OrderContext> for TransactionContext {
    fn from(order: OrderContext) -> Self {
        TransactionContext::Order(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_context_has_no_order() {
        assert!(TransactionContext::default().order().is_none());
    }

    #[test]
    fn test_order_context() {
        let ctx: TransactionContext = OrderContext::new("o-1", "c-1", true).unwrap().into();
        let order = ctx.order().unwrap();
        assert_eq!(order.customer_id, "c-1");
        assert!(order.is_new_customer);
    }

    #[test]
    fn test_blank_customer_fails() {
        let result = OrderContext::new("o-1", " ", false);
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }
}
