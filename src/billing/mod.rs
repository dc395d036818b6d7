//! Billing Module
//!
//! Computes what a table owes for an order by joining order items against
//! the food catalog, the order, and the dining table, then grouping into a
//! per-order summary. The join-and-group logic lives in [`pipeline`] as
//! pure transforms; this module fetches the inputs and runs the pipeline.

pub mod pipeline;

pub use pipeline::{BillingItem, BillingSummary, Frame, Pipeline, PipelineError, Stage};

use std::collections::HashMap;

use crate::db::DbService;
use crate::db::repository::{
    DiningTableRepository, FoodRepository, OrderItemRepository, OrderRepository,
};
use crate::utils::{AppError, AppResult};

/// Runs the items-by-order aggregation against the store
#[derive(Clone)]
pub struct BillingAggregator {
    foods: FoodRepository,
    orders: OrderRepository,
    order_items: OrderItemRepository,
    tables: DiningTableRepository,
}

impl BillingAggregator {
    pub fn new(db: DbService) -> Self {
        Self {
            foods: FoodRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            order_items: OrderItemRepository::new(db.clone()),
            tables: DiningTableRepository::new(db),
        }
    }

    /// Aggregate the billing summary for one order.
    ///
    /// An order with no items is NotFound. Store failures during the fetch
    /// phase surface as aggregation errors, not generic database errors,
    /// so billing failures are distinguishable in logs.
    pub async fn items_by_order(&self, order_id: &str) -> AppResult<BillingSummary> {
        let items = self
            .order_items
            .find_by_order(order_id)
            .await
            .map_err(|e| AppError::aggregate_failed(e.to_string()))?;

        if items.is_empty() {
            return Err(AppError::not_found(format!(
                "No order items found for order {}",
                order_id
            )));
        }

        let food_ids: Vec<String> = items.iter().map(|i| i.food_id.clone()).collect();
        let foods: HashMap<String, _> = self
            .foods
            .find_by_food_ids(food_ids)
            .await
            .map_err(|e| AppError::aggregate_failed(e.to_string()))?
            .into_iter()
            .map(|f| (f.food_id.clone(), f))
            .collect();

        // left joins: a missing order or table leaves the group key fields null
        let mut orders = HashMap::new();
        let mut tables = HashMap::new();
        if let Some(order) = self
            .orders
            .find_by_order_id(order_id)
            .await
            .map_err(|e| AppError::aggregate_failed(e.to_string()))?
        {
            if let Some(table_id) = order.table_id.clone()
                && let Some(table) = self
                    .tables
                    .find_by_table_id(&table_id)
                    .await
                    .map_err(|e| AppError::aggregate_failed(e.to_string()))?
            {
                tables.insert(table.table_id.clone(), table);
            }
            orders.insert(order.order_id.clone(), order);
        }

        let frame = Pipeline::items_by_order(order_id, foods, orders, tables)
            .run(Frame::Items(items))
            .map_err(|e| AppError::aggregate_failed(e.to_string()))?;

        match frame {
            Frame::Summaries(mut summaries) if !summaries.is_empty() => Ok(summaries.remove(0)),
            _ => Err(AppError::not_found(format!(
                "No order items found for order {}",
                order_id
            ))),
        }
    }
}
