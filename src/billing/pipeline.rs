//! Typed aggregation pipeline
//!
//! The billing aggregation runs as an ordered list of [`Stage`]s applied to
//! a [`Frame`]. Every stage is a pure transform from one frame shape to the
//! next, so the stages are individually testable and a misordered pipeline
//! fails loudly instead of producing a silently wrong document.
//!
//! The canonical billing pipeline is:
//!
//! ```text
//! Items -> Match -> LookupFood -> LookupOrder -> LookupTable
//!       -> Project -> Group -> Summaries
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::db::models::{DiningTable, Food, Order, OrderItem};
use crate::utils::to_fixed_2;

/// One line in a billing summary
#[derive(Debug, Clone, Serialize)]
pub struct BillingItem {
    pub order_item_id: String,
    pub food_id: String,
    /// Empty when the food was deleted after ordering (left-join miss)
    pub food_name: Option<String>,
    pub food_image: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// The food's current price. Quantity is intentionally not multiplied
    /// in: the billed amount per line is the menu price of the dish.
    pub amount: Decimal,
}

/// Grouped billing output, one entry per (order, table) pair
#[derive(Debug, Clone, Serialize)]
pub struct BillingSummary {
    pub order_id: String,
    pub table_id: Option<String>,
    pub table_number: Option<i64>,
    pub payment_due: Decimal,
    pub total_count: i64,
    pub order_items: Vec<BillingItem>,
}

/// An order item with its left-joined context. Each lookup may miss, so
/// every joined side is optional.
#[derive(Debug, Clone)]
pub struct JoinedRow {
    pub item: OrderItem,
    pub food: Option<Food>,
    pub order: Option<Order>,
    pub table: Option<DiningTable>,
}

impl JoinedRow {
    fn new(item: OrderItem) -> Self {
        Self {
            item,
            food: None,
            order: None,
            table: None,
        }
    }
}

/// A row after projection, carrying the group key and the billed line
#[derive(Debug, Clone)]
pub struct ProjectedRow {
    pub order_id: String,
    pub table_id: Option<String>,
    pub table_number: Option<i64>,
    pub amount: Decimal,
    pub line: BillingItem,
}

/// Data flowing between stages
#[derive(Debug, Clone)]
pub enum Frame {
    Items(Vec<OrderItem>),
    Joined(Vec<JoinedRow>),
    Projected(Vec<ProjectedRow>),
    Summaries(Vec<BillingSummary>),
}

impl Frame {
    fn shape(&self) -> &'static str {
        match self {
            Frame::Items(_) => "items",
            Frame::Joined(_) => "joined",
            Frame::Projected(_) => "projected",
            Frame::Summaries(_) => "summaries",
        }
    }
}

/// One pipeline step
#[derive(Debug, Clone)]
pub enum Stage {
    /// Keep only items belonging to the given order
    Match { order_id: String },
    /// Left-join each item against the food catalog
    LookupFood { foods: HashMap<String, Food> },
    /// Left-join each item against its order
    LookupOrder { orders: HashMap<String, Order> },
    /// Left-join each item against its order's table
    LookupTable {
        tables: HashMap<String, DiningTable>,
    },
    /// Shape each joined row into its billed line and group key
    Project,
    /// Fold projected rows into per-(order, table) summaries
    Group,
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Match { .. } => "match",
            Stage::LookupFood { .. } => "lookup_food",
            Stage::LookupOrder { .. } => "lookup_order",
            Stage::LookupTable { .. } => "lookup_table",
            Stage::Project => "project",
            Stage::Group => "group",
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Stage '{stage}' cannot consume a '{frame}' frame")]
    StageMismatch {
        stage: &'static str,
        frame: &'static str,
    },
}

/// Ordered stage list
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Run every stage in order over the input frame
    pub fn run(&self, input: Frame) -> Result<Frame, PipelineError> {
        self.stages
            .iter()
            .try_fold(input, |frame, stage| apply_stage(stage, frame))
    }

    /// The canonical items-by-order billing pipeline
    pub fn items_by_order(
        order_id: &str,
        foods: HashMap<String, Food>,
        orders: HashMap<String, Order>,
        tables: HashMap<String, DiningTable>,
    ) -> Self {
        Self::new()
            .stage(Stage::Match {
                order_id: order_id.to_string(),
            })
            .stage(Stage::LookupFood { foods })
            .stage(Stage::LookupOrder { orders })
            .stage(Stage::LookupTable { tables })
            .stage(Stage::Project)
            .stage(Stage::Group)
    }
}

fn apply_stage(stage: &Stage, frame: Frame) -> Result<Frame, PipelineError> {
    match (stage, frame) {
        (Stage::Match { order_id }, Frame::Items(items)) => {
            Ok(Frame::Items(apply_match(order_id, items)))
        }
        // the first lookup promotes raw items into joined rows
        (Stage::LookupFood { foods }, Frame::Items(items)) => Ok(Frame::Joined(apply_lookup_food(
            foods,
            items.into_iter().map(JoinedRow::new).collect(),
        ))),
        (Stage::LookupFood { foods }, Frame::Joined(rows)) => {
            Ok(Frame::Joined(apply_lookup_food(foods, rows)))
        }
        (Stage::LookupOrder { orders }, Frame::Items(items)) => Ok(Frame::Joined(
            apply_lookup_order(orders, items.into_iter().map(JoinedRow::new).collect()),
        )),
        (Stage::LookupOrder { orders }, Frame::Joined(rows)) => {
            Ok(Frame::Joined(apply_lookup_order(orders, rows)))
        }
        (Stage::LookupTable { tables }, Frame::Joined(rows)) => {
            Ok(Frame::Joined(apply_lookup_table(tables, rows)))
        }
        (Stage::Project, Frame::Joined(rows)) => Ok(Frame::Projected(apply_project(rows))),
        (Stage::Group, Frame::Projected(rows)) => Ok(Frame::Summaries(apply_group(rows))),
        (stage, frame) => Err(PipelineError::StageMismatch {
            stage: stage.name(),
            frame: frame.shape(),
        }),
    }
}

fn apply_match(order_id: &str, items: Vec<OrderItem>) -> Vec<OrderItem> {
    items
        .into_iter()
        .filter(|item| item.order_id == order_id)
        .collect()
}

fn apply_lookup_food(foods: &HashMap<String, Food>, mut rows: Vec<JoinedRow>) -> Vec<JoinedRow> {
    for row in &mut rows {
        row.food = foods.get(&row.item.food_id).cloned();
    }
    rows
}

fn apply_lookup_order(
    orders: &HashMap<String, Order>,
    mut rows: Vec<JoinedRow>,
) -> Vec<JoinedRow> {
    for row in &mut rows {
        row.order = orders.get(&row.item.order_id).cloned();
    }
    rows
}

fn apply_lookup_table(
    tables: &HashMap<String, DiningTable>,
    mut rows: Vec<JoinedRow>,
) -> Vec<JoinedRow> {
    for row in &mut rows {
        row.table = row
            .order
            .as_ref()
            .and_then(|order| order.table_id.as_ref())
            .and_then(|table_id| tables.get(table_id))
            .cloned();
    }
    rows
}

fn apply_project(rows: Vec<JoinedRow>) -> Vec<ProjectedRow> {
    rows.into_iter()
        .map(|row| {
            // amount is the current food price; a lookup miss bills zero
            let amount = row
                .food
                .as_ref()
                .map(|food| food.price)
                .unwrap_or(Decimal::ZERO);

            let line = BillingItem {
                order_item_id: row.item.order_item_id.clone(),
                food_id: row.item.food_id.clone(),
                food_name: row.food.as_ref().map(|f| f.name.clone()),
                food_image: row.food.as_ref().and_then(|f| f.food_image.clone()),
                quantity: row.item.quantity,
                unit_price: row.item.unit_price,
                amount,
            };

            ProjectedRow {
                order_id: row.item.order_id,
                table_id: row.order.as_ref().and_then(|o| o.table_id.clone()),
                table_number: row.table.as_ref().map(|t| t.table_number),
                amount,
                line,
            }
        })
        .collect()
}

fn apply_group(rows: Vec<ProjectedRow>) -> Vec<BillingSummary> {
    // Vec scan keeps first-seen group order stable
    let mut summaries: Vec<BillingSummary> = Vec::new();

    for row in rows {
        let existing = summaries.iter_mut().find(|s| {
            s.order_id == row.order_id
                && s.table_id == row.table_id
                && s.table_number == row.table_number
        });

        match existing {
            Some(summary) => {
                summary.payment_due = to_fixed_2(summary.payment_due + row.amount);
                summary.total_count += 1;
                summary.order_items.push(row.line);
            }
            None => summaries.push(BillingSummary {
                order_id: row.order_id,
                table_id: row.table_id,
                table_number: row.table_number,
                payment_due: to_fixed_2(row.amount),
                total_count: 1,
                order_items: vec![row.line],
            }),
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn food(food_id: &str, name: &str, price: Decimal) -> Food {
        let now = Utc::now();
        Food {
            id: None,
            food_id: food_id.to_string(),
            name: name.to_string(),
            price,
            food_image: None,
            menu_id: "m1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn item(order_item_id: &str, order_id: &str, food_id: &str, quantity: i64) -> OrderItem {
        let now = Utc::now();
        OrderItem {
            id: None,
            order_item_id: order_item_id.to_string(),
            order_id: order_id.to_string(),
            food_id: food_id.to_string(),
            quantity,
            unit_price: dec("0.00"),
            created_at: now,
            updated_at: now,
        }
    }

    fn order(order_id: &str, table_id: Option<&str>) -> Order {
        let now = Utc::now();
        Order {
            id: None,
            order_id: order_id.to_string(),
            table_id: table_id.map(|s| s.to_string()),
            order_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn table(table_id: &str, table_number: i64) -> DiningTable {
        let now = Utc::now();
        DiningTable {
            id: None,
            table_id: table_id.to_string(),
            table_number,
            number_of_guests: 2,
            created_at: now,
            updated_at: now,
        }
    }

    fn lookups(
        foods: &[Food],
        orders: &[Order],
        tables: &[DiningTable],
    ) -> (
        HashMap<String, Food>,
        HashMap<String, Order>,
        HashMap<String, DiningTable>,
    ) {
        (
            foods
                .iter()
                .map(|f| (f.food_id.clone(), f.clone()))
                .collect(),
            orders
                .iter()
                .map(|o| (o.order_id.clone(), o.clone()))
                .collect(),
            tables
                .iter()
                .map(|t| (t.table_id.clone(), t.clone()))
                .collect(),
        )
    }

    fn summaries(frame: Frame) -> Vec<BillingSummary> {
        match frame {
            Frame::Summaries(s) => s,
            other => panic!("expected summaries, got {}", other.shape()),
        }
    }

    #[test]
    fn test_match_filters_other_orders() {
        let items = vec![item("i1", "o1", "f1", 1), item("i2", "o2", "f1", 1)];
        let out = apply_match("o1", items);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].order_item_id, "i1");
    }

    #[test]
    fn test_payment_due_ignores_quantity() {
        let foods = [
            food("f1", "Margherita", dec("9.50")),
            food("f2", "Carbonara", dec("12.00")),
        ];
        let orders = [order("o1", Some("t1"))];
        let tables = [table("t1", 4)];
        let (foods, orders, tables) = lookups(&foods, &orders, &tables);

        // quantity 3 on the first line must not change the total
        let items = vec![item("i1", "o1", "f1", 3), item("i2", "o1", "f2", 1)];

        let out = Pipeline::items_by_order("o1", foods, orders, tables)
            .run(Frame::Items(items))
            .unwrap();
        let out = summaries(out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payment_due, dec("21.50"));
        assert_eq!(out[0].total_count, 2);
        assert_eq!(out[0].table_number, Some(4));
        assert_eq!(out[0].order_items.len(), 2);
    }

    #[test]
    fn test_left_join_miss_bills_zero() {
        let orders = [order("o1", None)];
        let (foods, orders, tables) = lookups(&[], &orders, &[]);

        let items = vec![item("i1", "o1", "ghost", 1)];
        let out = Pipeline::items_by_order("o1", foods, orders, tables)
            .run(Frame::Items(items))
            .unwrap();
        let out = summaries(out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payment_due, dec("0.00"));
        assert_eq!(out[0].table_id, None);
        assert_eq!(out[0].table_number, None);
        assert_eq!(out[0].order_items[0].food_name, None);
    }

    #[test]
    fn test_group_splits_by_order_and_table() {
        let foods = [food("f1", "Espresso", dec("2.50"))];
        let orders = [order("o1", Some("t1")), order("o2", Some("t2"))];
        let tables = [table("t1", 1), table("t2", 2)];
        let (foods, orders, tables) = lookups(&foods, &orders, &tables);

        let items = vec![item("i1", "o1", "f1", 1), item("i2", "o2", "f1", 1)];

        // no Match stage: aggregate across all orders
        let out = Pipeline::new()
            .stage(Stage::LookupFood { foods })
            .stage(Stage::LookupOrder { orders })
            .stage(Stage::LookupTable { tables })
            .stage(Stage::Project)
            .stage(Stage::Group)
            .run(Frame::Items(items))
            .unwrap();
        let out = summaries(out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].order_id, "o1");
        assert_eq!(out[1].order_id, "o2");
        assert_eq!(out[1].table_number, Some(2));
    }

    #[test]
    fn test_misordered_pipeline_is_rejected() {
        let err = Pipeline::new()
            .stage(Stage::Group)
            .run(Frame::Items(vec![]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::StageMismatch { .. }));
    }

    #[test]
    fn test_empty_items_yield_no_summaries() {
        let (foods, orders, tables) = lookups(&[], &[], &[]);
        let out = Pipeline::items_by_order("o1", foods, orders, tables)
            .run(Frame::Items(vec![]))
            .unwrap();
        assert!(summaries(out).is_empty());
    }
}
