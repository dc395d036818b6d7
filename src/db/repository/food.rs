//! Food Repository

use chrono::Utc;

use super::{BaseRepository, CountRow, RepoError, RepoResult, decode_rows};
use crate::db::DbService;
use crate::db::models::{Food, FoodCreate, FoodUpdate, new_public_id};
use crate::utils::{PageParams, to_fixed_2};

const TABLE: &str = "food";

#[derive(Clone)]
pub struct FoodRepository {
    base: BaseRepository,
}

impl FoodRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Paginated listing: total count plus the requested window
    pub async fn find_page(&self, params: &PageParams) -> RepoResult<(i64, Vec<Food>)> {
        let limit = params.record_per_page() as i64;
        let start = params.start_index() as i64;
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT count() AS total FROM food GROUP ALL")
                    .query("SELECT * FROM food ORDER BY created_at LIMIT $limit START $start")
                    .bind(("limit", limit))
                    .bind(("start", start))
                    .await?;
                let count: Option<CountRow> = result.take(0)?;
                let foods: Vec<Food> = decode_rows(result.take(1), TABLE);
                Ok((count.map(|c| c.total).unwrap_or(0), foods))
            })
            .await
    }

    pub async fn find_by_food_id(&self, food_id: &str) -> RepoResult<Option<Food>> {
        let food_id = food_id.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM food WHERE food_id = $food_id LIMIT 1")
                    .bind(("food_id", food_id))
                    .await?;
                let foods: Vec<Food> = result.take(0)?;
                Ok(foods.into_iter().next())
            })
            .await
    }

    /// Fetch the foods referenced by a set of public ids (billing lookups)
    pub async fn find_by_food_ids(&self, food_ids: Vec<String>) -> RepoResult<Vec<Food>> {
        self.base
            .write(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM food WHERE food_id IN $food_ids")
                    .bind(("food_ids", food_ids))
                    .await?;
                let foods: Vec<Food> = result.take(0)?;
                Ok(foods)
            })
            .await
    }

    /// Create a new food; price is rounded to 2 decimal places
    pub async fn create(&self, data: FoodCreate) -> RepoResult<Food> {
        let now = Utc::now();
        let food = Food {
            id: None,
            food_id: new_public_id(),
            name: data.name,
            price: to_fixed_2(data.price),
            food_image: data.food_image,
            menu_id: data.menu_id,
            created_at: now,
            updated_at: now,
        };

        self.base
            .write(async {
                let created: Option<Food> = self.base.db().create(TABLE).content(food).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create food".to_string()))
            })
            .await
    }

    /// Apply a field-level patch; only provided fields change,
    /// `updated_at` is always stamped
    pub async fn update(&self, food_id: &str, data: FoodUpdate) -> RepoResult<Food> {
        let existing = self
            .find_by_food_id(food_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Food {} not found", food_id)))?;

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Food record missing internal id".to_string()))?;

        let name = data.name.unwrap_or(existing.name);
        let price = to_fixed_2(data.price.unwrap_or(existing.price));
        let food_image = data.food_image.or(existing.food_image);
        let menu_id = data.menu_id.unwrap_or(existing.menu_id);
        let updated_at = Utc::now();

        self.base
            .write(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE $thing SET name = $name, price = $price, \
                         food_image = $food_image, menu_id = $menu_id, \
                         updated_at = $updated_at RETURN AFTER",
                    )
                    .bind(("thing", thing))
                    .bind(("name", name))
                    .bind(("price", price))
                    .bind(("food_image", food_image))
                    .bind(("menu_id", menu_id))
                    .bind(("updated_at", updated_at))
                    .await?;
                let updated: Vec<Food> = result.take(0)?;
                updated
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("Food {} not found", food_id)))
            })
            .await
    }
}
