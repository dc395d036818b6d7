//! Menu Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult, decode_rows};
use crate::db::DbService;
use crate::db::models::{Menu, MenuCreate, MenuUpdate, new_public_id};

const TABLE: &str = "menu";

#[derive(Clone)]
pub struct MenuRepository {
    base: BaseRepository,
}

impl MenuRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Menu>> {
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM menu ORDER BY created_at")
                    .await?;
                Ok(decode_rows(result.take(0), TABLE))
            })
            .await
    }

    pub async fn find_by_menu_id(&self, menu_id: &str) -> RepoResult<Option<Menu>> {
        let menu_id = menu_id.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM menu WHERE menu_id = $menu_id LIMIT 1")
                    .bind(("menu_id", menu_id))
                    .await?;
                let menus: Vec<Menu> = result.take(0)?;
                Ok(menus.into_iter().next())
            })
            .await
    }

    pub async fn create(&self, data: MenuCreate) -> RepoResult<Menu> {
        let now = Utc::now();
        let menu = Menu {
            id: None,
            menu_id: new_public_id(),
            name: data.name,
            category: data.category,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: now,
            updated_at: now,
        };

        self.base
            .write(async {
                let created: Option<Menu> = self.base.db().create(TABLE).content(menu).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create menu".to_string()))
            })
            .await
    }

    /// Apply a field-level patch. The date window only changes when both
    /// ends are provided and ordered.
    pub async fn update(&self, menu_id: &str, data: MenuUpdate) -> RepoResult<Menu> {
        let existing = self
            .find_by_menu_id(menu_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", menu_id)))?;

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Menu record missing internal id".to_string()))?;

        let (start_date, end_date) = match (data.start_date, data.end_date) {
            (Some(start), Some(end)) => {
                if end < start {
                    return Err(RepoError::Validation(
                        "end_date must not precede start_date".to_string(),
                    ));
                }
                (Some(start), Some(end))
            }
            _ => (existing.start_date, existing.end_date),
        };

        let name = data.name.unwrap_or(existing.name);
        let category = data.category.unwrap_or(existing.category);
        let updated_at = Utc::now();

        self.base
            .write(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE $thing SET name = $name, category = $category, \
                         start_date = $start_date, end_date = $end_date, \
                         updated_at = $updated_at RETURN AFTER",
                    )
                    .bind(("thing", thing))
                    .bind(("name", name))
                    .bind(("category", category))
                    .bind(("start_date", start_date))
                    .bind(("end_date", end_date))
                    .bind(("updated_at", updated_at))
                    .await?;
                let updated: Vec<Menu> = result.take(0)?;
                updated
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", menu_id)))
            })
            .await
    }
}
