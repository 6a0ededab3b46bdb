//! Blog posts, table `blogs`.

use chrono::{Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, Select};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author: String,
    pub published_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        super::touch(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}

impl Entity {
    /// Posts with a publication date that is not in the future.
    pub fn find_published() -> Select<Entity> {
        Self::find().filter(
            Condition::all()
                .add(Column::PublishedAt.is_not_null())
                .add(Column::PublishedAt.lte(Utc::now())),
        )
    }

    /// Published posts from the last `days` days.
    pub fn find_recent(days: i64) -> Select<Entity> {
        Self::find_published().filter(Column::PublishedAt.gte(Utc::now() - Duration::days(days)))
    }
}
