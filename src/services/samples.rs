//! Persistence for the Sample REST API.

use crate::models::{Sample, sample};
use chrono::{Duration, Utc};
use girder_core::{Container, Error, Injectable};
use girder_seaorm::{LazyDatabase, SeaOrmResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

/// Fields supplied to an update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleStats {
    pub total_samples: u64,
    pub samples_with_email: u64,
    pub samples_with_description: u64,
    pub recent_samples: u64,
    /// Percentage of samples with an email, two decimals.
    pub completion_rate: f64,
}

#[derive(Clone)]
pub struct SampleStore {
    db: LazyDatabase,
}

impl Injectable for SampleStore {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self::new(container.resolve()?))
    }
}

impl SampleStore {
    pub fn new(db: LazyDatabase) -> Self {
        Self { db }
    }

    pub async fn all(&self) -> SeaOrmResult<Vec<sample::Model>> {
        let db = self.db.connection().await?;
        Ok(Sample::find().order_by_asc(sample::Column::Id).all(db).await?)
    }

    pub async fn find(&self, id: i32) -> SeaOrmResult<Option<sample::Model>> {
        let db = self.db.connection().await?;
        Ok(Sample::find_by_id(id).one(db).await?)
    }

    pub async fn create(
        &self,
        name: String,
        email: String,
        description: Option<String>,
    ) -> SeaOrmResult<sample::Model> {
        let db = self.db.connection().await?;
        let model = sample::ActiveModel {
            name: Set(name),
            email: Set(email),
            description: Set(description),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }

    pub async fn update(
        &self,
        existing: sample::Model,
        changes: SampleChanges,
    ) -> SeaOrmResult<sample::Model> {
        let db = self.db.connection().await?;
        let mut model = existing.into_active_model();
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(email) = changes.email {
            model.email = Set(email);
        }
        if let Some(description) = changes.description {
            model.description = Set(Some(description));
        }
        Ok(model.update(db).await?)
    }

    /// Returns whether a row was deleted.
    pub async fn delete(&self, id: i32) -> SeaOrmResult<bool> {
        let db = self.db.connection().await?;
        let result = Sample::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Whether `email` is used by a sample other than `except`.
    pub async fn email_taken(&self, email: &str, except: Option<i32>) -> SeaOrmResult<bool> {
        let db = self.db.connection().await?;
        let mut query = Sample::find().filter(sample::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(sample::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    /// Samples whose name, email or description contains `term`.
    pub async fn search(&self, term: &str) -> SeaOrmResult<Vec<sample::Model>> {
        let db = self.db.connection().await?;
        Ok(Sample::find()
            .filter(
                Condition::any()
                    .add(sample::Column::Name.contains(term))
                    .add(sample::Column::Email.contains(term))
                    .add(sample::Column::Description.contains(term)),
            )
            .order_by_asc(sample::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn stats(&self) -> SeaOrmResult<SampleStats> {
        let db = self.db.connection().await?;

        let total_samples = Sample::find().count(db).await?;
        let samples_with_email = Sample::find()
            .filter(sample::Column::Email.ne(""))
            .count(db)
            .await?;
        let samples_with_description = Sample::find()
            .filter(sample::Column::Description.is_not_null())
            .filter(sample::Column::Description.ne(""))
            .count(db)
            .await?;
        let recent_samples = Sample::find()
            .filter(sample::Column::CreatedAt.gte(Utc::now() - Duration::days(7)))
            .count(db)
            .await?;

        Ok(SampleStats {
            total_samples,
            samples_with_email,
            samples_with_description,
            recent_samples,
            completion_rate: completion_rate(samples_with_email, total_samples),
        })
    }
}

fn completion_rate(with_email: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = with_email as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
