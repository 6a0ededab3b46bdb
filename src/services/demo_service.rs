//! Aggregates the SeaORM models and the upstream JSONPlaceholder API.
//!
//! Nothing here fails: a database or upstream problem is returned as
//! [`ServiceReply::Error`], which serializes as `{"error": "..."}`.

use crate::models::{BlogPost, Sample, blog_post, sample};
use chrono::{DateTime, Utc};
use girder_core::{Container, Error, Injectable};
use girder_http_client::HttpClient;
use girder_log::warn;
use girder_seaorm::{LazyDatabase, SeaOrmError};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a service call, serialized as the data itself or as
/// `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServiceReply<T> {
    Data(T),
    Error { error: String },
}

impl<T> ServiceReply<T> {
    fn database(err: SeaOrmError) -> Self {
        warn!("Database error: {}", err);
        ServiceReply::Error {
            error: format!("Database error: {}", err),
        }
    }

    fn from_db(result: Result<T, SeaOrmError>) -> Self {
        match result {
            Ok(data) => ServiceReply::Data(data),
            Err(err) => Self::database(err),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ServiceReply::Error { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ServiceReply::Data(data) => Some(data),
            ServiceReply::Error { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ServiceReply::Data(data) => Ok(data),
            ServiceReply::Error { error } => Err(error),
        }
    }
}

/// Fields for a new blog post; `author` defaults to `Anonymous` and
/// `published_at` to now.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlogPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSample {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct DemoService {
    db: LazyDatabase,
    http: HttpClient,
}

impl Injectable for DemoService {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self::new(container.resolve()?, container.resolve()?))
    }
}

impl DemoService {
    pub fn new(db: LazyDatabase, http: HttpClient) -> Self {
        Self { db, http }
    }

    pub fn database(&self) -> &LazyDatabase {
        &self.db
    }

    // Upstream API

    pub async fn get_posts(&self) -> ServiceReply<Value> {
        self.upstream("/posts", None).await
    }

    pub async fn get_post(&self, id: i64) -> ServiceReply<Value> {
        self.upstream(&format!("/posts/{}", id), None).await
    }

    pub async fn get_users(&self) -> ServiceReply<Value> {
        self.upstream("/users", None).await
    }

    pub async fn get_user(&self, id: i64) -> ServiceReply<Value> {
        self.upstream(&format!("/users/{}", id), None).await
    }

    pub async fn get_comments(&self, post_id: Option<i64>) -> ServiceReply<Value> {
        self.upstream("/comments", post_id.map(|id| ("postId", id.to_string())))
            .await
    }

    async fn upstream(&self, path: &str, query: Option<(&str, String)>) -> ServiceReply<Value> {
        let mut request = self.http.get(path);
        if let Some((key, value)) = query {
            request = request.query(key, value);
        }

        let result = request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<Value>());

        match result {
            Ok(data) => ServiceReply::Data(data),
            Err(err) => {
                warn!("Upstream request {} failed: {}", path, err);
                ServiceReply::Error {
                    error: err.to_string(),
                }
            }
        }
    }

    // Blog posts

    /// Published posts, newest first.
    pub async fn get_blog_posts(&self) -> ServiceReply<Vec<blog_post::Model>> {
        let result = async {
            let db = self.db.connection().await?;
            let found = BlogPost::find_published()
                .order_by_desc(blog_post::Column::PublishedAt)
                .all(db)
                .await?;
            Ok::<_, SeaOrmError>(found)
        }
        .await;
        ServiceReply::from_db(result)
    }

    /// A published post; `None` when missing or not yet published.
    pub async fn get_blog_post(&self, id: i32) -> ServiceReply<Option<blog_post::Model>> {
        let result = async {
            let db = self.db.connection().await?;
            let found = BlogPost::find_published()
                .filter(blog_post::Column::Id.eq(id))
                .one(db)
                .await?;
            Ok::<_, SeaOrmError>(found)
        }
        .await;
        ServiceReply::from_db(result)
    }

    pub async fn create_blog_post(&self, data: NewBlogPost) -> ServiceReply<blog_post::Model> {
        let result = async {
            let db = self.db.connection().await?;
            let post = blog_post::ActiveModel {
                title: Set(data.title),
                content: Set(data.content),
                author: Set(data.author.unwrap_or_else(|| "Anonymous".to_string())),
                published_at: Set(Some(data.published_at.unwrap_or_else(Utc::now))),
                ..Default::default()
            };
            Ok::<_, SeaOrmError>(post.insert(db).await?)
        }
        .await;
        ServiceReply::from_db(result)
    }

    /// Posts published in the last 30 days, newest first.
    pub async fn get_recent_blog_posts(&self) -> ServiceReply<Vec<blog_post::Model>> {
        let result = async {
            let db = self.db.connection().await?;
            let found = BlogPost::find_recent(30)
                .order_by_desc(blog_post::Column::PublishedAt)
                .all(db)
                .await?;
            Ok::<_, SeaOrmError>(found)
        }
        .await;
        ServiceReply::from_db(result)
    }

    // Samples

    pub async fn create_sample(&self, data: NewSample) -> ServiceReply<sample::Model> {
        let result = async {
            let db = self.db.connection().await?;
            let sample = sample::ActiveModel {
                name: Set(data.name),
                email: Set(data.email),
                description: Set(data.description),
                ..Default::default()
            };
            Ok::<_, SeaOrmError>(sample.insert(db).await?)
        }
        .await;
        ServiceReply::from_db(result)
    }

    pub async fn get_samples(&self) -> ServiceReply<Vec<sample::Model>> {
        let result = async {
            let db = self.db.connection().await?;
            Ok::<_, SeaOrmError>(Sample::find().all(db).await?)
        }
        .await;
        ServiceReply::from_db(result)
    }
}
