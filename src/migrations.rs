//! Schema creation and demo data.

use crate::models::{BlogPost, Sample, blog_post};
use chrono::{Duration, Utc};
use girder_log::info;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    Schema, Set,
};

/// Create `blogs` and `samples` unless they already exist.
pub async fn run(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut blogs = schema.create_table_from_entity(BlogPost);
    blogs.if_not_exists();
    db.execute(backend.build(&blogs)).await?;

    let mut samples = schema.create_table_from_entity(Sample);
    samples.if_not_exists();
    db.execute(backend.build(&samples)).await?;

    info!("Schema ready (blogs, samples)");
    Ok(())
}

/// Insert the three demo posts when `blogs` is empty. Returns how many were
/// inserted.
pub async fn seed_blog_posts(db: &DatabaseConnection) -> Result<u64, DbErr> {
    if BlogPost::find().count(db).await? > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    let posts = [
        (
            "Getting Started with Front-Controller Routing",
            "A walk through turning request URIs into controller calls: clean URLs, \
             default controllers and dispatching on the HTTP method.",
            "John Doe",
            5,
        ),
        (
            "Advanced SeaORM Techniques",
            "Entities, active models, filters and ordering. This post covers practical \
             patterns for talking to a database from async Rust.",
            "Jane Smith",
            3,
        ),
        (
            "Building RESTful APIs",
            "A complete guide to building RESTful APIs. We'll cover validation, error \
             payloads and proper HTTP status codes.",
            "Mike Johnson",
            1,
        ),
    ];

    for (title, content, author, days_ago) in posts {
        blog_post::ActiveModel {
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            author: Set(author.to_string()),
            published_at: Set(Some(now - Duration::days(days_ago))),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    info!("Seeded {} blog posts", posts.len());
    Ok(posts.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_seaorm::{Database, DatabaseConfig};

    #[tokio::test]
    async fn test_run_is_idempotent_and_seed_once() {
        let db = Database::connect(DatabaseConfig::sqlite(":memory:"))
            .await
            .unwrap();
        run(db.connection()).await.unwrap();
        run(db.connection()).await.unwrap();

        assert_eq!(seed_blog_posts(db.connection()).await.unwrap(), 3);
        assert_eq!(seed_blog_posts(db.connection()).await.unwrap(), 0);

        let posts = BlogPost::find().all(db.connection()).await.unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|p| p.created_at <= p.updated_at));
    }
}
