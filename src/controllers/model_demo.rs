// SeaORM demo pages

use crate::services::{DemoService, NewBlogPost, NewSample, ServiceReply};
use girder_core::{
    Container, Controller, ControllerType, Error, HttpResponse, Injectable, Invocation, Namespace,
    async_trait,
};
use serde_json::{Value, json};

const MODEL_SOURCE: &str = "SeaORM model (SQLite)";

pub struct ModelDemo {
    service: DemoService,
}

impl Injectable for ModelDemo {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            service: container.resolve()?,
        })
    }
}

impl ModelDemo {
    async fn blog_posts(&self) -> Result<HttpResponse, Error> {
        let posts = self.service.get_blog_posts().await;
        HttpResponse::json(200, &json!({ "source": MODEL_SOURCE, "posts": posts }))
    }

    async fn recent_posts(&self) -> Result<HttpResponse, Error> {
        let posts = self.service.get_recent_blog_posts().await;
        HttpResponse::json(
            200,
            &json!({ "source": MODEL_SOURCE, "days": 30, "posts": posts }),
        )
    }

    async fn create_blog_post(&self) -> Result<HttpResponse, Error> {
        let post = self
            .service
            .create_blog_post(NewBlogPost {
                title: "New Post from Controller".to_string(),
                content: "This post was created through the SeaORM model from a controller."
                    .to_string(),
                author: Some("Demo Controller".to_string()),
                published_at: None,
            })
            .await;
        let status = if post.is_error() { 500 } else { 201 };
        HttpResponse::json(
            status,
            &json!({ "message": "Blog post created successfully", "post": post }),
        )
    }

    async fn samples(&self) -> Result<HttpResponse, Error> {
        let new_sample = self
            .service
            .create_sample(NewSample {
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                description: Some("A sample record created through the SeaORM model.".to_string()),
            })
            .await;
        let all_samples = self.service.get_samples().await;
        HttpResponse::json(
            200,
            &json!({
                "message": "Sample operations completed",
                "new_sample": new_sample,
                "all_samples": all_samples,
            }),
        )
    }

    async fn comparison(&self) -> Result<HttpResponse, Error> {
        let api_posts = match self.service.get_posts().await {
            ServiceReply::Data(Value::Array(posts)) => json!({
                "source": "JSONPlaceholder API",
                "count": posts.len(),
                "sample": posts.iter().take(2).collect::<Vec<_>>(),
            }),
            ServiceReply::Data(other) => json!({
                "source": "JSONPlaceholder API",
                "count": 0,
                "sample": other,
            }),
            ServiceReply::Error { error } => json!({
                "source": "JSONPlaceholder API",
                "count": 0,
                "error": error,
            }),
        };

        let model_posts = match self.service.get_blog_posts().await {
            ServiceReply::Data(posts) => json!({
                "source": MODEL_SOURCE,
                "count": posts.len(),
                "posts": posts,
            }),
            ServiceReply::Error { error } => json!({
                "source": MODEL_SOURCE,
                "count": 0,
                "error": error,
            }),
        };

        HttpResponse::json(
            200,
            &json!({ "api_posts": api_posts, "model_posts": model_posts }),
        )
    }
}

#[async_trait]
impl Controller for ModelDemo {
    fn default_method(&self, _request: &girder_core::HttpRequest) -> Option<&'static str> {
        Some("blogPosts")
    }

    async fn invoke(&self, method: &str, _call: Invocation) -> Result<HttpResponse, Error> {
        match method {
            "blogPosts" => self.blog_posts().await,
            "createBlogPost" => self.create_blog_post().await,
            "samples" => self.samples().await,
            "comparison" => self.comparison().await,
            "recentPosts" => self.recent_posts().await,
            other => Err(Error::MethodNotFound {
                controller: Self::key(),
                method: other.to_string(),
            }),
        }
    }
}

impl ControllerType for ModelDemo {
    const NAMESPACE: Namespace = Namespace::App;
    const NAME: &'static str = "ModelDemo";
    const METHODS: &'static [&'static str] = &[
        "blogPosts",
        "createBlogPost",
        "samples",
        "comparison",
        "recentPosts",
    ];
}
