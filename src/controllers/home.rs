// Default controller: the HTML landing page

use crate::services::{DemoService, ServiceReply};
use crate::views::Views;
use girder_config::ConfigStore;
use girder_core::{
    Container, Controller, ControllerType, Error, HttpResponse, Injectable, Invocation, Namespace,
    async_trait,
};
use serde_json::{Value, json};
use std::sync::Arc;

const POSTS_SHOWN: usize = 10;

pub struct Home {
    service: DemoService,
    views: Views,
    app_name: String,
}

impl Injectable for Home {
    fn inject(container: &Container) -> Result<Self, Error> {
        let config: Arc<ConfigStore> = container.resolve()?;
        Ok(Self {
            service: container.resolve()?,
            views: container.resolve()?,
            app_name: config.get_or("app.name", "girder").to_string(),
        })
    }
}

impl Home {
    async fn main(&self) -> Result<HttpResponse, Error> {
        let data = match self.service.get_posts().await {
            ServiceReply::Data(posts) => {
                let posts: Vec<Value> = posts
                    .as_array()
                    .map(|all| all.iter().take(POSTS_SHOWN).cloned().collect())
                    .unwrap_or_default();
                json!({ "app_name": self.app_name, "posts": posts })
            }
            ServiceReply::Error { error } => json!({ "app_name": self.app_name, "error": error }),
        };
        Ok(HttpResponse::html(self.views.render("home", &data)?))
    }
}

#[async_trait]
impl Controller for Home {
    async fn invoke(&self, method: &str, _call: Invocation) -> Result<HttpResponse, Error> {
        match method {
            "main" => self.main().await,
            other => Err(Error::MethodNotFound {
                controller: Self::key(),
                method: other.to_string(),
            }),
        }
    }
}

impl ControllerType for Home {
    const NAMESPACE: Namespace = Namespace::App;
    const NAME: &'static str = "Home";
    const METHODS: &'static [&'static str] = &["main"];
}
