// Read-only proxy of the JSONPlaceholder API

use crate::services::{DemoService, ServiceReply};
use girder_core::{
    Container, Controller, ControllerType, Error, HttpRequest, HttpResponse, Injectable,
    Invocation, Namespace, async_trait, rest_method,
};
use serde_json::{Value, json};

pub struct Posts {
    service: DemoService,
}

impl Injectable for Posts {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            service: container.resolve()?,
        })
    }
}

fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.parse()
        .map_err(|_| Error::BadRequest(format!("`{}` is not a numeric id", raw)))
}

/// Upstream data as-is; upstream failures become 502 `{error}`.
fn reply(result: ServiceReply<Value>) -> Result<HttpResponse, Error> {
    match result {
        ServiceReply::Data(data) => HttpResponse::json(200, &data),
        ServiceReply::Error { error } => HttpResponse::json(502, &json!({ "error": error })),
    }
}

impl Posts {
    async fn show(&self, id: Option<&str>) -> Result<HttpResponse, Error> {
        match id {
            Some(raw) => reply(self.service.get_post(parse_id(raw)?).await),
            None => reply(self.service.get_posts().await),
        }
    }

    async fn users(&self, id: Option<&str>) -> Result<HttpResponse, Error> {
        match id {
            Some(raw) => reply(self.service.get_user(parse_id(raw)?).await),
            None => reply(self.service.get_users().await),
        }
    }

    async fn comments(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let post_id = match request.query("postId") {
            Some(raw) if !raw.is_empty() => Some(parse_id(raw)?),
            _ => None,
        };
        reply(self.service.get_comments(post_id).await)
    }
}

#[async_trait]
impl Controller for Posts {
    fn default_method(&self, request: &HttpRequest) -> Option<&'static str> {
        rest_method(request)
    }

    async fn invoke(&self, method: &str, call: Invocation) -> Result<HttpResponse, Error> {
        match method {
            "show" => self.show(call.arg(0)).await,
            "users" => self.users(call.arg(0)).await,
            "comments" => self.comments(&call.request).await,
            other => Err(Error::MethodNotFound {
                controller: Self::key(),
                method: other.to_string(),
            }),
        }
    }
}

impl ControllerType for Posts {
    const NAMESPACE: Namespace = Namespace::Api;
    const NAME: &'static str = "Posts";
    const METHODS: &'static [&'static str] = &["show", "users", "comments"];
}
