use girder_core::{
    Container, Controller, ControllerType, Dispatcher, Error, HttpRequest, HttpResponse,
    Injectable, Invocation, Namespace, async_trait, rest_method,
};
use serde_json::{Value, json};

#[derive(Clone)]
struct Greeting(String);

struct Home {
    greeting: Greeting,
}

impl Injectable for Home {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            greeting: container.resolve()?,
        })
    }
}

#[async_trait]
impl Controller for Home {
    async fn invoke(&self, method: &str, call: Invocation) -> Result<HttpResponse, Error> {
        match method {
            "main" => HttpResponse::json(
                200,
                &json!({"method": "main", "greeting": self.greeting.0, "args": call.args}),
            ),
            "about" => HttpResponse::json(200, &json!({"method": "about", "args": call.args})),
            other => Err(Error::Internal(format!("unexpected {}", other))),
        }
    }
}

impl ControllerType for Home {
    const NAMESPACE: Namespace = Namespace::App;
    const NAME: &'static str = "Home";
    const METHODS: &'static [&'static str] = &["main", "about"];
}

#[derive(Default)]
struct ModelDemo;

impl Injectable for ModelDemo {
    fn inject(_: &Container) -> Result<Self, Error> {
        Ok(Self)
    }
}

#[async_trait]
impl Controller for ModelDemo {
    async fn invoke(&self, method: &str, call: Invocation) -> Result<HttpResponse, Error> {
        HttpResponse::json(
            200,
            &json!({"method": method, "args": call.args, "query": call.request.query_params}),
        )
    }
}

impl ControllerType for ModelDemo {
    const NAMESPACE: Namespace = Namespace::App;
    const NAME: &'static str = "ModelDemo";
    const METHODS: &'static [&'static str] = &["blogPosts", "broken"];
}

struct Sample;

impl Injectable for Sample {
    fn inject(_: &Container) -> Result<Self, Error> {
        Ok(Self)
    }
}

#[async_trait]
impl Controller for Sample {
    fn default_method(&self, request: &HttpRequest) -> Option<&'static str> {
        rest_method(request)
    }

    async fn invoke(&self, method: &str, call: Invocation) -> Result<HttpResponse, Error> {
        HttpResponse::json(200, &json!({"method": method, "args": call.args}))
    }
}

impl ControllerType for Sample {
    const NAMESPACE: Namespace = Namespace::Api;
    const NAME: &'static str = "Sample";
    const METHODS: &'static [&'static str] =
        &["show", "create", "update", "delete", "search", "stats"];
    const ROUTES: &'static [(&'static str, &'static str)] = &[
        ("/api/sample/search", "search"),
        ("/api/sample/stats", "stats"),
    ];
}

fn dispatcher(diagnostics: bool) -> Dispatcher {
    let container = Container::new();
    container.bind(|| Greeting("hello".into()));

    Dispatcher::builder(container)
        .default_controller("Home")
        .default_method("main")
        .alias("demo", "ModelDemo")
        .diagnostics(diagnostics)
        .register::<Home>()
        .register::<ModelDemo>()
        .register::<Sample>()
        .build()
}

async fn call(method: &str, uri: &str) -> (u16, Value) {
    let response = dispatcher(false)
        .dispatch(HttpRequest::new(method, uri))
        .await;
    let body = serde_json::from_slice(&response.body).unwrap_or(Value::Null);
    (response.status, body)
}

#[tokio::test]
async fn test_root_dispatches_default_method() {
    let (status, body) = call("GET", "/").await;
    assert_eq!(status, 200);
    assert_eq!(body["method"], "main");
    assert_eq!(body["greeting"], "hello");
}

#[tokio::test]
async fn test_default_controller_method_from_root() {
    let (status, body) = call("GET", "/about/extra").await;
    assert_eq!(status, 200);
    assert_eq!(body["method"], "about");
    assert_eq!(body["args"], json!(["extra"]));
}

#[tokio::test]
async fn test_lowercase_controller_segment() {
    let (status, body) = call("GET", "/home/about").await;
    assert_eq!(status, 200);
    assert_eq!(body["method"], "about");
}

#[tokio::test]
async fn test_alias_and_case_insensitive_method() {
    let (status, body) = call("GET", "/demo/BLOGPOSTS/7?page=2").await;
    assert_eq!(status, 200);
    assert_eq!(body["method"], "blogPosts");
    assert_eq!(body["args"], json!(["7"]));
    assert_eq!(body["query"]["page"], "2");
}

#[tokio::test]
async fn test_unknown_method_falls_back_to_default_with_all_args() {
    // ModelDemo has no `main`, so the configured default is missing.
    let (status, _) = call("GET", "/ModelDemo/nothing").await;
    assert_eq!(status, 404);

    let (status, body) = call("GET", "/Home/42").await;
    assert_eq!(status, 200);
    assert_eq!(body["method"], "main");
    assert_eq!(body["args"], json!(["42"]));
}

#[tokio::test]
async fn test_rest_verbs_select_methods() {
    let (_, body) = call("GET", "/api/sample").await;
    assert_eq!(body["method"], "show");
    assert_eq!(body["args"], json!([]));

    let (_, body) = call("GET", "/api/sample/5").await;
    assert_eq!(body["method"], "show");
    assert_eq!(body["args"], json!(["5"]));

    let (_, body) = call("POST", "/api/sample").await;
    assert_eq!(body["method"], "create");

    let (_, body) = call("PUT", "/api/sample/5").await;
    assert_eq!(body["method"], "update");
    assert_eq!(body["args"], json!(["5"]));

    let (_, body) = call("PATCH", "/api/sample/5").await;
    assert_eq!(body["method"], "update");

    let (_, body) = call("DELETE", "/api/sample/5").await;
    assert_eq!(body["method"], "delete");
}

#[tokio::test]
async fn test_route_table_takes_priority() {
    let (status, body) = call("GET", "/api/sample/search?q=john").await;
    assert_eq!(status, 200);
    assert_eq!(body["method"], "search");
    assert_eq!(body["args"], json!([]));

    let (_, body) = call("GET", "/index.php/api/sample/stats").await;
    assert_eq!(body["method"], "stats");
}

#[tokio::test]
async fn test_unknown_controller_is_404() {
    let (status, body) = call("GET", "/Nope").await;
    assert_eq!(status, 404);
    assert_eq!(body["status"], 404);

    // App controllers are not reachable through the API namespace.
    let (status, _) = call("GET", "/api/Home").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_api_alone_is_400() {
    let (status, body) = call("GET", "/api").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("Invalid route"));
}

#[tokio::test]
async fn test_unsupported_verb_without_default_is_404() {
    let (status, _) = call("OPTIONS", "/api/sample").await;
    // Falls back to the configured `main`, which Sample does not expose.
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_missing_dependency_renders_500() {
    let container = Container::new();
    let dispatcher = Dispatcher::builder(container).register::<Home>().build();

    let request = HttpRequest::new("GET", "/");
    assert!(matches!(
        dispatcher.try_dispatch(request.clone()).await,
        Err(Error::UnresolvableDependency { .. })
    ));

    let response = dispatcher.dispatch(request).await;
    assert_eq!(response.status, 500);
    let body = String::from_utf8(response.body).unwrap();
    assert!(!body.contains("Greeting"));
}

#[tokio::test]
async fn test_diagnostics_render_html() {
    let container = Container::new();
    let dispatcher = Dispatcher::builder(container)
        .diagnostics(true)
        .register::<Home>()
        .build();

    let response = dispatcher.dispatch(HttpRequest::new("GET", "/")).await;
    assert_eq!(response.status, 500);
    assert!(
        response
            .headers
            .get("Content-Type")
            .unwrap()
            .starts_with("text/html")
    );
    assert!(String::from_utf8(response.body).unwrap().contains("Greeting"));
}

#[test]
fn test_registry_contents() {
    let dispatcher = dispatcher(false);
    let keys: Vec<_> = dispatcher
        .registry()
        .entries()
        .iter()
        .map(|e| e.key.clone())
        .collect();

    assert_eq!(
        keys,
        ["controllers::Home", "controllers::ModelDemo", "controllers::api::Sample"]
    );
    assert!(dispatcher.container().has("controllers::api::Sample"));
    assert_eq!(dispatcher.resolver().default_controller(), "Home");
}
