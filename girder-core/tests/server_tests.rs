use girder_core::{
    Application, Container, Controller, ControllerType, Dispatcher, Error, HttpResponse,
    Injectable, Invocation, Namespace, async_trait,
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Echo;

impl Injectable for Echo {
    fn inject(_: &Container) -> Result<Self, Error> {
        Ok(Self)
    }
}

#[async_trait]
impl Controller for Echo {
    async fn invoke(&self, method: &str, call: Invocation) -> Result<HttpResponse, Error> {
        let input: Value = if call.request.body.is_empty() {
            Value::Null
        } else {
            call.request.json()?
        };
        HttpResponse::json(
            200,
            &json!({
                "method": method,
                "verb": call.request.method,
                "args": call.args,
                "query": call.request.query_params,
                "input": input,
            }),
        )
    }
}

impl ControllerType for Echo {
    const NAMESPACE: Namespace = Namespace::App;
    const NAME: &'static str = "Echo";
    const METHODS: &'static [&'static str] = &["save"];
}

fn dispatcher() -> Dispatcher {
    Dispatcher::builder(Container::new())
        .default_controller("Echo")
        .default_method("save")
        .register::<Echo>()
        .build()
}

struct Server {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), Error>>,
}

impl Server {
    async fn start(app: Application) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(app.serve(listener, async move {
            rx.await.ok();
        }));
        Self {
            addr,
            shutdown,
            handle,
        }
    }

    fn url(&self, target: &str) -> String {
        format!("http://{}{}", self.addr, target)
    }

    async fn stop(self) {
        self.shutdown.send(()).unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_post_json_over_tcp() {
    let server = Server::start(Application::new(dispatcher())).await;

    let response = reqwest::Client::new()
        .post(server.url("/echo/save/7?tag=a&next=http://x/y"))
        .json(&json!({"title": "Hello", "published": true}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["method"], "save");
    assert_eq!(body["verb"], "POST");
    assert_eq!(body["args"], json!(["7"]));
    assert_eq!(body["query"]["tag"], "a");
    assert_eq!(body["query"]["next"], "http://x/y");
    assert_eq!(body["input"]["title"], "Hello");
    assert_eq!(body["input"]["published"], true);

    server.stop().await;
}

#[tokio::test]
async fn test_unknown_route_over_tcp() {
    let server = Server::start(Application::new(dispatcher())).await;

    let response = reqwest::get(server.url("/nope/missing")).await.unwrap();
    assert_eq!(response.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = Server::start(Application::new(dispatcher()).body_limit(64)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/echo/save"))
        .body(vec![b'x'; 1024])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 413);

    let response = client
        .post(server.url("/echo/save"))
        .json(&json!({"ok": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    server.stop().await;
}
