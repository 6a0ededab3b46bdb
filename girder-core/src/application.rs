// HTTP server around a Dispatcher

use crate::{Dispatcher, Error, HttpRequest, HttpResponse};
use girder_log::{debug, info, warn};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, body::Incoming as IncomingBody};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Request bodies larger than this are answered with 413.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Serves a [`Dispatcher`] over HTTP/1.1, one task per connection.
pub struct Application {
    dispatcher: Arc<Dispatcher>,
    body_limit: usize,
}

impl Application {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Largest request body read, in bytes.
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Serve until Ctrl-C.
    pub async fn listen(self, addr: SocketAddr) -> Result<(), Error> {
        self.listen_with_shutdown(addr, async {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("Unable to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until `shutdown` completes. In-flight connections are left to
    /// finish on their own tasks.
    pub async fn listen_with_shutdown<F>(self, addr: SocketAddr, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send,
    {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on http://{}", listener.local_addr()?);
        self.serve(listener, shutdown).await
    }

    /// Accept loop on an already bound listener.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => {
                    info!("Shutting down");
                    return Ok(());
                }
            };
            debug!("Accepted connection from {}", peer);

            let io = TokioIo::new(stream);
            let dispatcher = self.dispatcher.clone();
            let body_limit = self.body_limit;

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<IncomingBody>| {
                    let dispatcher = dispatcher.clone();
                    async move { handle_request(req, dispatcher, body_limit).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    warn!("Error serving connection: {}", err);
                }
            });
        }
    }
}

async fn handle_request(
    req: Request<IncomingBody>,
    dispatcher: Arc<Dispatcher>,
    body_limit: usize,
) -> Result<Response<Full<bytes::Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let mut request = HttpRequest::new(parts.method.to_string(), target);
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            request
                .headers
                .insert(name.as_str().to_string(), value.to_string());
        }
    }

    request.body = match Limited::new(body, body_limit).collect().await {
        Ok(collected) => collected.to_bytes().to_vec(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            warn!("{} {}: body over {} bytes", request.method, request.uri, body_limit);
            return Ok(into_hyper(HttpResponse::new(413)));
        }
        Err(err) => {
            warn!("{} {}: failed to read body: {}", request.method, request.uri, err);
            return Ok(into_hyper(HttpResponse::bad_request()));
        }
    };

    let response = dispatcher.dispatch(request).await;
    Ok(into_hyper(response))
}

fn into_hyper(response: HttpResponse) -> Response<Full<bytes::Bytes>> {
    let mut builder = Response::builder().status(response.status);
    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    builder
        .body(Full::new(bytes::Bytes::from(response.body)))
        .unwrap_or_else(|err| {
            warn!("Invalid response parts: {}", err);
            let mut fallback = Response::new(Full::new(bytes::Bytes::new()));
            *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
