//! In-process stand-in for the naughty-or-nice service. Classified children queue up in
//! submission order and each `/check` reports (and removes) the oldest one; an empty
//! queue answers 404.

use hyper::{
    body,
    header::CONTENT_TYPE,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};
use serde_json::{json, Value};
use std::{
    collections::VecDeque,
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::{sync::oneshot, task::JoinHandle};

#[derive(Debug, Clone)]
struct Classification {
    name: String,
    status: &'static str,
}

#[derive(Debug, Clone)]
struct StubState {
    classified: Arc<Mutex<VecDeque<Classification>>>,
    content_type: Arc<String>,
}

pub struct SantaStub {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl SantaStub {
    /// Starts the stub on an ephemeral localhost port.
    pub async fn start() -> Result<Self, hyper::Error> {
        Self::start_with_content_type("application/json; charset=utf-8").await
    }

    /// Starts a stub that labels every json response with `content_type`.
    pub async fn start_with_content_type(content_type: &str) -> Result<Self, hyper::Error> {
        let state = StubState {
            classified: Arc::new(Mutex::new(VecDeque::new())),
            content_type: Arc::new(content_type.into()),
        };

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let server = Server::try_bind(&addr)?.serve(make_service_fn(move |_| {
            let state = state.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req| handle_request(state.clone(), req)))
            }
        }));

        let base_url = format!("http://{}", server.local_addr());
        let (shutdown, shutdown_signal) = oneshot::channel();
        let server = server.with_graceful_shutdown(async {
            let _ = shutdown_signal.await;
        });

        let join_handle = tokio::spawn(async move {
            if let Err(e) = server.await {
                eprintln!("Santa stub error: {}", e);
            }
        });

        Ok(Self {
            base_url,
            shutdown: Some(shutdown),
            join_handle: Some(join_handle),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join_handle) = self.join_handle.take() {
            let _ = join_handle.await;
        }
    }
}

impl Drop for SantaStub {
    fn drop(&mut self) {
        if let Some(join_handle) = self.join_handle.take() {
            join_handle.abort();
        }
    }
}

async fn handle_request(
    state: StubState,
    request: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let body = body::to_bytes(request.into_body())
        .await
        .unwrap_or_default();

    let response = match (method, path.as_str()) {
        (Method::POST, "/naughty") => classify(&state, &body, "naughty"),
        (Method::POST, "/nice") => classify(&state, &body, "nice"),
        (Method::GET, "/check") => {
            let next = state.classified.lock().unwrap().pop_front();
            match next {
                Some(Classification { name, status }) => json_response(
                    &state,
                    StatusCode::OK,
                    json!({ "name": name, "status": status }),
                ),
                None => json_response(
                    &state,
                    StatusCode::NOT_FOUND,
                    json!({ "error": "nobody has been classified yet" }),
                ),
            }
        }
        _ => json_response(&state, StatusCode::NOT_FOUND, json!({ "error": "not found" })),
    };

    Ok(response)
}

fn classify(state: &StubState, body: &[u8], status: &'static str) -> Response<Body> {
    let name = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| value.get("name").and_then(Value::as_str).map(String::from));

    match name {
        Some(name) => {
            state.classified.lock().unwrap().push_back(Classification {
                name: name.clone(),
                status,
            });
            json_response(state, StatusCode::OK, json!({ "name": name }))
        }
        None => json_response(
            state,
            StatusCode::BAD_REQUEST,
            json!({ "error": "a name is required" }),
        ),
    }
}

fn json_response(state: &StubState, status: StatusCode, body: Value) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    if let Ok(content_type) = state.content_type.parse() {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}
