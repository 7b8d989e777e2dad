
use crate::{
    dispatcher::{Dispatch, Dispatcher},
    github::{EventHeaders, Payload},
    Error, Result,
};
use futures::future;
use hyper::{
    body,
    header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE},
    server::conn::AddrStream,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server as HyperServer, StatusCode,
};
use log::{error, info, trace, warn};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

#[derive(Clone, Debug)]
pub struct Server {
    counter: Arc<AtomicUsize>,
    dispatcher: Dispatcher,
    /// Deadline for running every listener of a single delivery
    dispatch_timeout: Duration,
}

impl Server {
    pub fn new(dispatcher: Dispatcher, dispatch_timeout: Duration) -> Self {
        Self {
            counter: Arc::new(AtomicUsize::new(0)),
            dispatcher,
            dispatch_timeout,
        }
    }

    pub async fn start(self, addr: SocketAddr) -> Result<()> {
        // The closure inside `make_service_fn` is run for each connection,
        // creating a 'service' to handle requests for that specific connection.
        let make_service = make_service_fn(move |socket: &AddrStream| {
            trace!("remote address: {:?}", socket.remote_addr());

            // While the server was moved into the make_service closure,
            // we need to clone it here because this closure is called
            // once for every connection.
            let server = self.clone();

            // This is the `Service` that will handle the connection.
            future::ok::<_, Error>(service_fn(move |request| {
                let server = server.clone();
                server.serve(request)
            }))
        });

        info!("Listening on http://{}", addr);
        HyperServer::try_bind(&addr)?.serve(make_service).await?;

        Ok(())
    }

    async fn serve(self, request: Request<Body>) -> Result<Response<Body>> {
        self.counter.fetch_add(1, Ordering::AcqRel);
        self.route_http_request(request).await
    }

    async fn route_http_request(&self, request: Request<Body>) -> Result<Response<Body>> {
        match (request.method(), request.uri().path()) {
            (&Method::GET, "/") => {
                let count = self.counter.load(Ordering::Relaxed);
                let response = Response::new(Body::from(format!("Request #{}\n", count)));
                Ok(response)
            }
            (&Method::GET, "/github") => Ok(Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .body(Body::empty())?),
            (&Method::POST, "/github") => self.route_github(request).await,
            _ => Ok(Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::empty())?),
        }
    }

    async fn route_github(&self, request: Request<Body>) -> Result<Response<Body>> {
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.uri().path(), "/github");

        // Webhooks from github should only contain json payloads
        if !is_json(request.headers().get(CONTENT_TYPE)) {
            warn!("rejecting webhook: unknown content type");
            return Ok(Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .body(Body::empty())?);
        }

        let (parts, body) = request.into_parts();
        let payload = Payload::new(body::to_bytes(body).await?);

        if let Some(delivery_id) = parts.headers.delivery_id() {
            trace!("Handling Webhook: {}", delivery_id);
        }

        let dispatch = tokio::time::timeout(
            self.dispatch_timeout,
            self.dispatcher.route_and_handle(&parts.headers, &payload),
        )
        .await;

        match dispatch {
            Ok(Dispatch::Handled { event, report }) if !report.is_ok() => {
                warn!(
                    "{}: {} of {} listeners failed",
                    event,
                    report.failures.len(),
                    report.invoked
                );
            }
            Ok(_) => {}
            Err(_) => {
                error!(
                    "dispatch timed out after {:?}, delivery {:?}",
                    self.dispatch_timeout,
                    parts.headers.delivery_id()
                );
                return Ok(Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::empty())?);
            }
        }

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/plain")
            .header(CONTENT_LENGTH, 2)
            .body(Body::from("OK"))?)
    }
}

fn is_json(content_type: Option<&HeaderValue>) -> bool {
    match content_type.map(HeaderValue::to_str) {
        Some(Ok(content_type)) => content_type
            .split(';')
            .next()
            .map(str::trim)
            .map_or(false, |mime| mime.eq_ignore_ascii_case("application/json")),
        _ => false,
    }
}
