//! HTTP server and graceful shutdown.
//!
//! The server reacts to **SIGTERM** or Ctrl-C by:
//! 1. Immediately stopping `listener.accept()`, so no new connections are made.
//! 2. Telling every open connection to finish its in-flight request and close.
//!    Idle keep-alive connections close at once.
//! 3. Waiting up to [`DRAIN_TIMEOUT`] for them, then dropping the stragglers.
//! 4. Returning from [`Server::serve`], which lets `main` exit cleanly.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::fault::Fault;
use crate::method::Method;
use crate::middleware::{MAX_BODY_BYTES, too_large};
use crate::request::Request;
use crate::router::{NOT_FOUND_MESSAGE, Router};

/// How long open connections get to finish after a shutdown signal.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve<S>(self, router: Router<S>) -> Result<(), Error>
    where
        S: Clone + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "campsite listening");
        serve_on(listener, router, shutdown_signal()).await;
        Ok(())
    }
}

/// Accept loop over an already-bound `listener`, stopping when `shutdown`
/// resolves.
async fn serve_on<S>(listener: TcpListener, router: Router<S>, shutdown: impl Future<Output = ()>)
where
    S: Clone + Send + Sync + 'static,
{
    // Shared across connection tasks without copying the routing table.
    let router = Arc::new(router);
    let builder = ConnBuilder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();

    // JoinSet owns every connection task; dropping it aborts whatever is left.
    let mut tasks = tokio::task::JoinSet::new();

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // Check shutdown first so a SIGTERM immediately stops
            // accepting new connections, even if more are queued.
            biased;

            () = &mut shutdown => {
                info!(in_flight = graceful.count(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let router = Arc::clone(&router);

                // Called once per request on the connection.
                let svc = service_fn(move |req| {
                    let router = Arc::clone(&router);
                    async move { dispatch(router, req).await }
                });

                // Serves HTTP/1.1 and HTTP/2, whichever the client speaks.
                let conn = builder.serve_connection(TokioIo::new(stream), svc).into_owned();
                let conn = graceful.watch(conn);

                tasks.spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the JoinSet does not grow
            // without bound on long-running servers.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    drop(listener);

    tokio::select! {
        () = graceful.shutdown() => info!("campsite stopped"),
        () = tokio::time::sleep(DRAIN_TIMEOUT) => {
            warn!(remaining = tasks.len(), "drain timed out, closing remaining connections");
        }
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Converts one hyper request, routes it, and converts the response back.
///
/// The error type is [`Infallible`](std::convert::Infallible): every failure,
/// including an unknown method or an unreadable body, is a [`Fault`] rendered
/// by the router's terminal fault handler.
async fn dispatch<S>(
    router: Arc<Router<S>>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible>
where
    S: Clone + Send + Sync + 'static,
{
    let response = match into_request(req).await {
        Ok(req) => router.dispatch(req).await,
        Err(fault) => router.fault(fault),
    };
    Ok(response.into_inner())
}

async fn into_request(req: hyper::Request<hyper::body::Incoming>) -> Result<Request, Fault> {
    let (parts, body) = req.into_parts();

    let Ok(method) = parts.method.as_str().parse::<Method>() else {
        return Err(Fault::not_found(NOT_FOUND_MESSAGE));
    };
    let target = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());

    let body = Limited::new(body, MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                too_large()
            } else {
                Fault::bad_request(format!("Failed to read request body: {e}"))
            }
        })?
        .to_bytes();

    let mut request = Request::new(method, target).body(body);
    for (name, value) in &parts.headers {
        match value.to_str() {
            Ok(value) => request = request.header(name.as_str(), value),
            Err(_) => warn!(header = %name, "ignoring non-ASCII request header"),
        }
    }
    Ok(request)
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C).
/// On Windows only Ctrl-C is available. If a handler cannot be installed the
/// corresponding arm never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    // `pending()` never resolves, so on non-Unix platforms the SIGTERM arm is
    // effectively disabled.
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
