//! Document server.
//!
//! Every request is a `GET` answered from the site root:
//!
//! - A path containing `.` names a static asset. It is served from the site
//!   root if it exists there, otherwise the answer is `404 File not found`.
//!   Paths that try to leave the root get the same 404.
//! - Any other path is resolved to a document by [`routes::resolve`] and
//!   that document's HTML file is returned.
//!
//! Other methods get `405`. Every response, errors included, carries
//! headers that forbid caching, so edits to the site root show up on the
//! next reload.

use crate::routes::{self, Resolution};
use axum::Router;
use axum::extract::State;
use axum::http::header::{self, HeaderValue};
use axum::http::{Method, StatusCode, Uri};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid bind address {addr}: {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Io(#[from] std::io::Error),
}

const NOT_FOUND_BODY: &str = "File not found";

#[derive(Clone)]
struct SiteState {
    root: Arc<PathBuf>,
}

/// Build the router serving `root`.
pub fn router(root: PathBuf) -> Router {
    Router::new()
        .fallback(handle)
        .layer(middleware::map_response(no_cache))
        .with_state(SiteState {
            root: Arc::new(root),
        })
}

/// Parse `host:port` into a socket address.
pub fn parse_addr(addr: &str) -> Result<SocketAddr, ServerError> {
    addr.parse().map_err(|source| ServerError::InvalidAddr {
        addr: addr.to_string(),
        source,
    })
}

/// Serve `root` on `addr` until SIGINT or SIGTERM.
pub async fn serve(addr: SocketAddr, root: PathBuf) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!(%addr, root = %root.display(), "repair-site listening");
    axum::serve(listener, router(root))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                    _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
                }
            }
            _ => {
                tracing::warn!("could not register signal handlers; waiting for ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received ctrl-c, shutting down");
    }
}

async fn handle(State(site): State<SiteState>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    if method != Method::GET {
        tracing::debug!(%method, path, status = 405, "rejected");
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET")],
            "Method not allowed",
        )
            .into_response();
    }

    let resolution = routes::resolve(path);
    let file = match resolution {
        Resolution::Document(doc) => Some(site.root.join(doc.file_name())),
        Resolution::Asset => asset_path(&site.root, path),
    };
    let response = match file {
        Some(file) => match tokio::fs::read(&file).await {
            Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&file))], bytes).into_response(),
            Err(err) => {
                if let Resolution::Document(doc) = resolution {
                    tracing::warn!(document = %doc, error = %err, "document missing from site root");
                }
                not_found()
            }
        },
        None => not_found(),
    };
    tracing::debug!(
        path,
        resolution = ?resolution,
        status = response.status().as_u16(),
        "request"
    );
    response
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

async fn no_cache(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

/// Map a request path onto a file below `root`. Returns `None` for paths
/// that would leave the root.
fn asset_path(root: &Path, path: &str) -> Option<PathBuf> {
    let mut file = root.to_path_buf();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == ".." || segment == "." || segment.contains('\\') {
            return None;
        }
        file.push(segment);
    }
    (file != root).then_some(file)
}

fn content_type(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
