//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, response finalization, and access logging.

use crate::config::Config;
use crate::handler::static_files;
use crate::http::{self, no_cache};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context handed to the static file handlers
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    cfg: Arc<Config>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = access_entry_for(&req, peer_addr);

    let mut response = dispatch(&req, &cfg).await;
    finalize(&mut response, &cfg);

    if cfg.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes =
            usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(0);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &cfg.logging.access_log_format);
    }

    Ok(response)
}

/// Route the request to the matching builder
async fn dispatch(req: &Request<Incoming>, cfg: &Arc<Config>) -> Response<Full<Bytes>> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method) {
        return resp;
    }

    // 2. Check declared body size
    let content_length = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok());
    if let Some(resp) = check_body_size(content_length, cfg.http.max_body_size) {
        return resp;
    }

    // 3. Everything else resolves against the site root
    let ctx = RequestContext { path, is_head };
    static_files::serve(&ctx, &cfg.site.root, &cfg.site.index_files).await
}

/// Append the headers every response carries, whatever its status: the
/// cache-disabling triple and the Server name.
fn finalize(response: &mut Response<Full<Bytes>>, cfg: &Config) {
    no_cache::apply(response.headers_mut());

    if let Ok(name) = HeaderValue::from_str(&cfg.http.server_name) {
        response.headers_mut().insert(SERVER, name);
    }
}

/// Check HTTP method and return the response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate the Content-Length header and return 413 if it exceeds the limit
fn check_body_size(content_length: Option<&str>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size_str = content_length?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

/// Capture the request-side fields of the access log entry before the
/// request is consumed by dispatch
fn access_entry_for(req: &Request<Incoming>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header_str(req, "referer");
    entry.user_agent = header_str(req, "user-agent");
    entry
}

fn header_str(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
