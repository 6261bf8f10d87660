//! Development server - the `serve` subcommand.
//!
//! Serves a challenge directory on a local port, applying compiler
//! directives on-the-fly for every request so you always see the latest
//! version without an explicit build step. Built on `tiny_http`:
//!
//! - One handler thread per connection; requests never block each other
//! - Directive-bearing files are re-transformed on every request and sent
//!   with `Cache-Control: no-cache`
//! - `no_include` files and path-traversal attempts answer 404
//! - A directive failure produces a 500 for that request only; the server
//!   process and other connections are unaffected
//! - Graceful shutdown on Ctrl+C

use crate::config::SiteConfig;
use crate::directives::{self, DirectiveKind, listing};
use crate::log;
use crate::utils::url_prefix_for;
use anyhow::{Context, Result, anyhow};
use std::{
    borrow::Cow,
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the dev server rooted at `source`, blocking until Ctrl+C.
pub fn serve_site(source: &Path, config: &'static SiteConfig) -> Result<()> {
    let root: Arc<PathBuf> = Arc::new(
        source
            .canonicalize()
            .with_context(|| format!("source directory {} does not exist", source.display()))?,
    );

    let interface: std::net::IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("invalid interface {}", config.serve.interface))?;
    let addr = SocketAddr::new(interface, config.serve.port);
    let server =
        Arc::new(Server::http(addr).map_err(|e| anyhow!("failed to bind {addr}: {e}"))?);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "serving {} at http://{addr}  (Ctrl+C to stop)", root.display());

    // One thread per connection; per-request state is local, the only
    // shared data is the read-only source tree and the memoized assets
    for request in server.incoming_requests() {
        let root = Arc::clone(&root);
        thread::spawn(move || handle_request(request, &root, config));
    }

    Ok(())
}

// ============================================================================
// Request Handling
// ============================================================================

/// Handle a single HTTP request.
///
/// Resolution order:
/// 1. Traversal outside the root -> 404
/// 2. Directory without trailing slash -> 301 adding one
/// 3. Directory with index.html -> that file; without -> built-in listing
/// 4. `no_include` file -> 404
/// 5. Directive file -> transform, serve uncached
/// 6. Anything else -> plain file served as-is
fn handle_request(request: Request, root: &Path, config: &SiteConfig) {
    let url = request.url().to_owned();
    let (raw_path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url.as_str(), None),
    };
    let decoded = urlencoding::decode(raw_path)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw_path.to_owned());

    let Some(mut local_path) = resolve_path(root, &decoded) else {
        log!("serve"; "{} {}  -> 404 (outside root)", request.method(), decoded);
        respond_not_found(request);
        return;
    };

    if local_path.is_dir() {
        // Redirect to add a trailing slash (matches nginx behaviour and
        // makes relative links in directory listings resolve correctly)
        if !decoded.ends_with('/') {
            let location = match query {
                Some(query) => format!("{decoded}/?{query}"),
                None => format!("{decoded}/"),
            };
            respond_redirect(request, &location);
            return;
        }

        let index = local_path.join("index.html");
        if index.is_file() {
            local_path = index;
        } else {
            // No index - fall back to the built-in directory listing
            log!("serve"; "{} {}  [listing]", request.method(), decoded);
            match listing::render(&local_path, None, &decoded) {
                Ok(html) => respond_html(request, html),
                Err(err) => respond_server_error(request, &err),
            }
            return;
        }
    }

    if !local_path.is_file() {
        log!("serve"; "{} {}  -> 404", request.method(), decoded);
        respond_not_found(request);
        return;
    }

    match directives::detect(&local_path) {
        Some(DirectiveKind::NoInclude) => {
            log!("serve"; "{} {}  -> 404 (no_include)", request.method(), decoded);
            respond_not_found(request);
        }
        None => {
            log!("serve"; "{} {}", request.method(), decoded);
            serve_plain_file(request, &local_path);
        }
        Some(kind) => {
            log!("serve"; "{} {}  [{}]", request.method(), decoded, kind.name());
            let rel = local_path.strip_prefix(root).unwrap_or(&local_path);
            let url_prefix = url_prefix_for(rel);
            match directives::apply(kind, &local_path, &url_prefix, config) {
                Ok(body) => respond_transformed(request, &local_path, body),
                Err(err) => respond_server_error(request, &err),
            }
        }
    }
}

/// Map a decoded URL path to a filesystem path strictly under `root`.
///
/// Any `..` component rejects the request outright; symlinks that resolve
/// outside the root are rejected after canonicalization. Returns `None`
/// for rejected paths, which callers answer with 404.
fn resolve_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for part in url_path.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return None;
        }
        resolved.push(part);
    }

    match resolved.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Some(canonical),
        Ok(_) => None,
        // Nonexistent paths cannot escape; let them 404 naturally
        Err(_) => Some(resolved),
    }
}

// ============================================================================
// Response Helpers
// ============================================================================
//
// All `respond` calls swallow their result: a failure here means the
// client hung up mid-write, which is a normal connection close, not a
// server fault.

/// Serve a no-directive file as-is with standard caching semantics.
fn serve_plain_file(request: Request, path: &Path) {
    match fs::read(path) {
        Ok(content) => {
            let response = Response::from_data(content)
                .with_header(content_type_header(path));
            request.respond(response).ok();
        }
        Err(_) => respond_not_found(request),
    }
}

/// Serve freshly transformed directive output: exact length, no caching.
fn respond_transformed(request: Request, path: &Path, body: String) {
    let response = Response::from_string(body)
        .with_header(content_type_header(path))
        .with_header(Header::from_bytes("Cache-Control", "no-cache").unwrap());
    request.respond(response).ok();
}

/// Serve generated HTML (the fallback directory listing).
fn respond_html(request: Request, content: String) {
    let response = Response::from_string(content)
        .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap())
        .with_header(Header::from_bytes("Cache-Control", "no-cache").unwrap());
    request.respond(response).ok();
}

/// 301 redirect appending a trailing slash.
fn respond_redirect(request: Request, location: &str) {
    let response = Response::empty(StatusCode(301))
        .with_header(Header::from_bytes("Location", location).unwrap());
    request.respond(response).ok();
}

/// 404 Not Found.
fn respond_not_found(request: Request) {
    let response = Response::from_string("404 Not Found")
        .with_status_code(StatusCode(404))
        .with_header(Header::from_bytes("Content-Type", "text/plain").unwrap());
    request.respond(response).ok();
}

/// 500 carrying the directive error detail; the process keeps running.
fn respond_server_error(request: Request, err: &anyhow::Error) {
    log!("error"; "directive error: {err:#}");
    let response = Response::from_string(format!("500 Internal Server Error\n\n{err:#}\n"))
        .with_status_code(StatusCode(500))
        .with_header(Header::from_bytes("Content-Type", "text/plain").unwrap());
    request.respond(response).ok();
}

// ============================================================================
// Content Type Detection
// ============================================================================

fn content_type_header(path: &Path) -> Header {
    Header::from_bytes("Content-Type", guess_content_type(path)).unwrap()
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",

        // Default binary
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Tests
// ============================================================================
