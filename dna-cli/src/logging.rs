#![allow(clippy::print_stderr)]

use std::io::IsTerminal;
use std::time::Instant;

use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use chrono::Local;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects the level
/// (0 = warn, 1 = info, 2+ = debug). Calling this twice is a no-op.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

// ANSI color codes
struct Colors {
    reset: &'static str,
    dim: &'static str,
    green: &'static str,
    yellow: &'static str,
    red: &'static str,
    cyan: &'static str,
    blue: &'static str,
    magenta: &'static str,
    gray: &'static str,
}

impl Colors {
    fn detect() -> Self {
        if std::io::stderr().is_terminal() {
            Self {
                reset: "\x1b[0m",
                dim: "\x1b[2m",
                green: "\x1b[92m",
                yellow: "\x1b[93m",
                red: "\x1b[91m",
                cyan: "\x1b[96m",
                blue: "\x1b[94m",
                magenta: "\x1b[95m",
                gray: "\x1b[90m",
            }
        } else {
            Self {
                reset: "",
                dim: "",
                green: "",
                yellow: "",
                red: "",
                cyan: "",
                blue: "",
                magenta: "",
                gray: "",
            }
        }
    }

    fn status_color(&self, status: StatusCode) -> &'static str {
        if status.is_success() {
            self.green
        } else if status.is_redirection() {
            self.yellow
        } else {
            self.red
        }
    }

    fn body(&self, label: &str, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        let (label, text) = if let Ok(json) = serde_json::from_slice::<serde_json::Value>(bytes) {
            (
                label.to_owned(),
                serde_json::to_string_pretty(&json).unwrap_or_default(),
            )
        } else {
            (
                format!("{label} (raw)"),
                String::from_utf8_lossy(bytes).into_owned(),
            )
        };
        eprintln!(
            "{timestamp} - DEBUG - {}{label}:{}\n{}{text}{}",
            self.dim, self.reset, self.gray, self.reset
        );
    }
}

/// Request logging for the HTTP transport.
///
/// Verbosity 1 logs one summary line per request; 2 and above also dump
/// request and response bodies. Output bypasses `tracing` so the color
/// codes reach the terminal unescaped.
#[derive(Debug, Clone, Copy)]
pub struct LoggingMiddleware {
    pub verbose: u8,
}

impl LoggingMiddleware {
    #[must_use]
    pub fn new(verbose: u8) -> Self {
        Self { verbose }
    }

    pub async fn handle(self, request: Request, next: Next) -> Response {
        if self.verbose == 0 {
            return next.run(request).await;
        }

        let colors = Colors::detect();
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        let start = Instant::now();

        let response = if self.verbose >= 2 {
            let (parts, body) = request.into_parts();
            let bytes = axum::body::to_bytes(body, usize::MAX)
                .await
                .unwrap_or_default();
            colors.body("Request body", &bytes);
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        } else {
            next.run(request).await
        };

        let status = response.status();
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        eprintln!(
            "{timestamp} - INFO - {}{method}{} {}{path}{} -> {}{}{} in {}{duration_ms:.1}ms{}",
            colors.cyan,
            colors.reset,
            colors.blue,
            colors.reset,
            colors.status_color(status),
            status.as_u16(),
            colors.reset,
            colors.magenta,
            colors.reset
        );

        if self.verbose < 2 {
            return response;
        }

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();
        colors.body("Response body", &bytes);
        Response::from_parts(parts, Body::from(bytes))
    }
}
