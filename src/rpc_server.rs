//! Tabdesk RPC Server: JSON-RPC over stdin/stdout for the host shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"tab.open", "params":{"taskCode":"...","title":"...","url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events raised by a request follow its response as {"event":"opened","tab":{...},"timestamp":"..."}.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tabdesk::app::App;
use tabdesk::rpc_handler::handle_method;
use tabdesk::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabdesk::types::event::TabEvent;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn emit(line: &Value) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{}", line);
    let _ = out.flush();
}

fn drain_events(events: &mut Receiver<TabEvent>) {
    loop {
        match events.try_recv() {
            Ok(ev) => emit(&json!({"event": ev.kind, "tab": ev.tab, "timestamp": ev.timestamp})),
            Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "event stream lagged"),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    // Audit requests are spawned on this runtime; the request loop itself stays synchronous.
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };
    let _guard = runtime.enter();

    let mut settings_engine = SettingsEngine::new(std::env::args().nth(1));
    if let Err(e) = settings_engine.load() {
        eprintln!("failed to load settings: {}", e);
        std::process::exit(1);
    }
    init_logging(&settings_engine.get_settings().logging.filter);
    info!(config = %settings_engine.get_config_path(), "settings loaded");

    let mut app = match App::open(settings_engine) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "failed to initialize tabdesk");
            std::process::exit(1);
        }
    };

    let mut events = app.tab_manager.subscribe_events();
    app.startup();
    let app = Mutex::new(app);

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut rate_limiter = RateLimiter::new(200);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            emit(&json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response);
        drain_events(&mut events);
    }

    info!("stdin closed, shutting down");
}
