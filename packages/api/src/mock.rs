//! Synthetic report generator for `MOCK_MODE`.
//!
//! Feeds random but valid reports through the regular ingest path so a fresh
//! deployment has data to look at.

use chrono::{SecondsFormat, Utc};
use overlord_types::ErrorReport;
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::state::AppState;

const DOMAINS: &[&str] = &[
    "auth.example.com",
    "api.example.org",
    "shop.example.net",
    "cdn.example.io",
    "tv.example.com",
    "player.example.co.uk",
];

const ERROR_TEXTS: &[&str] = &[
    "Uncaught TypeError: Cannot read properties of undefined (reading 'length')",
    "Uncaught ReferenceError: player is not defined",
    "Uncaught SyntaxError: Unexpected token '<'",
    "Uncaught RangeError: Maximum call stack size exceeded",
    "Script error.",
    "NetworkError when attempting to fetch resource.",
];

const URLS: &[&str] = &[
    "https://auth.example.com/login",
    "https://api.example.org/v2/catalog",
    "https://shop.example.net/cart/checkout",
    "http://tv.example.com/home",
    "https://player.example.co.uk/watch/episode-12",
    "http://localhost:8080/test",
];

const FILENAMES: &[&str] = &[
    "app.js",
    "vendor.bundle.js",
    "player.min.js",
    "main.3f9a1c.js",
    "polyfills.js",
];

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Linux; U; Android 7.1.2; en-us; AFTM Build/NS6265) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; U; Android 9; en-gb; AFTN Build/PS7233) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; U; Android 5.1.1; de-de; AFTS Build/LVY48F) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; U; Android 11; fr-fr; AFTKMST12 Build/RS8101) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Mobile Safari/537.36",
];

const STACK_TRACES: &[&str] = &[
    "TypeError: Cannot read properties of undefined (reading 'length')\n    at render (app.js:42:13)\n    at update (app.js:88:5)",
    "ReferenceError: player is not defined\n    at init (player.min.js:1:2048)",
    "RangeError: Maximum call stack size exceeded\n    at walk (vendor.bundle.js:311:9)\n    at walk (vendor.bundle.js:314:11)",
    "",
];

fn pick<R: Rng>(rng: &mut R, pool: &[&str]) -> String {
    pool[rng.random_range(0..pool.len())].to_string()
}

/// A random report drawn from the fixed pools. Always passes validation,
/// including the strict user agent check.
pub fn random_report() -> ErrorReport {
    let mut rng = rand::rng();
    ErrorReport {
        domain: pick(&mut rng, DOMAINS),
        error_text: pick(&mut rng, ERROR_TEXTS),
        url: pick(&mut rng, URLS),
        filename: pick(&mut rng, FILENAMES),
        line: rng.random_range(1..=100),
        column: rng.random_range(1..=50),
        datetime: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        user_agent: pick(&mut rng, USER_AGENTS),
        stack_trace: pick(&mut rng, STACK_TRACES),
    }
}

fn random_pause() -> Duration {
    Duration::from_secs(rand::rng().random_range(0..30))
}

/// Runs until the runtime shuts down.
pub fn spawn_mock_reporter(state: AppState) -> JoinHandle<()> {
    tracing::info!("Mock reporter started");
    tokio::spawn(async move {
        loop {
            match state.ingest(random_report()).await {
                Ok(stored) => {
                    tracing::info!(id = stored.id, domain = %stored.report.domain, "Inserted mock error report")
                }
                Err(err) => tracing::warn!(error = %err, "Mock error report rejected"),
            }
            tokio::time::sleep(random_pause()).await;
        }
    })
}
