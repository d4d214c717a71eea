//! Request classification and backend selection.

use log::{debug, info};
use shared::is_valid_game_id;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Path prefixes whose first trailing segment is a game id. Requests to
/// these must reach the backend that owns the game.
pub const STICKY_PREFIXES: &[&str] = &[
    "join_game",
    "start_game",
    "game_status",
    "submit_fragment",
    "submit_turn",
    "check_turn",
];

/// How a request should be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A game creation: round-robin now, remember the winner afterwards.
    CreateGame,
    /// Bound to whichever backend owns this game id.
    Sticky(String),
    /// No game affinity; any backend will do.
    RoundRobin,
}

/// Classifies a request path. A sticky prefix followed by something that is
/// not a well-formed game id falls back to round-robin; the backend will
/// reject it with its own error.
pub fn classify_path(path: &str) -> Route {
    let mut segments = path.trim_start_matches('/').splitn(2, '/');
    let head = segments.next().unwrap_or("");
    let rest = segments.next().unwrap_or("");

    if head == "create_game" {
        return Route::CreateGame;
    }
    if STICKY_PREFIXES.contains(&head) {
        let game_id = rest.split('/').next().unwrap_or("");
        if is_valid_game_id(game_id) {
            return Route::Sticky(game_id.to_string());
        }
    }
    Route::RoundRobin
}

/// Fixed set of backend base URLs with a rotating cursor.
#[derive(Debug)]
pub struct BackendPool {
    backends: Vec<String>,
    next: AtomicUsize,
}

impl BackendPool {
    /// Trailing slashes are stripped so paths can be appended directly.
    pub fn new(backends: Vec<String>) -> Self {
        let backends = backends
            .into_iter()
            .map(|b| b.trim_end_matches('/').to_string())
            .collect();
        Self {
            backends,
            next: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Next backend in rotation.
    pub fn next_backend(&self) -> Option<&str> {
        if self.backends.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.backends.len();
        Some(&self.backends[index])
    }
}

/// Round-robin pool plus the game-to-backend affinity table.
#[derive(Debug)]
pub struct StickyRouter {
    pool: BackendPool,
    table: Mutex<HashMap<String, String>>,
}

impl StickyRouter {
    pub fn new(pool: BackendPool) -> Self {
        Self {
            pool,
            table: Mutex::new(HashMap::new()),
        }
    }

    /// Picks the backend for a classified request. `None` means the request
    /// names a game this balancer has never seen created.
    pub fn target_for(&self, route: &Route) -> Option<String> {
        match route {
            Route::CreateGame | Route::RoundRobin => {
                self.pool.next_backend().map(str::to_string)
            }
            Route::Sticky(game_id) => {
                let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
                let target = table.get(game_id).cloned();
                debug!("Sticky lookup for game {}: {:?}", game_id, target);
                target
            }
        }
    }

    /// Records which backend owns a freshly created game. First write wins;
    /// an existing mapping is never overwritten.
    pub fn record(&self, game_id: &str, backend: &str) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if table.contains_key(game_id) {
            return;
        }
        info!("Game {} pinned to backend {}", game_id, backend);
        table.insert(game_id.to_string(), backend.to_string());
    }

    pub fn known_games(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
