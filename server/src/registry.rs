//! In-memory registry of running games.
//!
//! All games live behind one async mutex. Handlers lock it for the duration
//! of a single operation, which keeps every game action atomic without
//! per-game locking.

use crate::deck::Deck;
use crate::game::Game;
use log::{info, warn};
use rand::Rng;
use shared::GAME_ID_LEN;
use std::collections::HashMap;
use tokio::sync::Mutex;

const GAME_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random six-character uppercase alphanumeric game id.
fn random_game_id() -> String {
    let mut rng = rand::thread_rng();
    (0..GAME_ID_LEN)
        .map(|_| {
            let index = rng.gen_range(0..GAME_ID_ALPHABET.len());
            GAME_ID_ALPHABET[index] as char
        })
        .collect()
}

/// Owns every game on this server instance.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: Mutex<HashMap<String, Game>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new lobby hosted by `host_id` and returns its id. Collisions
    /// with live games are detected under the lock and regenerated.
    pub async fn create_game(&self, host_id: &str) -> String {
        let mut games = self.games.lock().await;

        let mut game_id = random_game_id();
        while games.contains_key(&game_id) {
            warn!("Game id {} already in use, regenerating", game_id);
            game_id = random_game_id();
        }

        let game = Game::new(game_id.clone(), host_id.to_string(), Deck::standard());
        games.insert(game_id.clone(), game);
        info!("Created game {} hosted by {}", game_id, host_id);
        game_id
    }

    /// Runs `f` against the named game while the registry lock is held.
    /// Returns `None` when no such game exists.
    pub async fn with_game<T>(
        &self,
        game_id: &str,
        f: impl FnOnce(&mut Game) -> T,
    ) -> Option<T> {
        let mut games = self.games.lock().await;
        games.get_mut(game_id).map(f)
    }

    /// True when the registry currently holds a game with this id.
    pub async fn contains(&self, game_id: &str) -> bool {
        self.games.lock().await.contains_key(game_id)
    }

    pub async fn game_count(&self) -> usize {
        self.games.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::is_valid_game_id;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_game_returns_valid_id() {
        let registry = GameRegistry::new();
        let game_id = registry.create_game("alice").await;

        assert!(is_valid_game_id(&game_id));
        assert!(registry.contains(&game_id).await);
        assert_eq!(registry.game_count().await, 1);
    }

    #[tokio::test]
    async fn test_created_game_has_host_as_player() {
        let registry = GameRegistry::new();
        let game_id = registry.create_game("alice").await;

        let host = registry
            .with_game(&game_id, |game| game.host_id.clone())
            .await;
        assert_eq!(host.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_unknown_game_yields_none() {
        let registry = GameRegistry::new();
        let result = registry.with_game("NOPE01", |game| game.game_id.clone()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let registry = Arc::new(GameRegistry::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.create_game(&format!("host{}", i)).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(registry.game_count().await, 16);
    }

    #[test]
    fn test_random_game_id_shape() {
        for _ in 0..100 {
            let id = random_game_id();
            assert!(is_valid_game_id(&id), "bad id: {}", id);
        }
    }
}
