//! Wire protocol shared between the game server and the load balancer.
//!
//! Every HTTP endpoint exchanges one of the request/response structs defined
//! here, so both binaries agree on the JSON shapes at compile time instead of
//! passing dynamically-shaped maps around.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of fragment cards dealt to each player when a game starts.
pub const HAND_SIZE: usize = 7;
/// Minimum number of joined players required before the host may start.
pub const MIN_PLAYERS_TO_START: usize = 2;
/// Number of helper cards revealed at game start.
pub const HELPER_CARD_COUNT: usize = 3;
/// Length of a game identifier (uppercase letters and digits).
pub const GAME_ID_LEN: usize = 6;

/// Returns true if `s` is a well-formed game identifier.
///
/// Game ids are exactly [`GAME_ID_LEN`] characters drawn from `A-Z0-9`. The
/// balancer uses this to decide whether a path segment names a game, and the
/// server uses it when generating fresh ids.
pub fn is_valid_game_id(s: &str) -> bool {
    s.len() == GAME_ID_LEN
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Side of the table card a fragment attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Before,
    After,
}

/// Whether a staged move spends a hand card or one of the shared helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Hand,
    Helper,
}

/// Body of requests that only identify the acting player
/// (`/create_game`, `/join_game`, `/start_game`, `/check_turn`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerIdBody {
    pub player_id: String,
}

/// Body of `POST /submit_fragment/{game_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFragmentRequest {
    pub player_id: String,
    pub fragment: String,
    pub position: Position,
    /// Optional helper card extending the table card before validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_card: Option<String>,
}

/// One staged placement inside a `/submit_turn` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMove {
    pub card: String,
    #[serde(rename = "type")]
    pub kind: MoveKind,
    pub position: Position,
}

/// Body of `POST /submit_turn/{game_id}`: a single combined move built from
/// exactly one hand card and at most one helper card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTurnRequest {
    pub player_id: String,
    pub moves: Vec<TurnMove>,
}

/// Response to a successful `POST /create_game`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub success: bool,
    pub game_id: String,
}

/// Generic `{success, message}` response, also used for every error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Response to an accepted `/submit_fragment` or `/submit_turn` move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_earned: Option<u32>,
    #[serde(default)]
    pub helper_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// Per-player slice of the status view. `hand` is only populated for the
/// requesting player; everyone else's hand is redacted to an empty list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub score: u32,
    pub hand_size: usize,
    pub hand: Vec<String>,
}

/// Full game state as seen by one player, returned by `/game_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub game_id: String,
    pub host_id: String,
    pub card_on_table: Option<String>,
    pub helper_cards: Vec<String>,
    pub used_helper_cards: Vec<String>,
    pub current_turn: Option<String>,
    pub players: HashMap<String, PlayerView>,
    pub main_deck_count: usize,
    pub game_started: bool,
    pub check_count: usize,
    pub winner: Option<String>,
    pub min_players_to_start: usize,
    pub current_players_count: usize,
}

/// Envelope for `/game_status` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStatusResponse {
    pub success: bool,
    pub data: GameView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_game_ids() {
        assert!(is_valid_game_id("A1B2C3"));
        assert!(is_valid_game_id("ZZZZZZ"));
        assert!(is_valid_game_id("000000"));
    }

    #[test]
    fn test_invalid_game_ids() {
        assert!(!is_valid_game_id(""));
        assert!(!is_valid_game_id("A1B2C"));
        assert!(!is_valid_game_id("A1B2C3D"));
        assert!(!is_valid_game_id("a1b2c3"));
        assert!(!is_valid_game_id("A1B2C!"));
    }

    #[test]
    fn test_position_serialization() {
        assert_eq!(
            serde_json::to_string(&Position::Before).unwrap(),
            "\"before\""
        );
        assert_eq!(
            serde_json::to_string(&Position::After).unwrap(),
            "\"after\""
        );

        let pos: Position = serde_json::from_str("\"before\"").unwrap();
        assert_eq!(pos, Position::Before);
    }

    #[test]
    fn test_submit_fragment_request_roundtrip() {
        let request = SubmitFragmentRequest {
            player_id: "alice".to_string(),
            fragment: "TA".to_string(),
            position: Position::After,
            helper_card: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("helper_card"));

        let parsed: SubmitFragmentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.player_id, "alice");
        assert_eq!(parsed.fragment, "TA");
        assert_eq!(parsed.position, Position::After);
        assert!(parsed.helper_card.is_none());
    }

    #[test]
    fn test_submit_turn_request_parsing() {
        let json = r#"{
            "player_id": "bob",
            "moves": [
                {"card": "NG", "type": "helper", "position": "after"},
                {"card": "KA", "type": "hand", "position": "before"}
            ]
        }"#;

        let parsed: SubmitTurnRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.moves.len(), 2);
        assert_eq!(parsed.moves[0].kind, MoveKind::Helper);
        assert_eq!(parsed.moves[1].kind, MoveKind::Hand);
        assert_eq!(parsed.moves[1].position, Position::Before);
    }

    #[test]
    fn test_message_response_helpers() {
        let ok = MessageResponse::ok("joined");
        assert!(ok.success);
        assert_eq!(ok.message, "joined");

        let err = MessageResponse::error("not your turn");
        assert!(!err.success);
        assert_eq!(err.message, "not your turn");
    }

    #[test]
    fn test_submit_response_omits_empty_fields() {
        let response = SubmitResponse {
            success: true,
            message: "ok".to_string(),
            score_earned: Some(4),
            helper_used: false,
            winner: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"score_earned\":4"));
        assert!(!json.contains("winner"));
    }

    #[test]
    fn test_game_view_roundtrip() {
        let mut players = HashMap::new();
        players.insert(
            "alice".to_string(),
            PlayerView {
                score: 12,
                hand_size: 5,
                hand: vec!["KA".to_string(), "TA".to_string()],
            },
        );
        players.insert(
            "bob".to_string(),
            PlayerView {
                score: 0,
                hand_size: 7,
                hand: vec![],
            },
        );

        let view = GameView {
            game_id: "A1B2C3".to_string(),
            host_id: "alice".to_string(),
            card_on_table: Some("KA".to_string()),
            helper_cards: vec!["NG".to_string()],
            used_helper_cards: vec![],
            current_turn: Some("bob".to_string()),
            players,
            main_deck_count: 42,
            game_started: true,
            check_count: 1,
            winner: None,
            min_players_to_start: MIN_PLAYERS_TO_START,
            current_players_count: 2,
        };

        let json = serde_json::to_string(&view).unwrap();
        let parsed: GameView = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.game_id, "A1B2C3");
        assert_eq!(parsed.players["alice"].hand.len(), 2);
        assert!(parsed.players["bob"].hand.is_empty());
        assert_eq!(parsed.players["bob"].hand_size, 7);
    }
}
