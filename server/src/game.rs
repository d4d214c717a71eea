//! The game state machine: lobby, turn order, moves, and win detection.
//!
//! A game moves through three phases. In the lobby players join and the host
//! may start; in progress the player whose turn it is either submits a
//! fragment or passes; the game finishes when a hand empties or the deck is
//! irrecoverably exhausted. Every rule violation is a recoverable
//! [`GameError`] value and leaves the game exactly as it was before the
//! attempt.

use crate::deck::Deck;
use crate::player::Player;
use crate::words::{self, Dictionary};
use log::info;
use rand::seq::SliceRandom;
use shared::{
    GameView, MoveKind, PlayerView, Position, TurnMove, HAND_SIZE, HELPER_CARD_COUNT,
    MIN_PLAYERS_TO_START,
};
use std::collections::HashMap;
use thiserror::Error;

/// A rejected action. Never fatal: the caller reports the reason and the
/// game state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("at least {min} players are required to start")]
    NotEnoughPlayers { min: usize },
    #[error("the game has already started")]
    AlreadyStarted,
    #[error("the game has not started yet")]
    NotStarted,
    #[error("the game is already finished")]
    Finished,
    #[error("player '{0}' is already in the game")]
    DuplicatePlayer(String),
    #[error("player '{0}' is not in this game")]
    UnknownPlayer(String),
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("only the host can start the game")]
    NotHost,
    #[error("you do not hold the card '{0}'")]
    CardNotHeld(String),
    #[error("helper card '{0}' is not available")]
    HelperNotAvailable(String),
    #[error("the word '{0}' is not in the dictionary")]
    WordNotInDictionary(String),
    #[error("there is no card on the table to extend")]
    NoTableCard,
    #[error("the deck is too small to deal starting hands")]
    DeckTooSmall,
    #[error("a turn needs exactly one hand card and at most one helper card")]
    InvalidMoveSet,
}

/// Lifecycle phase, derived from the `started` flag and the winner slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lobby,
    InProgress,
    Finished,
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub formed_word: String,
    pub score_earned: u32,
    pub helper_used: bool,
    /// Set when this move emptied the player's hand and won the game.
    pub winner: Option<String>,
}

/// One running game and everything it owns.
#[derive(Debug, Clone)]
pub struct Game {
    pub game_id: String,
    pub host_id: String,
    pub players: HashMap<String, Player>,
    /// Turn sequence; shuffled once at start, fixed afterwards.
    pub player_order: Vec<String>,
    pub main_deck: Deck,
    pub discard_pile: Vec<String>,
    /// The single face-up card players must extend.
    pub card_on_table: Option<String>,
    /// Bonus connector cards, each usable once by any player.
    pub helper_cards: Vec<String>,
    pub used_helper_cards: Vec<String>,
    pub current_turn_index: usize,
    /// Consecutive passes; reaching the player count forces a table reshuffle.
    pub check_count: usize,
    pub started: bool,
    pub winner: Option<String>,
}

impl Game {
    /// Creates a lobby with the host as its first player.
    pub fn new(game_id: String, host_id: String, deck: Deck) -> Self {
        let mut players = HashMap::new();
        players.insert(host_id.clone(), Player::new(host_id.clone()));

        Self {
            game_id,
            host_id: host_id.clone(),
            players,
            player_order: vec![host_id],
            main_deck: deck,
            discard_pile: Vec::new(),
            card_on_table: None,
            helper_cards: Vec::new(),
            used_helper_cards: Vec::new(),
            current_turn_index: 0,
            check_count: 0,
            started: false,
            winner: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.winner.is_some() {
            Phase::Finished
        } else if self.started {
            Phase::InProgress
        } else {
            Phase::Lobby
        }
    }

    /// Id of the player whose turn it is, or `None` outside of play.
    pub fn current_player_id(&self) -> Option<&str> {
        if !self.started || self.player_order.is_empty() {
            return None;
        }
        self.player_order
            .get(self.current_turn_index)
            .map(String::as_str)
    }

    /// Adds a player to the lobby. Rejected once the game has started.
    pub fn add_player(&mut self, player_id: &str) -> Result<(), GameError> {
        if self.phase() != Phase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.contains_key(player_id) {
            return Err(GameError::DuplicatePlayer(player_id.to_string()));
        }

        self.players
            .insert(player_id.to_string(), Player::new(player_id));
        self.player_order.push(player_id.to_string());
        info!("Game {}: player {} joined", self.game_id, player_id);
        Ok(())
    }

    /// Starts the game: shuffles turn order, deals hands, flips the first
    /// table card, and reveals the helper cards.
    ///
    /// Fails without mutating anything if there are too few players or the
    /// deck cannot cover every hand plus the table card.
    pub fn start(&mut self, dictionary: &Dictionary) -> Result<(), GameError> {
        if self.phase() != Phase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() < MIN_PLAYERS_TO_START {
            return Err(GameError::NotEnoughPlayers {
                min: MIN_PLAYERS_TO_START,
            });
        }
        if self.main_deck.len() < self.players.len() * HAND_SIZE + 1 {
            return Err(GameError::DeckTooSmall);
        }

        self.player_order.shuffle(&mut rand::thread_rng());
        self.current_turn_index = 0;
        self.check_count = 0;

        for player_id in &self.player_order {
            let cards = self.main_deck.draw_many(HAND_SIZE);
            if let Some(player) = self.players.get_mut(player_id) {
                player.add_cards(cards);
                player.last_action_check = false;
            }
        }

        self.card_on_table = self.main_deck.draw();
        if self.card_on_table.is_none() {
            return Err(GameError::DeckTooSmall);
        }

        self.helper_cards = self.select_helper_cards(dictionary);
        self.started = true;

        info!(
            "Game {} started with {} players, table card {:?}, helpers {:?}",
            self.game_id,
            self.players.len(),
            self.card_on_table,
            self.helper_cards
        );
        Ok(())
    }

    /// Picks up to [`HELPER_CARD_COUNT`] helper cards out of the deck,
    /// preferring fragments that already form a dictionary word with the
    /// table card. The preference pass is a linear scan over the remaining
    /// deck, O(vocabulary) per start; plain top-of-deck draws fill any
    /// shortfall.
    fn select_helper_cards(&mut self, dictionary: &Dictionary) -> Vec<String> {
        let table_card = match &self.card_on_table {
            Some(card) => card.clone(),
            None => return Vec::new(),
        };

        let preferred: Vec<usize> = self
            .main_deck
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, card)| words::connects_to(card, &table_card, dictionary))
            .map(|(index, _)| index)
            .take(HELPER_CARD_COUNT)
            .collect();

        let mut helpers = Vec::with_capacity(HELPER_CARD_COUNT);
        // Remove back-to-front so earlier indices stay valid.
        for index in preferred.iter().rev() {
            helpers.push(self.main_deck.take_at(*index));
        }
        while helpers.len() < HELPER_CARD_COUNT {
            match self.main_deck.draw() {
                Some(card) => helpers.push(card),
                None => break,
            }
        }
        helpers
    }

    /// Rejects unless the game is in progress, the player is a member, and
    /// it is their turn.
    fn ensure_turn(&self, player_id: &str) -> Result<(), GameError> {
        match self.phase() {
            Phase::Lobby => return Err(GameError::NotStarted),
            Phase::Finished => return Err(GameError::Finished),
            Phase::InProgress => {}
        }
        if !self.players.contains_key(player_id) {
            return Err(GameError::UnknownPlayer(player_id.to_string()));
        }
        if self.current_player_id() != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    /// Plays one fragment from the hand onto the table card, optionally
    /// extending the table card with a helper first.
    ///
    /// All checks run before any mutation, so a rejection leaves the hand,
    /// table, discard pile, and turn index untouched.
    pub fn submit_fragment(
        &mut self,
        player_id: &str,
        fragment: &str,
        position: Position,
        helper_card: Option<&str>,
        dictionary: &Dictionary,
    ) -> Result<MoveOutcome, GameError> {
        self.ensure_turn(player_id)?;

        let fragment = fragment.to_uppercase();
        let table_card = self
            .card_on_table
            .clone()
            .ok_or(GameError::NoTableCard)?;

        let player = self
            .players
            .get(player_id)
            .ok_or_else(|| GameError::UnknownPlayer(player_id.to_string()))?;
        if !player.holds(&fragment) {
            return Err(GameError::CardNotHeld(fragment));
        }

        let helper = match helper_card {
            Some(card) => {
                let card = card.to_uppercase();
                if !self.helper_cards.iter().any(|h| *h == card) {
                    return Err(GameError::HelperNotAvailable(card));
                }
                Some(card)
            }
            None => None,
        };

        // A helper extends the table card on the same side before the hand
        // fragment attaches.
        let effective_table = match &helper {
            Some(card) => words::form_word(&table_card, card, position),
            None => table_card.clone(),
        };

        let formed_word =
            words::validate_word_formation(&effective_table, &fragment, position, dictionary)
                .ok_or_else(|| {
                    GameError::WordNotInDictionary(words::form_word(
                        &effective_table,
                        &fragment,
                        position,
                    ))
                })?;

        self.commit_move(player_id, &fragment, helper, table_card, formed_word)
    }

    /// Plays a combined move: exactly one hand card and at most one helper
    /// card, each attached before or after, validated once against the final
    /// concatenation.
    pub fn submit_turn(
        &mut self,
        player_id: &str,
        moves: &[TurnMove],
        dictionary: &Dictionary,
    ) -> Result<MoveOutcome, GameError> {
        self.ensure_turn(player_id)?;

        let table_card = self
            .card_on_table
            .clone()
            .ok_or(GameError::NoTableCard)?;

        let hand_cards: Vec<String> = moves
            .iter()
            .filter(|m| m.kind == MoveKind::Hand)
            .map(|m| m.card.to_uppercase())
            .collect();
        let helper_cards: Vec<String> = moves
            .iter()
            .filter(|m| m.kind == MoveKind::Helper)
            .map(|m| m.card.to_uppercase())
            .collect();
        if hand_cards.len() != 1 || helper_cards.len() > 1 {
            return Err(GameError::InvalidMoveSet);
        }

        let hand_card = hand_cards[0].clone();
        let player = self
            .players
            .get(player_id)
            .ok_or_else(|| GameError::UnknownPlayer(player_id.to_string()))?;
        if !player.holds(&hand_card) {
            return Err(GameError::CardNotHeld(hand_card));
        }
        for helper in &helper_cards {
            if !self.helper_cards.iter().any(|h| h == helper) {
                return Err(GameError::HelperNotAvailable(helper.clone()));
            }
        }

        let mut formed_word = table_card.clone();
        for turn_move in moves {
            formed_word = words::form_word(&formed_word, &turn_move.card, turn_move.position);
        }
        if !dictionary.contains(&formed_word) {
            return Err(GameError::WordNotInDictionary(formed_word));
        }

        let helper = helper_cards.into_iter().next();
        self.commit_move(player_id, &hand_card, helper, table_card, formed_word)
    }

    /// Applies an accepted move. Callers have already validated everything,
    /// so every step here succeeds.
    fn commit_move(
        &mut self,
        player_id: &str,
        fragment: &str,
        helper: Option<String>,
        table_card: String,
        formed_word: String,
    ) -> Result<MoveOutcome, GameError> {
        let score_earned = words::score_for_word(&formed_word);
        if let Some(player) = self.players.get_mut(player_id) {
            player.remove_card(fragment);
            player.score += score_earned;
        }

        let helper_used = helper.is_some();
        if let Some(card) = helper {
            if let Some(index) = self.helper_cards.iter().position(|h| *h == card) {
                let used = self.helper_cards.remove(index);
                self.used_helper_cards.push(used);
            }
        }

        self.discard_pile.push(table_card);
        self.card_on_table = Some(fragment.to_string());

        info!(
            "Game {}: {} played '{}' forming '{}' for {} points",
            self.game_id, player_id, fragment, formed_word, score_earned
        );

        if self.check_for_winner() {
            return Ok(MoveOutcome {
                formed_word,
                score_earned,
                helper_used,
                winner: self.winner.clone(),
            });
        }

        self.next_turn(false);
        Ok(MoveOutcome {
            formed_word,
            score_earned,
            helper_used,
            winner: None,
        })
    }

    /// Passes the turn ("check") for the player whose turn it is.
    pub fn pass_turn(&mut self, player_id: &str) -> Result<(), GameError> {
        self.ensure_turn(player_id)?;
        info!("Game {}: {} checked", self.game_id, player_id);
        self.next_turn(true);
        Ok(())
    }

    /// Advances the turn. A full cycle of consecutive checks forces a table
    /// reshuffle; any non-check action resets the counter.
    fn next_turn(&mut self, action_was_check: bool) {
        if self.player_order.is_empty() {
            return;
        }

        if let Some(current) = self.current_player_id().map(str::to_string) {
            if let Some(player) = self.players.get_mut(&current) {
                player.last_action_check = action_was_check;
            }
        }

        if action_was_check {
            self.check_count += 1;
            if self.check_count >= self.player_order.len() {
                info!(
                    "Game {}: all players checked, replacing the table card",
                    self.game_id
                );
                self.reshuffle_table_card();
                self.check_count = 0;
            }
        } else {
            self.check_count = 0;
        }

        self.current_turn_index = (self.current_turn_index + 1) % self.player_order.len();
    }

    /// Discards the table card and draws a replacement. An empty deck is
    /// refilled from the discard pile and shuffled; if both are exhausted
    /// the game ends and the current player takes the win.
    pub fn reshuffle_table_card(&mut self) {
        if let Some(card) = self.card_on_table.take() {
            self.discard_pile.push(card);
        }

        let mut next = self.main_deck.draw();
        if next.is_none() && !self.discard_pile.is_empty() {
            info!(
                "Game {}: deck empty, recycling {} discarded cards",
                self.game_id,
                self.discard_pile.len()
            );
            let discards = std::mem::take(&mut self.discard_pile);
            self.main_deck.extend(discards);
            self.main_deck.shuffle_remaining();
            next = self.main_deck.draw();
        }

        self.card_on_table = next;
        if self.card_on_table.is_none() {
            self.winner = self.current_player_id().map(str::to_string);
            info!(
                "Game {} ended: deck fully exhausted, winner {:?}",
                self.game_id, self.winner
            );
        }
    }

    /// Ends the game if any player's hand is empty. Returns true when a
    /// winner was just declared.
    pub fn check_for_winner(&mut self) -> bool {
        let winner = self
            .players
            .iter()
            .find(|(_, player)| player.hand.is_empty())
            .map(|(id, _)| id.clone());

        match winner {
            Some(id) => {
                info!("Game {}: {} emptied their hand and wins", self.game_id, id);
                self.winner = Some(id);
                self.started = false;
                true
            }
            None => false,
        }
    }

    /// Builds the status view for one requesting player. Only that player's
    /// hand is included; every other hand is redacted to an empty list.
    pub fn view_for(&self, viewer_id: &str) -> GameView {
        let players = self
            .players
            .iter()
            .map(|(id, player)| {
                let view = PlayerView {
                    score: player.score,
                    hand_size: player.hand.len(),
                    hand: if id == viewer_id {
                        player.hand.clone()
                    } else {
                        Vec::new()
                    },
                };
                (id.clone(), view)
            })
            .collect();

        GameView {
            game_id: self.game_id.clone(),
            host_id: self.host_id.clone(),
            card_on_table: self.card_on_table.clone(),
            helper_cards: self.helper_cards.clone(),
            used_helper_cards: self.used_helper_cards.clone(),
            current_turn: self.current_player_id().map(str::to_string),
            players,
            main_deck_count: self.main_deck.len(),
            game_started: self.started,
            check_count: self.check_count,
            winner: self.winner.clone(),
            min_players_to_start: MIN_PLAYERS_TO_START,
            current_players_count: self.players.len(),
        }
    }
}
