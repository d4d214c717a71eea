//! Per-player state: hand, score, and last-turn memory.

/// One participant in a game.
///
/// Players are identified by the human-chosen id they joined with. The hand
/// is a multiset; drawing the same fragment twice legitimately yields two
/// copies.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: String,
    /// Fragment cards currently held, hidden from other players.
    pub hand: Vec<String>,
    /// Total points earned; only ever increases.
    pub score: u32,
    /// Whether this player's most recent turn was a pass ("check").
    pub last_action_check: bool,
}

impl Player {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hand: Vec::new(),
            score: 0,
            last_action_check: false,
        }
    }

    /// Appends cards to the hand.
    pub fn add_cards(&mut self, cards: impl IntoIterator<Item = String>) {
        self.hand.extend(cards);
    }

    /// Removes exactly one instance of `card` from the hand.
    ///
    /// Returns false if the card is not held; the caller treats that as a
    /// rejected move, never as a fault.
    pub fn remove_card(&mut self, card: &str) -> bool {
        match self.hand.iter().position(|c| c == card) {
            Some(index) => {
                self.hand.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns true if the hand holds at least one instance of `card`.
    pub fn holds(&self, card: &str) -> bool {
        self.hand.iter().any(|c| c == card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_empty() {
        let player = Player::new("alice");
        assert_eq!(player.id, "alice");
        assert!(player.hand.is_empty());
        assert_eq!(player.score, 0);
        assert!(!player.last_action_check);
    }

    #[test]
    fn test_add_cards_allows_duplicates() {
        let mut player = Player::new("alice");
        player.add_cards(vec!["KA".to_string(), "KA".to_string()]);
        assert_eq!(player.hand, vec!["KA", "KA"]);
    }

    #[test]
    fn test_remove_card_takes_single_instance() {
        let mut player = Player::new("alice");
        player.add_cards(vec!["KA".to_string(), "TA".to_string(), "KA".to_string()]);

        assert!(player.remove_card("KA"));
        assert_eq!(player.hand, vec!["TA", "KA"]);
    }

    #[test]
    fn test_remove_missing_card_fails() {
        let mut player = Player::new("alice");
        player.add_cards(vec!["KA".to_string()]);

        assert!(!player.remove_card("TA"));
        assert_eq!(player.hand, vec!["KA"]);
    }

    #[test]
    fn test_holds() {
        let mut player = Player::new("alice");
        assert!(!player.holds("KA"));
        player.add_cards(vec!["KA".to_string()]);
        assert!(player.holds("KA"));
    }
}
