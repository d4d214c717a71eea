//! Fragment deck: the shuffled draw pile a game deals from.
//!
//! The deck is seeded once per game from [`FRAGMENT_VOCABULARY`] and only
//! ever reordered by an explicit [`Deck::shuffle_remaining`] call. Cards
//! returned to the deck (recycled discards) are appended in order; deferring
//! the shuffle to the recycle point keeps every discard O(1).

use rand::seq::SliceRandom;

/// Seed vocabulary of word fragments. Single letters, common syllables,
/// frequent digraphs, and a handful of short whole words. Duplicates are
/// intentional; they raise the draw frequency of common fragments.
pub const FRAGMENT_VOCABULARY: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "AN", "AS", "AR", "AH", "BA", "BE", "BI", "BO", "BU", "CA",
    "CE", "CI", "CO", "CU", "DA", "DE", "DI", "DO", "DU", "GA", "GE", "GI", "GO", "GU", "KA", "KE",
    "KI", "KO", "KU", "LA", "LE", "LI", "LO", "LU", "MA", "ME", "MI", "MO", "MU", "NA", "NE", "NI",
    "NO", "NU", "PA", "PE", "PI", "PO", "PU", "RA", "RE", "RI", "RO", "RU", "SA", "SE", "SI", "SO",
    "SU", "TA", "TE", "TI", "TO", "TU", "VA", "VE", "VI", "VO", "VU", "WA", "WE", "WI", "WO", "WU",
    "YA", "YE", "YI", "YO", "YU", "ZA", "ZE", "ZI", "ZO", "ZU", "NG", "NY", "SY", "KH", "GH", "CH",
    "PH", "SH", "TH", "TS", "NS", "PS", "AK", "AL", "AM", "AT", "AP", "ER", "ET", "IK", "IL", "IM",
    "IN", "IP", "IR", "IS", "IT", "OK", "OL", "OM", "ON", "OP", "OR", "OS", "OT", "UK", "UL", "UM",
    "UN", "UP", "UR", "US", "UT", "DAN", "YANG", "DI", "KE", "DARI", "PADA", "SAAT", "SUDAH",
    "BELUM", "AGAR", "OLEH", "UNTUK", "AKU", "KAMU", "KITA", "MEREKA", "DIA", "INI", "ITU", "SANA",
    "SINI", "BEGITU", "DEMIKIAN", "JUGA", "TAPI", "ATAU", "DAN", "KARENA", "SEBAB", "MESKIPUN",
    "SEMENTARA", "SETELAH", "SEBELUM", "KEMUDIAN", "LALU", "KINI", "NANTI", "ADA", "ADALAH",
    "AKAN", "TELAH", "SUDAH", "BELUM", "HARUS", "BOLEH", "DAPAT", "BISA", "TIDAK", "BUKAN",
    "SANGAT", "TERLALU", "KURANG", "LEBIH", "PALING", "SERING", "JARANG", "SELALU", "PERNAH",
    "TIDAK", "LAGI", "MASIH", "BARU", "LAMA", "SEMPIT", "LUAS",
];

/// An ordered draw pile of uppercase fragment cards.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<String>,
}

impl Deck {
    /// Builds a deck from a seed list, uppercasing every card and shuffling.
    pub fn new(seed: &[&str]) -> Self {
        let mut cards: Vec<String> = seed.iter().map(|c| c.to_uppercase()).collect();
        cards.shuffle(&mut rand::thread_rng());
        Self { cards }
    }

    /// Builds a deck from the full built-in vocabulary.
    pub fn standard() -> Self {
        Self::new(FRAGMENT_VOCABULARY)
    }

    /// Removes and returns the top card, or `None` if the deck is empty.
    pub fn draw(&mut self) -> Option<String> {
        self.cards.pop()
    }

    /// Draws up to `n` cards, stopping early if the deck runs out.
    pub fn draw_many(&mut self, n: usize) -> Vec<String> {
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            match self.draw() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }

    /// Appends one card without reshuffling.
    pub fn add(&mut self, card: String) {
        self.cards.push(card);
    }

    /// Appends a batch of cards without reshuffling.
    pub fn extend(&mut self, cards: impl IntoIterator<Item = String>) {
        self.cards.extend(cards);
    }

    /// Randomizes the current order in place. Called only when the discard
    /// pile is recycled back into the deck, never on ordinary inserts.
    pub fn shuffle_remaining(&mut self) {
        self.cards.shuffle(&mut rand::thread_rng());
    }

    /// Removes and returns the card at `index`.
    ///
    /// Used by helper selection, which picks specific fragments out of the
    /// pile rather than drawing blind from the top.
    pub fn take_at(&mut self, index: usize) -> String {
        self.cards.remove(index)
    }

    pub fn cards(&self) -> &[String] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_size_matches_vocabulary() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), FRAGMENT_VOCABULARY.len());
    }

    #[test]
    fn test_draw_reduces_deck() {
        let mut deck = Deck::new(&["KA", "TA", "MA"]);
        assert_eq!(deck.len(), 3);

        let card = deck.draw().unwrap();
        assert!(["KA", "TA", "MA"].contains(&card.as_str()));
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_draw_from_empty_deck() {
        let mut deck = Deck::new(&[]);
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), None);
    }

    #[test]
    fn test_draw_many_stops_at_exhaustion() {
        let mut deck = Deck::new(&["KA", "TA"]);
        let drawn = deck.draw_many(5);

        assert_eq!(drawn.len(), 2);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_cards_are_uppercased() {
        let mut deck = Deck::new(&["ka"]);
        assert_eq!(deck.draw().unwrap(), "KA");
    }

    #[test]
    fn test_add_appends_without_shuffle() {
        let mut deck = Deck::new(&[]);
        deck.add("KA".to_string());
        deck.add("TA".to_string());

        // Last in, first out: insertion order is preserved until an explicit
        // shuffle_remaining call.
        assert_eq!(deck.draw().unwrap(), "TA");
        assert_eq!(deck.draw().unwrap(), "KA");
    }

    #[test]
    fn test_extend_and_shuffle_keep_all_cards() {
        let mut deck = Deck::new(&[]);
        deck.extend(vec!["KA".to_string(), "TA".to_string(), "MA".to_string()]);
        deck.shuffle_remaining();

        let mut drawn = deck.draw_many(3);
        drawn.sort();
        assert_eq!(drawn, vec!["KA", "MA", "TA"]);
    }

    #[test]
    fn test_take_at_removes_specific_card() {
        let mut deck = Deck::new(&[]);
        deck.extend(vec!["KA".to_string(), "TA".to_string(), "MA".to_string()]);

        let taken = deck.take_at(1);
        assert_eq!(taken, "TA");
        assert_eq!(deck.len(), 2);
        assert!(!deck.cards().contains(&"TA".to_string()));
    }

    #[test]
    fn test_duplicate_fragments_keep_multiplicity() {
        let mut deck = Deck::new(&["KA", "KA", "TA"]);
        let mut drawn = deck.draw_many(3);
        drawn.sort();
        assert_eq!(drawn, vec!["KA", "KA", "TA"]);
    }
}
