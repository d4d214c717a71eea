//! Word-building card game server.
//!
//! Players draw hands of letter fragments, take turns extending the card on
//! the table into dictionary words, and win by emptying their hand. The
//! server keeps every game in memory and exposes the whole protocol as JSON
//! over HTTP.

pub mod deck;
pub mod game;
pub mod http;
pub mod player;
pub mod registry;
pub mod words;
