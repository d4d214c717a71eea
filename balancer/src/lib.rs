//! Sticky-session load balancer for the game servers.
//!
//! Game state lives in the memory of whichever backend created the game, so
//! every request that names a game id must land on that same backend. The
//! balancer learns the mapping by watching successful game creations and
//! round-robins everything else.

pub mod proxy;
pub mod sticky;
