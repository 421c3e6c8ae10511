//! Coin Clash - two-team turn-based combat resolved by coin flips

pub mod battle;
pub mod combat;
pub mod core;
