//! Restyle CLI library.

pub mod cli;
