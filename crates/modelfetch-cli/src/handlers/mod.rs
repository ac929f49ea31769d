//! Command handlers.
//!
//! Handlers are thin: they turn parsed arguments into library calls and
//! format the result for the terminal. Domain decisions stay in
//! `modelfetch-download` and `modelfetch-core`.

pub mod categories;
pub mod collection;
pub mod download;
pub mod paths;
