//! Singularis Prime toolkit: a declaration-level parser, a readable
//! bytecode compiler, mock quantum simulations, the G.L.Y.P.H. emoji
//! syntax, and AI helpers with a local fallback.
pub mod ai;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
