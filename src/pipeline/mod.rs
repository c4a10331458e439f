//! Processing pipeline stages.
//!
//! ```text
//! text ──load──▶ SaveDocument ──transform──▶ SaveDocument ──export──▶ text
//!                      │
//!                      └──format──▶ table dates
//! ```
//!
//! Each stage is a plain function over owned or borrowed values; the session
//! strings them together and keeps the only piece of state.

pub mod export;
pub mod format;
pub mod load;
pub mod transform;
