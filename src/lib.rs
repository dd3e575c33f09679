//! Guess AI - chat, text-to-image, and a "guess the prompt" game on top of
//! OpenAI's hosted models.
//!
//! The game scores a guess by embedding the secret prompt and the guess and
//! taking their cosine similarity as a percentage.

pub mod ai;
pub mod app;
pub mod chat;
pub mod error;
pub mod game;
pub mod image;
pub mod models;
pub mod semantic;

pub use error::{Error, Result};
