//! Server push notifications

pub mod listener;

pub use listener::{describe, spawn, SseMessage, SseParser};
