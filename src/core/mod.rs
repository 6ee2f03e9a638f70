//! # Core Application Logic
//!
//! This module contains Parley's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ChatState (store)    │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No terminal I/O.       │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │ Responder  │
//!          │  Adapter   │                │  (tokio)   │
//!          │ (ratatui)  │                │            │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`]: `Store<S>`, observable state with selector subscriptions
//! - [`chats`]: `ChatState`, all conversations and the active one
//! - [`conversation`]: `Conversation`, `Message`, title resolution
//! - [`action`]: the `Action` enum and `update()`
//! - [`preferences`]: UI toggles
//! - [`purpose`]: purpose symbols
//! - [`persistence`]: JSON save/load
//! - [`config`]: TOML config resolution

pub mod action;
pub mod chats;
pub mod config;
pub mod conversation;
pub mod persistence;
pub mod preferences;
pub mod purpose;
pub mod store;
