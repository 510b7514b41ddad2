//! Live Classroom Session Controller Library
//!
//! Client-side controller for a learner's participation in a scheduled live
//! class. It reconciles four independently arriving signals into one
//! consistent view and set of device permissions:
//!
//! - Wall-clock time against the class window and its (extendable) end
//! - Control locks the host writes into the room's shared metadata
//! - Ephemeral broadcast messages (`TIME_EXTENDED`, `RAISE_HAND`)
//! - The live roster, which decides whether the host is present
//!
//! # Architecture
//!
//! ```text
//! lobby watcher (30 s tick)          JoinWindowPolicy
//!        │                                  │
//!        └──────── gates ──────────► JoinClient::join ──► ConnectionGrant
//!                                                              │
//!                                   caller connects transport  │
//!                                                              ▼
//!                                               ClassroomSessionActor
//!                                               ├── countdown (1 s tick)
//!                                               ├── transport subscription
//!                                               └── handle commands
//! ```
//!
//! The real-time transport is an external collaborator behind the
//! [`transport::Transport`] trait.
//!
//! # Modules
//!
//! - [`actors`] - Session actor, handle and notifications
//! - [`bootstrap`] - Join request and too-early deferral
//! - [`config`] - Configuration from environment
//! - [`errors`] - Error types with learner-facing messages
//! - [`join_window`] - Join phase classification and schedule parsing
//! - [`lobby`] - Pre-connection phase watcher

pub mod actors;
pub mod bootstrap;
pub mod config;
pub mod control;
pub mod countdown;
pub mod errors;
pub mod events;
pub mod join_window;
pub mod lobby;
pub mod observability;
pub mod presence;
pub mod transport;
