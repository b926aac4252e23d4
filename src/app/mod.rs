//! Application core: session logic, zero I/O.
//!
//! This module contains the remote-control session façade: command
//! handling, timer wiring, and observer notification.  Everything the
//! core needs from the outside world (observers, timer fire delivery,
//! config storage) goes through the **port traits** in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
