/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # WireFix Core
//!
//! Core types, traits, and error definitions for the WireFix FIX protocol
//! engine.
//!
//! This crate provides the fundamental building blocks used across all
//! WireFix crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field types**: `FieldTag`, `FieldValue`, and the owned `Field`
//! - **Message model**: `FixMessage`, `MsgType`, and field selectors
//! - **Core types**: `SeqNum`, `Timestamp`, `CompId`, and the injectable
//!   `Clock`
//!
//! The decoding hot path works on borrowed byte spans and never copies;
//! the owned model here is what visitors assemble and what session logic
//! mutates when constructing outbound messages.

pub mod error;
pub mod field;
pub mod message;
pub mod tags;
pub mod types;

pub use error::{
    DecodeError, EncodeError, FixError, FrameError, FrameErrorKind, Result, SessionError,
};
pub use field::{Field, FieldTag, FieldValue};
pub use message::{FieldSelector, FixMessage, MessageSelector, MsgType};
pub use types::{Clock, CompId, FixedClock, SeqNum, SystemClock, Timestamp};
