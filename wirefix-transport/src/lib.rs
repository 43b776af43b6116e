/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # WireFix Transport
//!
//! Stream framing layer for the WireFix FIX protocol engine.
//!
//! This crate turns a raw, possibly fragmented byte stream into discrete,
//! checksum-validated FIX frames:
//! - **FrameDecoder**: incremental frame extraction with partial-data
//!   patience and strict corruption handling
//! - **FixCodec**: `tokio_util::codec` adapter so a `Framed` transport
//!   yields whole frames
//!
//! Connection management itself (connect/accept, TLS, reconnect) lives
//! outside this engine core.

pub mod codec;
pub mod frame;

pub use codec::{FixCodec, FixFramed, framed};
pub use frame::{DEFAULT_MAX_FRAME_LENGTH, FrameDecoder, extract_seq_num};
