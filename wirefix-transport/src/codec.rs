/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Tokio codec adapter for FIX framing.
//!
//! [`FixCodec`] plugs the [`FrameDecoder`] into `tokio_util::codec` so a
//! `Framed` transport yields one complete, checksum-validated frame per
//! item. Outbound messages are written as-is: the encoder in
//! `wirefix-tagvalue` has already finalized BodyLength and CheckSum by the
//! time bytes reach the transport.

use crate::frame::FrameDecoder;
use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, Encoder, Framed};
use wirefix_core::error::FrameError;

/// Tokio codec for FIX message framing.
#[derive(Debug, Clone, Default)]
pub struct FixCodec {
    frame: FrameDecoder,
}

impl FixCodec {
    /// Creates a codec with default framing limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame: FrameDecoder::new(),
        }
    }

    /// Sets the maximum total frame length.
    #[must_use]
    pub fn with_max_frame_length(mut self, max: usize) -> Self {
        self.frame = self.frame.with_max_frame_length(max);
        self
    }
}

impl Decoder for FixCodec {
    type Item = BytesMut;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.frame.decode(src)
    }
}

impl Encoder<&[u8]> for FixCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        dst.put_slice(item);
        Ok(())
    }
}

impl Encoder<BytesMut> for FixCodec {
    type Error = FrameError;

    fn encode(&mut self, item: BytesMut, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        dst.put_slice(&item);
        Ok(())
    }
}

/// A framed FIX transport over any async byte stream.
pub type FixFramed<T> = Framed<T, FixCodec>;

/// Wraps an async byte stream in a FIX-framed transport.
pub fn framed<T: AsyncRead + AsyncWrite>(io: T) -> FixFramed<T> {
    Framed::new(io, FixCodec::new())
}
