/// Encode/decode functions for BACnet primitive and application data types.
pub mod primitives;
/// Zero-copy byte reader for decoding BACnet frames.
pub mod reader;
/// BACnet tag system (application, context, opening/closing).
pub mod tag;
/// Byte writer for encoding BACnet frames into a caller-owned buffer.
pub mod writer;

use crate::EncodeError;
use writer::Writer;

/// A value with a single encoder that serves both the measuring and the
/// writing pass.
pub trait Encode {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError>;

    /// Exact number of bytes [`Encode::encode`] produces.
    fn encoded_len(&self) -> Result<usize, EncodeError> {
        let mut w = Writer::measure();
        self.encode(&mut w)?;
        Ok(w.position())
    }

    /// Two-pass entry point: `None` measures, `Some(buf)` writes.
    ///
    /// The size is always computed first; a buffer shorter than that size
    /// is refused with [`EncodeError::BufferTooSmall`] before any byte is
    /// written.
    fn encode_into(&self, buf: Option<&mut [u8]>) -> Result<usize, EncodeError> {
        let needed = self.encoded_len()?;
        let Some(buf) = buf else {
            return Ok(needed);
        };
        if buf.len() < needed {
            return Err(EncodeError::BufferTooSmall);
        }
        let mut w = Writer::new(buf);
        self.encode(&mut w)?;
        Ok(w.position())
    }
}
