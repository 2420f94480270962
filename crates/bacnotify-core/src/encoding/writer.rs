use crate::EncodeError;

/// Byte sink for encoders.
///
/// A writer either fills a caller-owned buffer or, when created with
/// [`Writer::measure`], only counts the bytes an encoder would produce.
/// Running an encoder once against a measuring writer gives the exact size
/// the second, real pass will write.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: Option<&'a mut [u8]>,
    pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf: Some(buf),
            pos: 0,
        }
    }

    /// A writer without storage that only advances its position.
    pub const fn measure() -> Self {
        Self { buf: None, pos: 0 }
    }

    pub const fn is_measuring(&self) -> bool {
        self.buf.is_none()
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        match &self.buf {
            Some(buf) => buf.len().saturating_sub(self.pos),
            None => usize::MAX - self.pos,
        }
    }

    pub fn as_written(&self) -> &[u8] {
        match &self.buf {
            Some(buf) => &buf[..self.pos],
            None => &[],
        }
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.write_all(&[value])
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        if self.remaining() < data.len() {
            return Err(EncodeError::BufferTooSmall);
        }
        let end = self.pos + data.len();
        if let Some(buf) = self.buf.as_deref_mut() {
            buf[self.pos..end].copy_from_slice(data);
        }
        self.pos = end;
        Ok(())
    }

    pub fn write_be_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_all(&value.to_be_bytes())
    }

    pub fn write_be_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.write_all(&value.to_be_bytes())
    }
}
