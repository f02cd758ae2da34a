//! Growable byte queue, for converting between frames and bytes

use super::{de, ser};
use core::fmt;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Unimplemented,
    UnexpectedEnd,
    FrameTooLarge(usize),
    InvalidValue,
    InvalidUtf8,
    Serialize,
    Deserialize,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrameTooLarge(len) => write!(f, "frame of {} bytes exceeds the size limit", len),
            other => write!(f, "{:?}", other),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// Largest frame accepted by default, the same as the usual gRPC limit
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 << 20;

const LEN_PREFIX: usize = 4;

/// Bytes still in the buffer are `bytes[start..]`
#[derive(Default, Debug)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
    start: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[self.start..]
    }

    pub fn len(&self) -> usize {
        self.bytes.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn reset(&mut self) {
        self.bytes.clear();
        self.start = 0;
    }

    /// Hand out the pending bytes, leaving the buffer empty
    pub fn take(&mut self) -> Vec<u8> {
        self.compact();
        self.start = 0;
        std::mem::take(&mut self.bytes)
    }

    fn compact(&mut self) {
        if self.start > 0 {
            self.bytes.drain(..self.start);
            self.start = 0;
        }
    }

    /// Make room for up to `additional` bytes, returning the empty region to
    /// be filled. Must be followed by [FrameBuffer::commit_fill()].
    pub fn begin_fill(&mut self, additional: usize) -> &mut [u8] {
        self.compact();
        let end = self.bytes.len();
        self.bytes.resize(end + additional, 0);
        &mut self.bytes[end..]
    }

    pub fn commit_fill(&mut self, additional: usize, filled: usize) {
        assert!(filled <= additional);
        let new_len = self.bytes.len() - additional + filled;
        self.bytes.truncate(new_len);
    }

    pub fn push_back<T: Serialize>(&mut self, message: &T) -> Result<()> {
        let saved_len = self.bytes.len();
        let mut serializer = ser::FrameSerializer::new(self);
        let result = message.serialize(&mut serializer);
        if result.is_err() {
            self.bytes.truncate(saved_len);
        }
        result
    }

    pub fn pop_front<T: DeserializeOwned>(&mut self) -> Result<T> {
        let saved_start = self.start;
        let mut deserializer = de::FrameDeserializer::new(self);
        let result = T::deserialize(&mut deserializer);
        if result.is_err() {
            // Rewind the pop on error, to recover after a partial read
            self.start = saved_start;
        }
        result
    }

    /// Append one length-prefixed frame
    pub fn push_frame<T: Serialize>(&mut self, message: &T, max_size: usize) -> Result<()> {
        let prefix_at = self.bytes.len();
        self.extend_bytes(&[0; LEN_PREFIX])?;
        if let Err(e) = self.push_back(message) {
            self.bytes.truncate(prefix_at);
            return Err(e);
        }
        let len = self.bytes.len() - prefix_at - LEN_PREFIX;
        if len > max_size {
            self.bytes.truncate(prefix_at);
            return Err(Error::FrameTooLarge(len));
        }
        self.bytes[prefix_at..prefix_at + LEN_PREFIX].copy_from_slice(&(len as u32).to_le_bytes());
        Ok(())
    }

    /// Remove one complete frame, or return `None` if more bytes are needed
    pub fn pop_frame<T: DeserializeOwned>(&mut self, max_size: usize) -> Result<Option<T>> {
        let len = match self.front_bytes(LEN_PREFIX) {
            Err(_) => return Ok(None),
            Ok(prefix) => {
                let mut bytes = [0u8; LEN_PREFIX];
                bytes.copy_from_slice(prefix);
                u32::from_le_bytes(bytes) as usize
            }
        };
        if len > max_size {
            return Err(Error::FrameTooLarge(len));
        }
        if self.len() < LEN_PREFIX + len {
            return Ok(None);
        }
        let saved_start = self.start;
        self.pop_front_bytes(LEN_PREFIX);
        let payload_start = self.start;
        match self.pop_front::<T>() {
            Ok(message) if self.start - payload_start == len => Ok(Some(message)),
            Ok(_) => {
                self.start = saved_start;
                Err(Error::InvalidValue)
            }
            Err(e) => {
                self.start = saved_start;
                Err(e)
            }
        }
    }

    pub fn extend_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    pub fn push_back_byte(&mut self, data: u8) -> Result<()> {
        self.bytes.push(data);
        Ok(())
    }

    pub fn push_back_len(&mut self, len: usize) -> Result<()> {
        if len > u32::MAX as usize {
            Err(Error::InvalidValue)
        } else {
            self.extend_bytes(&(len as u32).to_le_bytes())
        }
    }

    pub fn front_bytes(&self, len: usize) -> Result<&[u8]> {
        let slice = self.as_slice();
        if len <= slice.len() {
            Ok(&slice[..len])
        } else {
            Err(Error::UnexpectedEnd)
        }
    }

    pub fn pop_front_bytes(&mut self, len: usize) {
        self.start += len;
        assert!(self.start <= self.bytes.len());
    }

    pub fn pop_front_byte(&mut self) -> Result<u8> {
        let result = self.front_bytes(1)?[0];
        self.pop_front_bytes(1);
        Ok(result)
    }

    pub fn pop_front_len(&mut self) -> Result<usize> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.front_bytes(4)?);
        self.pop_front_bytes(4);
        Ok(u32::from_le_bytes(bytes) as usize)
    }

    pub fn pop_front_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let result = self.front_bytes(len)?.to_vec();
        self.pop_front_bytes(len);
        Ok(result)
    }
}
