//! Owned byte buffers handed across the boundary.
//!
//! Every buffer returned by this crate must be released exactly once, either
//! by dropping the [`OwnedBuffer`] (Rust callers) or by passing the raw handle
//! to [`crate::ffi::lumen_release`] (foreign callers).

use std::sync::atomic::{AtomicUsize, Ordering};

static LIVE_BUFFERS: AtomicUsize = AtomicUsize::new(0);

/// Number of buffers produced and not yet released, process-wide.
pub fn live_buffers() -> usize {
    LIVE_BUFFERS.load(Ordering::SeqCst)
}

/// Heap bytes owned by this component until released.
#[derive(Debug, PartialEq, Eq)]
pub struct OwnedBuffer {
    bytes: Box<[u8]>,
}

/// Raw view of a released-to-host buffer.
#[repr(C)]
#[derive(Debug)]
pub struct LumenBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl OwnedBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        LIVE_BUFFERS.fetch_add(1, Ordering::SeqCst);
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hand ownership to a foreign caller. The buffer stays live until
    /// [`OwnedBuffer::from_raw`] reclaims it.
    pub fn into_raw(self) -> *mut LumenBuffer {
        let mut this = std::mem::ManuallyDrop::new(self);
        let bytes = std::mem::take(&mut this.bytes);
        let len = bytes.len();
        let data = Box::into_raw(bytes).cast::<u8>();
        Box::into_raw(Box::new(LumenBuffer { data, len }))
    }

    /// Reclaim a handle produced by [`OwnedBuffer::into_raw`]. Null gives `None`.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a handle returned by `into_raw` that has not been
    /// reclaimed yet. Reclaiming the same handle twice is undefined behavior.
    pub unsafe fn from_raw(raw: *mut LumenBuffer) -> Option<Self> {
        if raw.is_null() {
            return None;
        }
        // SAFETY: the caller guarantees `raw` came from `into_raw`, which boxed
        // the header and leaked a boxed slice of exactly `len` bytes at `data`.
        let header = unsafe { Box::from_raw(raw) };
        let slice = std::ptr::slice_from_raw_parts_mut(header.data, header.len);
        let bytes = unsafe { Box::from_raw(slice) };
        Some(Self { bytes })
    }
}

impl Drop for OwnedBuffer {
    fn drop(&mut self) {
        LIVE_BUFFERS.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LumenBuffer {
    /// # Safety
    ///
    /// `self` must be a live handle returned by this crate.
    pub unsafe fn as_slice(&self) -> &[u8] {
        // SAFETY: a live handle points at `len` initialized bytes.
        unsafe { std::slice::from_raw_parts(self.data, self.len) }
    }
}

/// Release a buffer. Equivalent to dropping it.
pub fn release(buffer: OwnedBuffer) {
    drop(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        let buffer = OwnedBuffer::new(b"{\"ok\":1}".to_vec());
        let raw = buffer.into_raw();
        assert!(!raw.is_null());

        let bytes = unsafe { (*raw).as_slice().to_vec() };
        assert_eq!(bytes, b"{\"ok\":1}");

        let back = unsafe { OwnedBuffer::from_raw(raw) }.unwrap();
        assert_eq!(back.as_str(), Some("{\"ok\":1}"));
        release(back);
    }

    #[test]
    fn test_empty_buffer() {
        let raw = OwnedBuffer::new(Vec::new()).into_raw();
        let back = unsafe { OwnedBuffer::from_raw(raw) }.unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn test_null_handle() {
        assert!(unsafe { OwnedBuffer::from_raw(std::ptr::null_mut()) }.is_none());
    }
}
