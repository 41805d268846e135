use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use crate::errors::{OpError, OpErrorKind, OpResult};

/// Ring buffered reader with bounded rewind.
///
/// The logical read cursor (`read_pos`) trails the source cursor
/// (`src_pos`) and can be moved backwards within the buffered window
/// via `set_pos()`. The last `rewind` bytes behind the read cursor are
/// never overwritten by a refill, so short backward repositioning is
/// always possible no matter how far the source has been consumed.
pub struct BufferedStream<R> {
    inner: R,             // underlying source
    buf: Vec<u8>,         // ring holding the window [src_pos - buf_size, src_pos)
    src_pos: u64,         // bytes consumed from the source
    read_pos: u64,        // bytes surfaced to the caller
    limit: Option<u64>,   // upper bound for read_pos, if set
    rewind: usize,        // guaranteed rewind window behind read_pos
    src_eof: bool,        // source returned EOF
}

impl<R: Read + Seek> BufferedStream<R> {
    pub fn new(inner: R, buf_size: usize, rewind: usize) -> BufferedStream<R> {
        assert!(rewind < buf_size);
        BufferedStream {
            inner,
            buf: vec![0u8; buf_size],
            src_pos: 0,
            read_pos: 0,
            limit: None,
            rewind,
            src_eof: false,
        }
    }

    /// Returns the current read position (total bytes surfaced)
    #[inline]
    pub fn pos(&self) -> u64 {
        self.read_pos
    }

    /// Bytes buffered ahead of the read cursor
    #[inline]
    fn buffered(&self) -> u64 {
        self.src_pos - self.read_pos
    }

    /// Moves the read cursor within the buffered window.
    /// Returns false and clamps to the nearest valid position if `pos`
    /// is outside of it. Positions up to `rewind` bytes behind the
    /// current cursor are always reachable.
    pub fn set_pos(&mut self, pos: u64) -> bool {
        let window = self.src_pos.min(self.buf.len() as u64);
        let low = self.src_pos - window;
        if pos < low {
            self.read_pos = low;
            false
        } else if pos > self.src_pos {
            self.read_pos = self.src_pos;
            false
        } else {
            self.read_pos = pos;
            true
        }
    }

    /// True file seek. Invalidates the buffered window and resets both
    /// cursors to `pos`. Returns false if the underlying seek failed.
    pub fn seek(&mut self, pos: u64) -> bool {
        match self.inner.seek(SeekFrom::Start(pos)) {
            Ok(_) => {
                self.src_pos = pos;
                self.read_pos = pos;
                self.src_eof = false;
                true
            }
            Err(_) => false,
        }
    }

    /// Sets an upper bound for the read cursor.
    /// Refuses limits below the current position.
    pub fn set_limit(&mut self, limit: u64) -> bool {
        if limit < self.read_pos {
            return false;
        }
        self.limit = Some(limit);
        true
    }

    pub fn clear_limit(&mut self) {
        self.limit = None;
    }

    /// True iff all surfaced bytes are consumed and the source is exhausted
    pub fn eof(&mut self) -> OpResult<bool> {
        if self.read_pos < self.src_pos {
            return Ok(false);
        }
        if self.src_eof {
            return Ok(true);
        }
        Ok(self.refill()? == 0)
    }

    /// Copies exactly `dst.len()` bytes into `dst`, refilling from the
    /// source as needed
    pub fn read(&mut self, dst: &mut [u8]) -> OpResult<()> {
        self.check_limit(dst.len() as u64)?;
        while self.buffered() < dst.len() as u64 {
            if self.refill()? == 0 {
                if self.src_eof {
                    return Err(OpError::new(OpErrorKind::UnexpectedEof));
                }
                // Caller wants more bytes than the ring can hold at once
                return Err(OpError::with_message(
                    OpErrorKind::RuntimeError,
                    String::from("Read request exceeds the buffered window."),
                ));
            }
        }

        let buf_len = self.buf.len();
        let mut copied = 0;
        while copied < dst.len() {
            let idx = ((self.read_pos + copied as u64) % buf_len as u64) as usize;
            let chunk = (buf_len - idx).min(dst.len() - copied);
            dst[copied..copied + chunk].copy_from_slice(&self.buf[idx..idx + chunk]);
            copied += chunk;
        }
        self.read_pos += dst.len() as u64;
        Ok(())
    }

    /// Advances the read cursor until the byte at the current position
    /// equals `byte`. The cursor is left ON the match, not behind it.
    pub fn find_byte(&mut self, byte: u8) -> OpResult<()> {
        let buf_len = self.buf.len() as u64;
        loop {
            while self.read_pos < self.src_pos {
                if self.buf[(self.read_pos % buf_len) as usize] == byte {
                    return Ok(());
                }
                self.read_pos += 1;
            }
            if self.refill()? == 0 {
                return Err(OpError::new(OpErrorKind::UnexpectedEof));
            }
        }
    }

    /// Fails with ReadPastLimit if the next `wanted` bytes would cross
    /// the configured limit
    #[inline]
    pub fn check_limit(&self, wanted: u64) -> OpResult<()> {
        if let Some(limit) = self.limit {
            if self.read_pos + wanted > limit {
                return Err(OpError::new(OpErrorKind::ReadPastLimit));
            }
        }
        Ok(())
    }

    /// Fills the contiguous ring region after `src_pos`, bounded by the
    /// wrap to the buffer end and by the capacity that must stay intact
    /// for the rewind window. Returns the number of bytes fetched,
    /// 0 on EOF or when the ring is full.
    fn refill(&mut self) -> OpResult<usize> {
        if self.src_eof {
            return Ok(0);
        }
        let buf_len = self.buf.len() as u64;
        let used = self.buffered() + self.rewind as u64;
        let free = buf_len.saturating_sub(used) as usize;
        if free == 0 {
            return Ok(0);
        }
        let idx = (self.src_pos % buf_len) as usize;
        let end = idx + free.min(self.buf.len() - idx);
        let n = self.inner.read(&mut self.buf[idx..end])?;
        if n == 0 {
            self.src_eof = true;
        }
        self.src_pos += n as u64;
        Ok(n)
    }
}

impl<R> fmt::Debug for BufferedStream<R> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("BufferedStream")
            .field("src_pos", &self.src_pos)
            .field("read_pos", &self.read_pos)
            .field("limit", &self.limit)
            .field("buf_size", &self.buf.len())
            .field("rewind", &self.rewind)
            .finish()
    }
}
