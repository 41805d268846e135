use std::fs::File;
use std::path::Path;

use crate::blockchain::parser::stream::BufferedStream;
use crate::blockchain::parser::types::CoinType;
use crate::blockchain::proto::block::Block;
use crate::errors::{OpErrorKind, OpResult};

/// Largest serialized block accepted inside a frame
pub const MAX_BLOCK_SERIALIZED_SIZE: u32 = 4_000_000;
/// Smallest acceptable frame payload, a bare block header
pub const MIN_BLOCK_SERIALIZED_SIZE: u32 = 80;

/// The buffer must fit a whole frame ahead of the cursor while the
/// rewind window keeps one consumed frame (payload plus the 8 byte
/// magic/size prefix) addressable for resynchronization.
const STREAM_BUFFER_SIZE: usize = 2 * MAX_BLOCK_SERIALIZED_SIZE as usize;
const STREAM_REWIND_GUARANTEE: usize = MAX_BLOCK_SERIALIZED_SIZE as usize + 8;

/// Scans one blk file for framed blocks.
///
/// Frames may be separated by arbitrary garbage (zero padding from
/// preallocation, truncated writes). The scanner searches for the
/// magic marker byte-wise and falls back to the position one byte
/// past the last candidate whenever a frame turns out to be bogus,
/// so every attempt makes progress and inner markers are found.
pub struct BlockScanner {
    stream: BufferedStream<File>,
    coin: CoinType,
    rewind_cursor: u64,
}

impl BlockScanner {
    pub fn open(path: &Path, coin: &CoinType) -> OpResult<BlockScanner> {
        let file = File::open(path)?;
        let stream = BufferedStream::new(file, STREAM_BUFFER_SIZE, STREAM_REWIND_GUARANTEE);
        let rewind_cursor = stream.pos();
        Ok(BlockScanner {
            stream,
            coin: coin.clone(),
            rewind_cursor,
        })
    }

    /// Returns the next well-formed block, or None once the file is
    /// exhausted. Malformed frames are logged and skipped; only I/O
    /// failures propagate.
    pub fn advance(&mut self) -> OpResult<Option<Block>> {
        loop {
            if self.stream.eof()? {
                return Ok(None);
            }
            self.stream.set_pos(self.rewind_cursor);
            self.rewind_cursor += 1;
            self.stream.clear_limit();

            match self.next_frame() {
                Ok(Some(block)) => {
                    self.rewind_cursor = self.stream.pos();
                    return Ok(Some(block));
                }
                Ok(None) => {}
                Err(err) => match err.kind {
                    // A frame header ran into the end of the file
                    OpErrorKind::UnexpectedEof => return Ok(None),
                    OpErrorKind::IoError(_) => return Err(err),
                    _ => {
                        info!(target: "scanner", "Skipping bad frame at offset {}: {}",
                              self.rewind_cursor - 1, err);
                    }
                },
            }
        }
    }

    /// Tries to read one frame at the current resync position.
    /// Returns None if the candidate marker does not start a valid
    /// frame; the resync cursor is then already one byte past it.
    fn next_frame(&mut self) -> OpResult<Option<Block>> {
        self.stream.find_byte((self.coin.magic & 0xff) as u8)?;
        self.rewind_cursor = self.stream.pos() + 1;

        if self.stream.read_u32_le()? != self.coin.magic {
            return Ok(None);
        }
        let size = self.stream.read_u32_le()?;
        if !(MIN_BLOCK_SERIALIZED_SIZE..=MAX_BLOCK_SERIALIZED_SIZE).contains(&size) {
            trace!(target: "scanner", "Frame at offset {} claims implausible size {}",
                   self.rewind_cursor - 1, size);
            return Ok(None);
        }

        let block_pos = self.stream.pos();
        self.stream.set_limit(block_pos + u64::from(size));
        let block = self.stream.read_block(size, &self.coin)?;
        Ok(Some(block))
    }
}
