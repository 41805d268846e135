use std::io::{Read, Seek};

use byteorder::{ByteOrder, LittleEndian};

use crate::blockchain::parser::stream::BufferedStream;
use crate::blockchain::parser::types::CoinType;
use crate::blockchain::proto::block::Block;
use crate::blockchain::proto::header::BlockHeader;
use crate::blockchain::proto::tx::{RawTx, TxInput, TxOutpoint, TxOutput};
use crate::blockchain::proto::varuint::{VarUint, MAX_SIZE};
use crate::errors::{OpError, OpErrorKind, OpResult};

/// Structured reading of blockchain data on top of the buffered stream.
/// All primitives propagate the stream failures unchanged;
/// read_block() demotes decode failures to MalformedTransaction.
impl<R: Read + Seek> BufferedStream<R> {
    #[inline]
    pub fn read_u8(&mut self) -> OpResult<u8> {
        let mut buf = [0u8; 1];
        self.read(&mut buf)?;
        Ok(buf[0])
    }

    #[inline]
    pub fn read_u16_le(&mut self) -> OpResult<u16> {
        let mut buf = [0u8; 2];
        self.read(&mut buf)?;
        Ok(LittleEndian::read_u16(&buf))
    }

    #[inline]
    pub fn read_u32_le(&mut self) -> OpResult<u32> {
        let mut buf = [0u8; 4];
        self.read(&mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    #[inline]
    pub fn read_u64_le(&mut self) -> OpResult<u64> {
        let mut buf = [0u8; 8];
        self.read(&mut buf)?;
        Ok(LittleEndian::read_u64(&buf))
    }

    #[inline]
    pub fn read_256hash(&mut self) -> OpResult<[u8; 32]> {
        let mut arr = [0u8; 32];
        self.read(&mut arr)?;
        Ok(arr)
    }

    pub fn read_u8_vec(&mut self, count: u64) -> OpResult<Vec<u8>> {
        // Reject oversized requests before allocating
        self.check_limit(count)?;
        let mut arr = vec![0u8; count as usize];
        self.read(&mut arr)?;
        Ok(arr)
    }

    /// Reads a CompactSize of any value, enforcing minimal encoding
    pub fn read_varuint(&mut self) -> OpResult<VarUint> {
        let first = self.read_u8()?;
        let value = match first {
            0x00..=0xfc => u64::from(first),
            0xfd => {
                let v = u64::from(self.read_u16_le()?);
                if v < 0xfd {
                    return Err(OpError::new(OpErrorKind::NonCanonicalCompactInt));
                }
                v
            }
            0xfe => {
                let v = u64::from(self.read_u32_le()?);
                if v <= 0xffff {
                    return Err(OpError::new(OpErrorKind::NonCanonicalCompactInt));
                }
                v
            }
            0xff => {
                let v = self.read_u64_le()?;
                if v <= 0xffff_ffff {
                    return Err(OpError::new(OpErrorKind::NonCanonicalCompactInt));
                }
                v
            }
        };
        Ok(VarUint::new(value))
    }

    /// Reads a length-bearing CompactSize, additionally capped at MAX_SIZE
    pub fn read_compact_size(&mut self) -> OpResult<VarUint> {
        let varuint = self.read_varuint()?;
        if varuint.value > MAX_SIZE {
            return Err(OpError::new(OpErrorKind::CompactIntTooLarge));
        }
        Ok(varuint)
    }

    /// Reads one block. Does not pop magic nor blocksize.
    /// Structural failures surface as MalformedTransaction so the
    /// scanner can treat them as local to the current frame.
    pub fn read_block(&mut self, size: u32, coin: &CoinType) -> OpResult<Block> {
        match self.read_block_content(size, coin) {
            Ok(block) => Ok(block),
            Err(err) => match err.kind {
                OpErrorKind::IoError(_) => Err(err),
                _ => {
                    let desc = format!("{}", err);
                    Err(OpError::with_message(
                        OpErrorKind::MalformedTransaction,
                        desc,
                    ))
                }
            },
        }
    }

    fn read_block_content(&mut self, size: u32, coin: &CoinType) -> OpResult<Block> {
        let header = self.read_block_header()?;
        let tx_count = self.read_compact_size()?;
        let txs = self.read_txs(tx_count.value)?;
        Ok(Block::new(size, header, tx_count, txs, coin))
    }

    pub fn read_block_header(&mut self) -> OpResult<BlockHeader> {
        Ok(BlockHeader::new(
            self.read_u32_le()?,
            self.read_256hash()?,
            self.read_256hash()?,
            self.read_u32_le()?,
            self.read_u32_le()?,
            self.read_u32_le()?,
        ))
    }

    pub fn read_txs(&mut self, tx_count: u64) -> OpResult<Vec<RawTx>> {
        let mut txs = Vec::with_capacity(tx_count.min(1024) as usize);
        for _ in 0..tx_count {
            let version = self.read_u32_le()?;

            // SegWit lookahead: a zero marker byte followed by a non-zero
            // flag byte announces witness data. Everything else is the
            // start of the input count, so the cursor moves back.
            let marker_pos = self.pos();
            let mut segwit = false;
            if self.read_u8()? == 0x00 {
                segwit = self.read_u8()? != 0x00;
            }
            if !segwit {
                self.set_pos(marker_pos);
            }

            let in_count = self.read_compact_size()?;
            let inputs = self.read_tx_inputs(in_count.value)?;
            let out_count = self.read_compact_size()?;
            let outputs = self.read_tx_outputs(out_count.value)?;
            if segwit {
                self.read_witnesses(in_count.value)?;
            }
            let locktime = self.read_u32_le()?;
            txs.push(RawTx {
                version,
                in_count,
                inputs,
                out_count,
                outputs,
                locktime,
            });
        }
        Ok(txs)
    }

    pub fn read_tx_outpoint(&mut self) -> OpResult<TxOutpoint> {
        Ok(TxOutpoint::new(self.read_256hash()?, self.read_u32_le()?))
    }

    pub fn read_tx_inputs(&mut self, input_count: u64) -> OpResult<Vec<TxInput>> {
        let mut inputs = Vec::with_capacity(input_count.min(1024) as usize);
        for _ in 0..input_count {
            let outpoint = self.read_tx_outpoint()?;
            let script_len = self.read_compact_size()?;
            let script_sig = self.read_u8_vec(script_len.value)?;
            let seq_no = self.read_u32_le()?;
            inputs.push(TxInput {
                outpoint,
                script_len,
                script_sig,
                seq_no,
            });
        }
        Ok(inputs)
    }

    pub fn read_tx_outputs(&mut self, output_count: u64) -> OpResult<Vec<TxOutput>> {
        let mut outputs = Vec::with_capacity(output_count.min(1024) as usize);
        for _ in 0..output_count {
            let value = self.read_u64_le()?;
            let script_len = self.read_compact_size()?;
            let script_pubkey = self.read_u8_vec(script_len.value)?;
            outputs.push(TxOutput {
                value,
                script_len,
                script_pubkey,
            });
        }
        Ok(outputs)
    }

    /// Witness stacks are consumed to keep the stream aligned but are
    /// not retained, addresses only ever come from the output scripts
    fn read_witnesses(&mut self, input_count: u64) -> OpResult<()> {
        for _ in 0..input_count {
            let item_count = self.read_compact_size()?;
            for _ in 0..item_count.value {
                let item_len = self.read_compact_size()?;
                let _ = self.read_u8_vec(item_len.value)?;
            }
        }
        Ok(())
    }
}
