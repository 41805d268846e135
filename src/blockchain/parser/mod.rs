use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::blockchain::parser::blkfile::BlkFile;
use crate::blockchain::parser::scanner::BlockScanner;
use crate::blockchain::parser::types::CoinType;
use crate::blockchain::proto::block::Block;
use crate::callbacks::Callback;
use crate::errors::OpResult;
use crate::ParserOptions;

pub mod blkfile;
pub mod reader;
pub mod scanner;
pub mod stream;
pub mod types;

/// Small struct to hold statistics together
struct ScanStats {
    pub t_started: Instant,
    pub t_last_log: Instant,
    pub t_measure_frame: Duration,
    pub n_blocks: u64,
}

impl Default for ScanStats {
    fn default() -> Self {
        Self {
            t_started: Instant::now(),
            t_last_log: Instant::now(),
            t_measure_frame: Duration::from_secs(10),
            n_blocks: 0,
        }
    }
}

/// Walks the blk file sequence and feeds every scanned block to the
/// configured callback
pub struct AddressParser {
    callback: Box<dyn Callback>,
    coin_type: CoinType,
    blockchain_dir: PathBuf,
    stats: ScanStats,
}

impl AddressParser {
    pub fn new(options: ParserOptions) -> Self {
        info!(target: "parser", "Scanning {} blockchain in {} ...",
              options.coin_type.name, options.blockchain_dir.display());
        Self {
            callback: options.callback,
            coin_type: options.coin_type,
            blockchain_dir: options.blockchain_dir,
            stats: ScanStats::default(),
        }
    }

    pub fn start(&mut self) -> OpResult<()> {
        debug!(target: "parser", "Starting scan ...");
        let now = Instant::now();
        self.stats.t_started = now;
        self.stats.t_last_log = now;
        self.callback.on_start(&self.coin_type)?;

        let mut blk_index = 0;
        while let Some(blk_file) = BlkFile::next_in_sequence(&self.blockchain_dir, blk_index) {
            info!(target: "parser", "Scanning {} ({} bytes) ...",
                  blk_file.path.display(), blk_file.size);
            let mut scanner = BlockScanner::open(&blk_file.path, &self.coin_type)
                .map_err(|e| tag_err!(e, "Unable to open `{}`!", blk_file.path.display()))?;
            while let Some(block) = scanner.advance()? {
                self.on_block(&block)?;
            }
            blk_index += 1;
        }

        if blk_index == 0 {
            warn!(target: "parser", "No blk files found in {}!",
                  self.blockchain_dir.display());
        }
        info!(target: "parser", "Done. Processed {} blocks from {} files in {:.2} minutes.",
              self.stats.n_blocks, blk_index,
              (Instant::now() - self.stats.t_started).as_secs_f32() / 60.0);
        self.callback.on_complete()
    }

    /// Triggers the on_block() callback and updates statistics
    fn on_block(&mut self, block: &Block) -> OpResult<()> {
        self.callback.on_block(block)?;
        self.stats.n_blocks += 1;
        trace!(target: "parser", "on_block() called, {:?}", block);
        self.print_progress();
        Ok(())
    }

    fn print_progress(&mut self) {
        let now = Instant::now();
        let blocks_sec = self
            .stats
            .n_blocks
            .checked_div((now - self.stats.t_started).as_secs())
            .unwrap_or(self.stats.n_blocks);

        if now - self.stats.t_last_log > self.stats.t_measure_frame {
            info!(target: "parser", "Status: {:6} Blocks processed. (avg: {:5.2} blocks/sec)",
                  self.stats.n_blocks, blocks_sec);
            self.stats.t_last_log = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::parser::types::Bitcoin;
    use crate::blockchain::proto::header::BlockHeader;
    use crate::blockchain::proto::varuint::VarUint;
    use crate::blockchain::proto::ToRaw;
    use crate::callbacks::addressdump::AddressDump;
    use log::LevelFilter;
    use std::fs;
    use std::path::Path;

    fn build_tx(scripts: &[Vec<u8>]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&VarUint::new(1).to_bytes());
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.extend_from_slice(&0xffff_ffffu32.to_le_bytes());
        bytes.extend_from_slice(&VarUint::new(0).to_bytes());
        bytes.extend_from_slice(&0xffff_ffffu32.to_le_bytes());
        bytes.extend_from_slice(&VarUint::new(scripts.len() as u64).to_bytes());
        for script in scripts {
            bytes.extend_from_slice(&50u64.to_le_bytes());
            bytes.extend_from_slice(&VarUint::new(script.len() as u64).to_bytes());
            bytes.extend_from_slice(script);
        }
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes
    }

    fn build_block(txs: &[Vec<u8>]) -> Vec<u8> {
        let header = BlockHeader::new(1, [0u8; 32], [0u8; 32], 1231006505, 0x1d00ffff, 42);
        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(&VarUint::new(txs.len() as u64).to_bytes());
        for tx in txs {
            bytes.extend_from_slice(tx);
        }
        bytes
    }

    fn build_frame(magic: u32, block: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + block.len());
        bytes.extend_from_slice(&magic.to_le_bytes());
        bytes.extend_from_slice(&(block.len() as u32).to_le_bytes());
        bytes.extend_from_slice(block);
        bytes
    }

    /// First file: p2pkh + p2wpkh outputs behind leading garbage.
    /// Second file: p2sh + p2tr outputs plus two addressless scripts.
    fn seed_blk_files(dir: &Path, magic: u32) {
        let mut script_a = vec![0x76, 0xa9, 0x14];
        script_a.extend_from_slice(&[0u8; 20]);
        script_a.extend_from_slice(&[0x88, 0xac]);
        let mut script_b = vec![0x00, 0x14];
        script_b.extend_from_slice(&[0u8; 20]);

        let mut file0 = Vec::new();
        file0.extend_from_slice(b"some garbage before the first frame");
        file0.extend_from_slice(&build_frame(
            magic,
            &build_block(&[build_tx(&[script_a, script_b])]),
        ));
        file0.extend_from_slice(&[0u8; 64]);
        fs::write(dir.join("blk00000.dat"), &file0).unwrap();

        let mut script_c = vec![0xa9, 0x14];
        script_c.extend_from_slice(&[0u8; 20]);
        script_c.push(0x87);
        let mut script_d = vec![0x51, 0x20];
        script_d.extend_from_slice(&[0u8; 32]);
        let script_op_return = vec![0x6a, 0x02, 0xaa, 0xbb];
        let script_unknown = vec![0x73, 0x63];

        let file1 = build_frame(
            magic,
            &build_block(&[build_tx(&[
                script_c,
                script_op_return,
                script_d,
                script_unknown,
            ])]),
        );
        fs::write(dir.join("blk00001.dat"), &file1).unwrap();
    }

    const EXPECTED: &str = "1111111111111111111114oLvT2\n\
                            bc1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq9e75rs\n\
                            31h1vYVSYuKP6AhS86fbRdMw9XHieotbST\n\
                            bc1pqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqpqqenm\n";

    fn run_parser(blocks_dir: &Path, out_file: &Path) {
        let options = ParserOptions {
            callback: Box::new(AddressDump::new(out_file).unwrap()),
            coin_type: CoinType::from(Bitcoin),
            blockchain_dir: blocks_dir.to_path_buf(),
            log_level_filter: LevelFilter::Info,
        };
        AddressParser::new(options).start().unwrap();
    }

    #[test]
    fn test_end_to_end_address_dump() {
        let dir = tempfile::tempdir().unwrap();
        let coin = CoinType::from(Bitcoin);
        seed_blk_files(dir.path(), coin.magic);

        let out_file = dir.path().join("addresses.txt");
        run_parser(dir.path(), &out_file);

        assert_eq!(EXPECTED, fs::read_to_string(&out_file).unwrap());
    }

    #[test]
    fn test_scanning_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let coin = CoinType::from(Bitcoin);
        seed_blk_files(dir.path(), coin.magic);

        let out_a = dir.path().join("a.txt");
        let out_b = dir.path().join("b.txt");
        run_parser(dir.path(), &out_a);
        run_parser(dir.path(), &out_b);

        assert_eq!(fs::read(&out_a).unwrap(), fs::read(&out_b).unwrap());
    }

    #[test]
    fn test_gap_in_sequence_stops_scan() {
        let dir = tempfile::tempdir().unwrap();
        let coin = CoinType::from(Bitcoin);
        seed_blk_files(dir.path(), coin.magic);
        // Rename the second file so the sequence has a hole
        fs::rename(
            dir.path().join("blk00001.dat"),
            dir.path().join("blk00002.dat"),
        )
        .unwrap();

        let out_file = dir.path().join("addresses.txt");
        run_parser(dir.path(), &out_file);

        let dumped = fs::read_to_string(&out_file).unwrap();
        assert_eq!(
            "1111111111111111111114oLvT2\n\
             bc1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq9e75rs\n",
            dumped
        );
    }
}
