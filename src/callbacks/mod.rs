pub mod addressdump;

use crate::blockchain::parser::types::CoinType;
use crate::blockchain::proto::block::Block;
use crate::errors::OpResult;

/// Implement this trait for a custom sink.
/// The parser hands over blocks in file order; within a block the
/// transaction and output order matches the on-disk serialization.
pub trait Callback {
    /// Gets called shortly before the first file is scanned
    fn on_start(&mut self, coin: &CoinType) -> OpResult<()>;

    /// Gets called for every scanned block
    fn on_block(&mut self, block: &Block) -> OpResult<()>;

    /// Gets called when all files are handled
    fn on_complete(&mut self) -> OpResult<()>;
}
