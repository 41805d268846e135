use std::fmt;

use crate::blockchain::parser::types::CoinType;
use crate::blockchain::proto::header::BlockHeader;
use crate::blockchain::proto::tx::{EvaluatedTx, RawTx};
use crate::blockchain::proto::varuint::VarUint;

/// Basic block structure which holds all information
pub struct Block {
    pub size: u32,
    pub header: BlockHeader,
    pub tx_count: VarUint,
    pub txs: Vec<EvaluatedTx>,
}

impl Block {
    pub fn new(
        size: u32,
        header: BlockHeader,
        tx_count: VarUint,
        txs: Vec<RawTx>,
        coin: &CoinType,
    ) -> Block {
        let txs = txs
            .into_iter()
            .map(|raw| EvaluatedTx::new(raw, coin))
            .collect();
        Block {
            size,
            header,
            tx_count,
            txs,
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Block")
            .field("size", &self.size)
            .field("header", &self.header)
            .field("tx_count", &self.tx_count)
            .finish()
    }
}
