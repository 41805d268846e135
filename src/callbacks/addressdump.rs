use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::blockchain::parser::types::CoinType;
use crate::blockchain::proto::block::Block;
use crate::callbacks::Callback;
use crate::errors::{OpError, OpResult};

/// Dumps all receiving addresses as newline delimited text.
/// Output order follows (file, block, transaction, output) order,
/// duplicates are kept. Written lines are never retracted, even if
/// a later part of the same block fails to decode.
pub struct AddressDump {
    writer: BufWriter<File>,
    out_path: PathBuf,
    emitted: u64,
}

impl AddressDump {
    pub fn new(out_file: &Path) -> OpResult<AddressDump> {
        let file = File::create(out_file)
            .map_err(|e| tag_err!(OpError::from(e), "Unable to create `{}`!", out_file.display()))?;
        Ok(AddressDump {
            writer: BufWriter::new(file),
            out_path: out_file.to_path_buf(),
            emitted: 0,
        })
    }
}

impl Callback for AddressDump {
    fn on_start(&mut self, coin: &CoinType) -> OpResult<()> {
        debug!(target: "callback", "Dumping {} addresses to {} ...",
               coin.name, self.out_path.display());
        Ok(())
    }

    fn on_block(&mut self, block: &Block) -> OpResult<()> {
        for tx in &block.txs {
            for output in &tx.outputs {
                for address in &output.script.addresses {
                    self.writer.write_all(address.as_bytes())?;
                    self.writer.write_all(b"\n")?;
                    self.emitted += 1;
                }
            }
        }
        Ok(())
    }

    fn on_complete(&mut self) -> OpResult<()> {
        self.writer.flush()?;
        info!(target: "callback", "Done. Dumped {} addresses to {}.",
              self.emitted, self.out_path.display());
        Ok(())
    }
}
