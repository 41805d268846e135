use std::convert::From;
use std::str::FromStr;

use crate::errors::{OpError, OpErrorKind, OpResult};

/// Trait to specify the underlying network of a blockchain.
/// Needs a proper magic value to identify block frames and the
/// address prefixes for every supported script template.
/// See https://en.bitcoin.it/wiki/List_of_address_prefixes
pub trait Coin {
    // Human readable network name
    fn name(&self) -> String;
    // Magic value to identify blocks, as read as little endian u32
    fn magic(&self) -> u32;
    // Version byte for base58check p2pkh addresses
    fn p2pkh_version(&self) -> u8;
    // Version byte for base58check p2sh addresses
    fn p2sh_version(&self) -> u8;
    // Human readable part for bech32 witness addresses
    fn bech32_hrp(&self) -> String;
}

// Implemented network types.
// If you want to add your own network, create a struct with a Coin
// implementation and add the network name to from_str() below
pub struct Bitcoin;
pub struct TestNet3;
pub struct Regtest;

impl Coin for Bitcoin {
    fn name(&self) -> String {
        String::from("Bitcoin")
    }
    fn magic(&self) -> u32 {
        0xd9b4bef9
    }
    fn p2pkh_version(&self) -> u8 {
        0x00
    }
    fn p2sh_version(&self) -> u8 {
        0x05
    }
    fn bech32_hrp(&self) -> String {
        String::from("bc")
    }
}

/// Bitcoin testnet3
impl Coin for TestNet3 {
    fn name(&self) -> String {
        String::from("TestNet3")
    }
    fn magic(&self) -> u32 {
        0x0709110b
    }
    fn p2pkh_version(&self) -> u8 {
        0x6f
    }
    fn p2sh_version(&self) -> u8 {
        0xc4
    }
    fn bech32_hrp(&self) -> String {
        String::from("tb")
    }
}

impl Coin for Regtest {
    fn name(&self) -> String {
        String::from("Regtest")
    }
    fn magic(&self) -> u32 {
        0xdab5bffa
    }
    fn p2pkh_version(&self) -> u8 {
        0x6f
    }
    fn p2sh_version(&self) -> u8 {
        0xc4
    }
    fn bech32_hrp(&self) -> String {
        String::from("bcrt")
    }
}

#[derive(Clone)]
// Holds the selected network information
pub struct CoinType {
    pub name: String,
    pub magic: u32,
    pub p2pkh_version: u8,
    pub p2sh_version: u8,
    pub bech32_hrp: String,
}

impl Default for CoinType {
    #[inline]
    fn default() -> Self {
        CoinType::from(TestNet3)
    }
}

impl<T: Coin> From<T> for CoinType {
    fn from(coin: T) -> Self {
        CoinType {
            name: coin.name(),
            magic: coin.magic(),
            p2pkh_version: coin.p2pkh_version(),
            p2sh_version: coin.p2sh_version(),
            bech32_hrp: coin.bech32_hrp(),
        }
    }
}

impl FromStr for CoinType {
    type Err = OpError;
    fn from_str(coin_name: &str) -> OpResult<Self> {
        match coin_name {
            "mainnet" | "bitcoin" => Ok(CoinType::from(Bitcoin)),
            "testnet" | "testnet3" => Ok(CoinType::from(TestNet3)),
            "regtest" => Ok(CoinType::from(Regtest)),
            n => {
                let e = OpError::with_message(
                    OpErrorKind::InvalidArgsError,
                    format!("There is no network impl for `{}`!", n),
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_type_from_str() {
        assert_eq!(CoinType::from_str("mainnet").unwrap().magic, 0xd9b4bef9);
        assert_eq!(CoinType::from_str("testnet").unwrap().magic, 0x0709110b);
        assert_eq!(CoinType::from_str("regtest").unwrap().magic, 0xdab5bffa);
        assert!(CoinType::from_str("nosuchnet").is_err());
    }

    #[test]
    fn test_magic_on_disk_byte_order() {
        // The first byte of the on-disk marker is the low byte of the magic
        assert_eq!((CoinType::from(Bitcoin).magic & 0xff) as u8, 0xf9);
        assert_eq!((CoinType::from(TestNet3).magic & 0xff) as u8, 0x0b);
        assert_eq!((CoinType::from(Regtest).magic & 0xff) as u8, 0xfa);
    }

    #[test]
    fn test_default_network_is_testnet() {
        assert_eq!(CoinType::default().name, "TestNet3");
    }
}
