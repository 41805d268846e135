use std::convert::From;
use std::error;
use std::fmt;

use bech32::{u5, ToBase32, Variant};
use rust_base58::ToBase58;

use crate::blockchain::parser::types::CoinType;
use crate::blockchain::proto::opcodes;
use crate::common::utils;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScriptError {
    UnexpectedEof,
    InvalidFormat,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match *self {
            ScriptError::UnexpectedEof => "Unexpected EOF",
            ScriptError::InvalidFormat => "Invalid Script format",
        };
        write!(f, "{}", str)
    }
}

impl error::Error for ScriptError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScriptPattern {
    /// Null Data
    /// Pubkey Script: OP_RETURN <0 to 80 bytes of data> (formerly 40 bytes)
    /// Null data scripts cannot be spent, so there's no signature script.
    OpReturn(String),

    /// Pay to Multisig [BIP11]
    /// Pubkey script: <m> <A pubkey>[B pubkey][C pubkey...] <n> OP_CHECKMULTISIG
    /// Signature script: OP_0 <A sig>[B sig][C sig...]
    Pay2MultiSig,

    /// Pay to Public Key (p2pk) scripts are a simplified form of the p2pkh,
    /// but aren't commonly used in new transactions anymore,
    /// because p2pkh scripts are more secure (the public key is not revealed until the output is spent).
    Pay2PublicKey,

    /// Pay to Public Key Hash (p2pkh)
    /// This is the most commonly used transaction output script.
    /// It's used to pay to a bitcoin address (a bitcoin address is a public key hash encoded in base58check)
    Pay2PublicKeyHash,

    /// Pay to Script Hash [p2sh/BIP16]
    /// The redeem script may be any pay type, but only multisig makes sense.
    /// Pubkey script: OP_HASH160 <Hash160(redeemScript)> OP_EQUAL
    /// Signature script: <sig>[sig][sig...] <redeemScript>
    Pay2ScriptHash,

    /// Native SegWit v0 program carrying a 20 byte public key hash [BIP141]
    Pay2WitnessPublicKeyHash,

    /// Native SegWit v0 program carrying a 32 byte script hash [BIP141]
    Pay2WitnessScriptHash,

    /// A Taproot output is a native SegWit output (see BIP141) with version number 1, and a 32-byte witness program.
    /// See https://github.com/bitcoin/bips/blob/master/bip-0341.mediawiki#constructing-and-spending-taproot-outputs
    Pay2Taproot,

    /// The script is valid but does not conform to the standard templates.
    /// Such scripts are always accepted if they are mined into blocks, but
    /// transactions with non-standard scripts may not be forwarded by peers.
    NotRecognised,

    Error(ScriptError),
}

impl fmt::Display for ScriptPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ScriptPattern::OpReturn(_) => write!(f, "OpReturn"),
            ScriptPattern::Pay2MultiSig => write!(f, "Pay2MultiSig"),
            ScriptPattern::Pay2PublicKey => write!(f, "Pay2PublicKey"),
            ScriptPattern::Pay2PublicKeyHash => write!(f, "Pay2PublicKeyHash"),
            ScriptPattern::Pay2ScriptHash => write!(f, "Pay2ScriptHash"),
            ScriptPattern::Pay2WitnessPublicKeyHash => write!(f, "Pay2WitnessPublicKeyHash"),
            ScriptPattern::Pay2WitnessScriptHash => write!(f, "Pay2WitnessScriptHash"),
            ScriptPattern::Pay2Taproot => write!(f, "Pay2Taproot"),
            ScriptPattern::NotRecognised => write!(f, "NotRecognised"),
            ScriptPattern::Error(ref err) => write!(f, "ScriptError: {}", err),
        }
    }
}

pub enum StackElement {
    Op(opcodes::All),
    Data(Vec<u8>),
}

impl StackElement {
    /// Extracts the underlying byte array, if any
    #[inline]
    pub fn data(&self) -> Option<&[u8]> {
        match *self {
            StackElement::Op(_) => None,
            StackElement::Data(ref d) => Some(d),
        }
    }
}

impl PartialEq for StackElement {
    /// Data elements compare equal regardless of content, Op elements by opcode
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match *self {
            StackElement::Op(code) => match *other {
                StackElement::Op(p_code) => code == p_code,
                StackElement::Data(_) => false,
            },
            StackElement::Data(_) => matches!(*other, StackElement::Data(_)),
        }
    }
}

impl fmt::Debug for StackElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StackElement::Op(ref op) => write!(f, "{:?}", &op),
            StackElement::Data(ref d) => write!(f, "{}", &utils::arr_to_hex(d)),
        }
    }
}

/// Simple stack structure to match against patterns
pub struct Stack {
    pub pattern: ScriptPattern,
    pub elements: Vec<StackElement>,
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            self.elements
                .iter()
                .map(|e| format!("{:?}", &e))
                .collect::<Vec<String>>()
                .join(" ")
        )
    }
}

#[derive(Clone)]
pub struct EvaluatedScript {
    pub addresses: Vec<String>,
    pub pattern: ScriptPattern,
}

/// Evaluates scripts
pub struct ScriptEvaluator<'a> {
    bytes: &'a [u8],
    n_bytes: usize,
    pub ip: usize,
}

impl<'a> ScriptEvaluator<'a> {
    #[inline]
    pub fn new(bytes: &'a [u8]) -> ScriptEvaluator {
        ScriptEvaluator {
            bytes,
            n_bytes: bytes.len(),
            ip: 0,
        }
    }

    /// Evaluates script by loading all data into the stack
    pub fn eval(&mut self) -> Result<Stack, ScriptError> {
        let mut elements = Vec::with_capacity(10);
        while self.ip < self.n_bytes {
            let opcode = opcodes::All::from(self.bytes[self.ip]);
            let opcode_class = opcode.classify();
            let data_len = self.maybe_push_data(opcode, opcode_class)?;
            self.ip += 1;

            if data_len > 0 {
                if self.ip + data_len > self.n_bytes {
                    return Err(ScriptError::UnexpectedEof);
                } else {
                    let data = Vec::from(&self.bytes[self.ip..self.ip + data_len]);
                    elements.push(StackElement::Data(data));
                    self.ip += data_len;
                }
            } else if opcode_class != opcodes::Class::NoOp {
                elements.push(StackElement::Op(opcode));
            }
        }
        let pattern = ScriptEvaluator::eval_script_pattern(&elements);
        Ok(Stack { elements, pattern })
    }

    /// Checks Opcode if should to push some bytes
    /// Especially opcodes between 0x00 and 0x4e
    fn maybe_push_data(
        &mut self,
        opcode: opcodes::All,
        opcode_class: opcodes::Class,
    ) -> Result<usize, ScriptError> {
        let data_len = if let opcodes::Class::PushBytes(n) = opcode_class {
            n as usize
        } else {
            match opcode {
                opcodes::All::OP_PUSHDATA1 => {
                    if self.ip + 1 > self.n_bytes {
                        return Err(ScriptError::UnexpectedEof);
                    }
                    let val = ScriptEvaluator::read_uint(&self.bytes[self.ip + 1..], 1)?;
                    self.ip += 1;
                    val
                }
                opcodes::All::OP_PUSHDATA2 => {
                    if self.ip + 2 > self.n_bytes {
                        return Err(ScriptError::UnexpectedEof);
                    }
                    let val = ScriptEvaluator::read_uint(&self.bytes[self.ip + 1..], 2)?;
                    self.ip += 2;
                    val
                }
                opcodes::All::OP_PUSHDATA4 => {
                    if self.ip + 4 > self.n_bytes {
                        return Err(ScriptError::UnexpectedEof);
                    }
                    let val = ScriptEvaluator::read_uint(&self.bytes[self.ip + 1..], 4)?;
                    self.ip += 4;
                    val
                }
                _ => 0,
            }
        };
        Ok(data_len)
    }

    fn eval_script_pattern(elements: &[StackElement]) -> ScriptPattern {
        // Pay to public key hash (p2pkh)
        let p2pkh = [
            StackElement::Op(opcodes::All::OP_DUP),
            StackElement::Op(opcodes::All::OP_HASH160),
            StackElement::Data(Vec::new()),
            StackElement::Op(opcodes::All::OP_EQUALVERIFY),
            StackElement::Op(opcodes::All::OP_CHECKSIG),
        ];
        if ScriptEvaluator::match_stack_pattern(elements, &p2pkh) {
            if data_len(&elements[2]) == Some(20) {
                return ScriptPattern::Pay2PublicKeyHash;
            }
            return ScriptPattern::NotRecognised;
        }

        // Pay to public key (p2pk)
        let p2pk = [
            StackElement::Data(Vec::new()),
            StackElement::Op(opcodes::All::OP_CHECKSIG),
        ];
        if ScriptEvaluator::match_stack_pattern(elements, &p2pk) {
            if matches!(data_len(&elements[0]), Some(33) | Some(65)) {
                return ScriptPattern::Pay2PublicKey;
            }
            return ScriptPattern::NotRecognised;
        }

        // Pay to script hash (p2sh)
        let p2sh = [
            StackElement::Op(opcodes::All::OP_HASH160),
            StackElement::Data(Vec::new()),
            StackElement::Op(opcodes::All::OP_EQUAL),
        ];
        if ScriptEvaluator::match_stack_pattern(elements, &p2sh) {
            if data_len(&elements[1]) == Some(20) {
                return ScriptPattern::Pay2ScriptHash;
            }
            return ScriptPattern::NotRecognised;
        }

        // Native witness programs: a version opcode followed by one push
        if elements.len() == 2 {
            if let (StackElement::Op(version), Some(program_len)) =
                (&elements[0], data_len(&elements[1]))
            {
                match (version.classify(), program_len) {
                    (opcodes::Class::PushBytes(0), 20) => {
                        return ScriptPattern::Pay2WitnessPublicKeyHash
                    }
                    (opcodes::Class::PushBytes(0), 32) => {
                        return ScriptPattern::Pay2WitnessScriptHash
                    }
                    (opcodes::Class::PushNum(1), 32) => return ScriptPattern::Pay2Taproot,
                    _ => {}
                }
            }
        }

        // Data output
        // pubkey: OP_RETURN <0 to 80 bytes of data>
        if let Some(StackElement::Op(op)) = elements.first() {
            if *op == opcodes::All::OP_RETURN {
                let data = elements
                    .get(1)
                    .and_then(|e| e.data())
                    .map(|d| String::from_utf8_lossy(d).into_owned())
                    .unwrap_or_default();
                return ScriptPattern::OpReturn(data);
            }
        }

        // Bare multisig m-of-n
        if multisig_pubkeys(elements).is_some() {
            return ScriptPattern::Pay2MultiSig;
        }

        ScriptPattern::NotRecognised
    }

    /// Read a script-encoded unsigned integer.
    #[inline]
    fn read_uint(data: &[u8], size: usize) -> Result<usize, ScriptError> {
        if data.len() < size {
            Err(ScriptError::UnexpectedEof)
        } else {
            let mut ret = 0;
            for (i, item) in data.iter().enumerate().take(size) {
                ret += (*item as usize) << (i * 8);
            }
            Ok(ret)
        }
    }

    /// Matches stack elements against a defined pattern.
    /// For StackElement::Data() we just make a type comparison
    #[inline]
    pub fn match_stack_pattern(elements: &[StackElement], pattern: &[StackElement]) -> bool {
        let plen = pattern.len();
        if elements.len() != plen {
            return false;
        }
        for i in 0..plen {
            if elements[i] != pattern[i] {
                return false;
            }
        }
        true
    }
}

#[inline]
fn data_len(element: &StackElement) -> Option<usize> {
    element.data().map(<[u8]>::len)
}

/// Extracts the m-of-n public keys if the stack forms a bare multisig script.
/// Pushes that are no plausible public keys disqualify the whole script.
fn multisig_pubkeys(elements: &[StackElement]) -> Option<Vec<&[u8]>> {
    if elements.len() < 4 {
        return None;
    }
    let m = push_num(&elements[0])?;
    let n = push_num(&elements[elements.len() - 2])?;
    match elements.last() {
        Some(StackElement::Op(op)) if *op == opcodes::All::OP_CHECKMULTISIG => {}
        _ => return None,
    }
    if m < 1 || m > n || n > 16 || n as usize != elements.len() - 3 {
        return None;
    }
    let mut keys = Vec::with_capacity(n as usize);
    for element in &elements[1..elements.len() - 2] {
        match element.data() {
            Some(key) if key.len() == 33 || key.len() == 65 => keys.push(key),
            _ => return None,
        }
    }
    Some(keys)
}

#[inline]
fn push_num(element: &StackElement) -> Option<i64> {
    match *element {
        StackElement::Op(op) => match op.classify() {
            opcodes::Class::PushNum(n) => Some(n),
            _ => None,
        },
        StackElement::Data(_) => None,
    }
}

/// Extracts all receiving addresses from a ScriptPubKey.
/// This never fails: scripts outside the known templates yield no addresses.
#[inline]
pub fn eval_from_bytes(bytes: &[u8], coin: &CoinType) -> EvaluatedScript {
    match ScriptEvaluator::new(bytes).eval() {
        Ok(stack) => eval_from_stack(stack, coin),
        Err(err) => EvaluatedScript {
            addresses: Vec::new(),
            pattern: ScriptPattern::Error(err),
        },
    }
}

/// Extracts addresses from an evaluated script stack
pub fn eval_from_stack(stack: Stack, coin: &CoinType) -> EvaluatedScript {
    let addresses = match stack.pattern {
        ScriptPattern::Pay2PublicKey => match stack.elements[0].data() {
            Some(pub_key) => vec![public_key_to_addr(pub_key, coin.p2pkh_version)],
            None => Vec::new(),
        },
        ScriptPattern::Pay2PublicKeyHash => match stack.elements[2].data() {
            Some(h160) => vec![hash_160_to_address(h160, coin.p2pkh_version)],
            None => Vec::new(),
        },
        ScriptPattern::Pay2ScriptHash => match stack.elements[1].data() {
            Some(h160) => vec![hash_160_to_address(h160, coin.p2sh_version)],
            None => Vec::new(),
        },
        ScriptPattern::Pay2WitnessPublicKeyHash | ScriptPattern::Pay2WitnessScriptHash => stack
            .elements[1]
            .data()
            .and_then(|program| witness_program_to_address(program, 0, coin))
            .into_iter()
            .collect(),
        ScriptPattern::Pay2Taproot => stack.elements[1]
            .data()
            .and_then(|program| witness_program_to_address(program, 1, coin))
            .into_iter()
            .collect(),
        ScriptPattern::Pay2MultiSig => multisig_pubkeys(&stack.elements)
            .map(|keys| {
                keys.iter()
                    .map(|key| public_key_to_addr(key, coin.p2pkh_version))
                    .collect()
            })
            .unwrap_or_default(),
        ScriptPattern::OpReturn(_) | ScriptPattern::NotRecognised | ScriptPattern::Error(_) => {
            Vec::new()
        }
    };
    EvaluatedScript {
        addresses,
        pattern: stack.pattern,
    }
}

/// Takes a full ECDSA public key (33 or 65 bytes) and a version id
fn public_key_to_addr(pub_key: &[u8], version: u8) -> String {
    hash_160_to_address(&utils::hash_160(pub_key), version)
}

/// Takes 20 byte public key hash and version id
fn hash_160_to_address(h160: &[u8], version: u8) -> String {
    let mut payload = Vec::with_capacity(h160.len() + 5);
    payload.push(version);
    payload.extend_from_slice(h160);

    let checksum = utils::double_sha256(&payload);
    payload.extend_from_slice(&checksum[0..4]);
    payload.to_base58()
}

/// Encodes a witness program per BIP-173, or BIP-350 for version 1 and above
fn witness_program_to_address(program: &[u8], witness_version: u8, coin: &CoinType) -> Option<String> {
    let variant = if witness_version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    };
    let mut data = vec![u5::try_from_u8(witness_version).ok()?];
    data.extend(program.to_base32());
    bech32::encode(&coin.bech32_hrp, data, variant).ok()
}

#[cfg(test)]
mod tests {
    use super::{eval_from_bytes, eval_from_stack, ScriptError, ScriptEvaluator, ScriptPattern};
    use crate::blockchain::parser::types::{Bitcoin, CoinType, Regtest, TestNet3};

    #[test]
    fn test_bitcoin_script_p2pkh() {
        // Raw output script: 76a91412ab8dc588ca9d5787dde7eb29569da63c3a238c88ac
        //                    OP_DUP OP_HASH160 OP_PUSHDATA0(20 bytes) 12ab8dc588ca9d5787dde7eb29569da63c3a238c OP_EQUALVERIFY OP_CHECKSIG
        let bytes = [
            0x76, 0xa9, 0x14, 0x12, 0xab, 0x8d, 0xc5, 0x88, 0xca, 0x9d, 0x57, 0x87, 0xdd, 0xe7,
            0xeb, 0x29, 0x56, 0x9d, 0xa6, 0x3c, 0x3a, 0x23, 0x8c, 0x88, 0xac,
        ];
        let mut script = ScriptEvaluator::new(&bytes);
        let stack = script.eval().unwrap();
        assert_eq!(
            "OP_DUP OP_HASH160 12ab8dc588ca9d5787dde7eb29569da63c3a238c OP_EQUALVERIFY OP_CHECKSIG",
            format!("{:?}", stack)
        );

        let script = eval_from_stack(stack, &CoinType::from(Bitcoin));
        assert_eq!(
            script.addresses,
            vec![String::from("12higDjoCCNXSA95xZMWUdPvXNmkAduhWv")]
        );
        assert_eq!(script.pattern, ScriptPattern::Pay2PublicKeyHash);
    }

    #[test]
    fn test_bitcoin_script_p2pkh_zero_hash() {
        let mut bytes = vec![0x76, 0xa9, 0x14];
        bytes.extend_from_slice(&[0u8; 20]);
        bytes.extend_from_slice(&[0x88, 0xac]);

        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert_eq!(
            script.addresses,
            vec![String::from("1111111111111111111114oLvT2")]
        );

        let script = eval_from_bytes(&bytes, &CoinType::from(TestNet3));
        assert_eq!(
            script.addresses,
            vec![String::from("mfWxJ45yp2SFn7UciZyNpvDKrzbhyfKrY8")]
        );
    }

    #[test]
    fn test_bitcoin_script_p2pk() {
        // https://blockchain.info/tx/e36f06a8dfe44c3d64be2d3fe56c77f91f6a39da4a5ffc086ecb5db9664e8583
        // Raw output script: 0x41 0x044bca633a91de10df85a63d0a24cb09783148fe0e16c92e937fc4491580c860757148effa0595a955f44078b48ba67fa198782e8bb68115da0daa8fde5301f7f9 OP_CHECKSIG
        let bytes = [
            0x41, // Push next 65 bytes
            0x04, 0x4b, 0xca, 0x63, 0x3a, 0x91, 0xde, 0x10, 0xdf, 0x85, 0xa6, 0x3d, 0x0a, 0x24,
            0xcb, 0x09, 0x78, 0x31, 0x48, 0xfe, 0x0e, 0x16, 0xc9, 0x2e, 0x93, 0x7f, 0xc4, 0x49,
            0x15, 0x80, 0xc8, 0x60, 0x75, 0x71, 0x48, 0xef, 0xfa, 0x05, 0x95, 0xa9, 0x55, 0xf4,
            0x40, 0x78, 0xb4, 0x8b, 0xa6, 0x7f, 0xa1, 0x98, 0x78, 0x2e, 0x8b, 0xb6, 0x81, 0x15,
            0xda, 0x0d, 0xaa, 0x8f, 0xde, 0x53, 0x01, 0xf7, 0xf9, 0xac,
        ]; // OP_CHECKSIG
        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert_eq!(
            script.addresses,
            vec![String::from("1LEWwJkDj8xriE87ALzQYcHjTmD8aqDj1f")]
        );
        assert_eq!(script.pattern, ScriptPattern::Pay2PublicKey);
    }

    #[test]
    fn test_bitcoin_script_p2ms() {
        // 2-of-3 Multi sig output
        // OP_2 33 0x022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da
        // 33 0x03e3818b65bcc73a7d64064106a859cc1a5a728c4345ff0b641209fba0d90de6e9
        // 33 0x021f2f6e1e50cb6a953935c3601284925decd3fd21bc445712576873fb8c6ebc18 OP_3 OP_CHECKMULTISIG
        let bytes = [
            0x52, 0x21, 0x02, 0x2d, 0xf8, 0x75, 0x04, 0x80, 0xad, 0x5b, 0x26, 0x95, 0x0b, 0x25,
            0xc7, 0xba, 0x79, 0xd3, 0xe3, 0x7d, 0x75, 0xf6, 0x40, 0xf8, 0xe5, 0xd9, 0xbc, 0xd5,
            0xb1, 0x50, 0xa0, 0xf8, 0x50, 0x14, 0xda, 0x21, 0x03, 0xe3, 0x81, 0x8b, 0x65, 0xbc,
            0xc7, 0x3a, 0x7d, 0x64, 0x06, 0x41, 0x06, 0xa8, 0x59, 0xcc, 0x1a, 0x5a, 0x72, 0x8c,
            0x43, 0x45, 0xff, 0x0b, 0x64, 0x12, 0x09, 0xfb, 0xa0, 0xd9, 0x0d, 0xe6, 0xe9, 0x21,
            0x02, 0x1f, 0x2f, 0x6e, 0x1e, 0x50, 0xcb, 0x6a, 0x95, 0x39, 0x35, 0xc3, 0x60, 0x12,
            0x84, 0x92, 0x5d, 0xec, 0xd3, 0xfd, 0x21, 0xbc, 0x44, 0x57, 0x12, 0x57, 0x68, 0x73,
            0xfb, 0x8c, 0x6e, 0xbc, 0x18, 0x53, 0xae,
        ];
        let mut script = ScriptEvaluator::new(&bytes);
        let stack = script.eval().unwrap();
        assert_eq!("OP_PUSHNUM_2 022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da \
                   03e3818b65bcc73a7d64064106a859cc1a5a728c4345ff0b641209fba0d90de6e9 \
                   021f2f6e1e50cb6a953935c3601284925decd3fd21bc445712576873fb8c6ebc18 OP_PUSHNUM_3 OP_CHECKMULTISIG",
                   format!("{:?}", stack));
        assert_eq!(stack.pattern, ScriptPattern::Pay2MultiSig);

        // One p2pkh style address per contained public key
        let script = eval_from_stack(stack, &CoinType::from(Bitcoin));
        assert_eq!(script.addresses.len(), 3);
        for address in &script.addresses {
            assert!(address.starts_with('1'), "got: {}", address);
        }
    }

    #[test]
    fn test_bitcoin_script_p2sh() {
        // Raw output script: a914e9c3dd0c07aac76179ebc76a6c78d4d67c6c160a87
        //                    OP_HASH160 20 0xe9c3dd0c07aac76179ebc76a6c78d4d67c6c160a OP_EQUAL
        let bytes = [
            0xa9, 0x14, // OP_HASH160, OP_PUSHDATA0(20 bytes)
            0xe9, 0xc3, 0xdd, 0x0c, 0x07, 0xaa, 0xc7, 0x61, 0x79, 0xeb, 0xc7, 0x6a, 0x6c, 0x78,
            0xd4, 0xd6, 0x7c, 0x6c, 0x16, 0x0a, 0x87,
        ]; // OP_EQUAL
        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert_eq!(
            script.addresses,
            vec![String::from("3P14159f73E4gFr7JterCCQh9QjiTjiZrG")]
        );
        assert_eq!(script.pattern, ScriptPattern::Pay2ScriptHash);
    }

    #[test]
    fn test_bitcoin_script_p2wpkh() {
        // BIP-173 example program: witness v0, HASH160 of the compressed
        // generator point public key
        let mut bytes = vec![0x00, 0x14];
        bytes.extend_from_slice(
            &[
                0x75, 0x1e, 0x76, 0xe8, 0x19, 0x91, 0x96, 0xd4, 0x54, 0x94, 0x1c, 0x45, 0xd1,
                0xb3, 0xa3, 0x23, 0xf1, 0x43, 0x3b, 0xd6,
            ][..],
        );
        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert_eq!(
            script.addresses,
            vec![String::from("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4")]
        );
        assert_eq!(script.pattern, ScriptPattern::Pay2WitnessPublicKeyHash);

        let script = eval_from_bytes(&bytes, &CoinType::from(TestNet3));
        assert_eq!(
            script.addresses,
            vec![String::from("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx")]
        );
    }

    #[test]
    fn test_bitcoin_script_p2wpkh_zero_program() {
        let mut bytes = vec![0x00, 0x14];
        bytes.extend_from_slice(&[0u8; 20]);

        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert_eq!(
            script.addresses,
            vec![String::from("bc1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq9e75rs")]
        );

        let script = eval_from_bytes(&bytes, &CoinType::from(Regtest));
        assert_eq!(
            script.addresses,
            vec![String::from("bcrt1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqdku202")]
        );
    }

    #[test]
    fn test_bitcoin_script_p2wsh() {
        // BIP-173 example program: witness v0, SHA256 of a script
        let mut bytes = vec![0x00, 0x20];
        bytes.extend_from_slice(
            &[
                0x18, 0x63, 0x14, 0x3c, 0x14, 0xc5, 0x16, 0x68, 0x04, 0xbd, 0x19, 0x20, 0x33,
                0x56, 0xda, 0x13, 0x6c, 0x98, 0x56, 0x78, 0xcd, 0x4d, 0x27, 0xa1, 0xb8, 0xc6,
                0x32, 0x96, 0x04, 0x90, 0x32, 0x62,
            ][..],
        );
        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert_eq!(
            script.addresses,
            vec![String::from(
                "bc1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3qccfmv2"
            )]
        );
        assert_eq!(script.pattern, ScriptPattern::Pay2WitnessScriptHash);
    }

    #[test]
    fn test_bitcoin_script_p2tr() {
        // Witness v1 program, encoded with bech32m
        let mut bytes = vec![0x51, 0x20];
        bytes.extend_from_slice(&[0u8; 32]);

        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert_eq!(script.pattern, ScriptPattern::Pay2Taproot);
        assert_eq!(script.addresses.len(), 1);
        assert!(
            script.addresses[0].starts_with("bc1p"),
            "got: {}",
            script.addresses[0]
        );
        assert_eq!(
            script.addresses,
            vec![String::from(
                "bc1pqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqpqqenm"
            )]
        );
    }

    #[test]
    fn test_bitcoin_script_op_return() {
        // Raw output script: 6a13636861726c6579206c6f766573206865696469
        //                    OP_RETURN 13 0x636861726c6579206c6f766573206865696469
        let bytes = [
            0x6a, 0x13, 0x63, 0x68, 0x61, 0x72, 0x6c, 0x65, 0x79, 0x20, 0x6c, 0x6f, 0x76, 0x65,
            0x73, 0x20, 0x68, 0x65, 0x69, 0x64, 0x69,
        ];
        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert!(script.addresses.is_empty());
        assert_eq!(
            script.pattern,
            ScriptPattern::OpReturn(String::from("charley loves heidi"))
        );
    }

    #[test]
    fn test_bitcoin_script_non_standard() {
        // Raw output script: 736372697074
        //                    OP_IFDUP OP_IF OP_2SWAP OP_VERIFY OP_2OVER OP_DEPTH
        let bytes = [0x73, 0x63, 0x72, 0x69, 0x70, 0x74];
        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert!(script.addresses.is_empty());
        assert_eq!(script.pattern, ScriptPattern::NotRecognised);
    }

    #[test]
    fn test_bitcoin_script_malformed_push_demotes() {
        // Matches the p2pkh template but the push holds 19 bytes instead of 20
        let mut bytes = vec![0x76, 0xa9, 0x13];
        bytes.extend_from_slice(&[0u8; 19]);
        bytes.extend_from_slice(&[0x88, 0xac]);
        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert!(script.addresses.is_empty());
        assert_eq!(script.pattern, ScriptPattern::NotRecognised);
    }

    #[test]
    fn test_bitcoin_bogus_script() {
        let bytes = [0x4c, 0xff, 0x00];
        let script = eval_from_bytes(&bytes, &CoinType::from(Bitcoin));
        assert!(script.addresses.is_empty());
        assert_eq!(
            script.pattern,
            ScriptPattern::Error(ScriptError::UnexpectedEof)
        );
    }
}
