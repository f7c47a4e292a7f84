//! Minimal Solidity ABI call encoding.
//!
//! Only what the anchoring contract needs: a function selector and a tuple of
//! dynamic `string` arguments.

use sha3::{Digest, Keccak256};

const WORD: usize = 32;

/// First four bytes of the Keccak-256 hash of a canonical function
/// signature such as `storeRecord(string,string,string)`.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut selector = [0_u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
}

/// Encode a tuple of `string` arguments: one offset word per argument,
/// then each argument as a length word followed by its bytes right-padded
/// to a word boundary.
pub fn encode_strings(args: &[&str]) -> Vec<u8> {
    let head_len = args.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for arg in args {
        head.extend_from_slice(&usize_word(head_len + tail.len()));
        let bytes = arg.as_bytes();
        tail.extend_from_slice(&usize_word(bytes.len()));
        tail.extend_from_slice(bytes);
        tail.resize(tail.len() + padding(bytes.len()), 0);
    }
    head.extend_from_slice(&tail);
    head
}

/// Selector plus encoded arguments, as `0x`-prefixed hex call data.
pub fn encode_call(signature: &str, args: &[&str]) -> String {
    let mut data = function_selector(signature).to_vec();
    data.extend_from_slice(&encode_strings(args));
    format!("0x{}", hex::encode(data))
}

fn usize_word(value: usize) -> [u8; WORD] {
    let mut word = [0_u8; WORD];
    let bytes = (value as u64).to_be_bytes();
    word[WORD - bytes.len()..].copy_from_slice(&bytes);
    word
}

fn padding(len: usize) -> usize {
    (WORD - len % WORD) % WORD
}
