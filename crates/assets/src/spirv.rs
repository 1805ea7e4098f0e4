// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # SPIR-V
//!
//! Shader bytecode is opaque to us apart from its framing.  A module is a stream of 32-bit words
//! beginning with a magic number, and the magic number tells us which endianness wrote it.

use crate::prelude::*;

/// First word of every SPIR-V module.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Convert raw shader bytes into SPIR-V words in host order.
pub fn read_spirv(bytes: &[u8]) -> Result<Vec<u32>, AssetError> {
    if bytes.is_empty() {
        return Err(AssetError::InvalidShader("SPIR-V module is empty".to_owned()));
    }

    if bytes.len() % size_of::<u32>() != 0 {
        return Err(AssetError::InvalidShader(format!(
            "SPIR-V length not multiple of 4: {} bytes",
            bytes.len()
        )));
    }

    let mut words: Vec<u32> = bytes
        .chunks_exact(size_of::<u32>())
        .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    match words[0] {
        SPIRV_MAGIC => {}
        swapped if swapped == SPIRV_MAGIC.swap_bytes() => {
            words.iter_mut().for_each(|w| *w = w.swap_bytes());
        }
        other => {
            return Err(AssetError::InvalidShader(format!(
                "bad SPIR-V magic number: {other:#010x}"
            )));
        }
    }

    Ok(words)
}

#[cfg(test)]
mod test {
    use super::*;

    fn module(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_ne_bytes()).collect()
    }

    #[test]
    fn test_native_order() {
        let bytes = module(&[SPIRV_MAGIC, 0x0001_0000, 7]);
        let words = read_spirv(&bytes).unwrap();
        assert_eq!(words, vec![SPIRV_MAGIC, 0x0001_0000, 7]);
    }

    #[test]
    fn test_swapped_order() {
        let bytes: Vec<u8> = [SPIRV_MAGIC, 0x0001_0000]
            .iter()
            .flat_map(|w| w.swap_bytes().to_ne_bytes())
            .collect();
        let words = read_spirv(&bytes).unwrap();
        assert_eq!(words, vec![SPIRV_MAGIC, 0x0001_0000]);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(read_spirv(&[]), Err(AssetError::InvalidShader(_))));
    }

    #[test]
    fn test_rejects_ragged_length() {
        let mut bytes = module(&[SPIRV_MAGIC]);
        bytes.push(0);
        assert!(matches!(read_spirv(&bytes), Err(AssetError::InvalidShader(_))));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let bytes = module(&[0xdead_beef, 1]);
        let err = read_spirv(&bytes).unwrap_err();
        assert!(err.to_string().contains("0xdeadbeef"));
    }
}
