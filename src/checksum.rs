use crc32fast::Hasher;

/// Cross-platform, hardware-accelerated CRC32 (Ethernet polynomial)
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Incremental CRC32 (continue from previous CRC value)
pub fn crc32_incremental(initial_crc: u32, data: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(initial_crc);
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_consistency() {
        let data = b"Test data for CRC32 consistency";
        assert_eq!(crc32(data), crc32(data));
    }

    #[test]
    fn test_crc32_incremental() {
        let crc1 = crc32(b"Hello, ");
        let crc_incremental = crc32_incremental(crc1, b"World!");
        assert_eq!(crc_incremental, crc32(b"Hello, World!"));
    }

    #[test]
    fn test_crc32_empty() {
        assert_eq!(crc32(&[]), 0);
    }

    #[test]
    fn test_crc32_detects_corruption() {
        let mut data = *b"stable payload bytes";
        let before = crc32(&data);
        data[4] ^= 0x01;
        assert_ne!(before, crc32(&data));
    }
}
