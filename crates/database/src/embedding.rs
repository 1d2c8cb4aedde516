//! Binary codec for f32 embedding vectors.
//!
//! Embeddings are stored as flat little-endian f32 bytes (1536 dims ×
//! 4 bytes = 6,144 bytes) rather than JSON text, which would be several
//! times larger and slower to decode.

/// Encode an f32 embedding vector as flat little-endian bytes.
///
/// An empty vector ("embeddings unavailable") encodes to an empty blob.
pub fn encode(vec: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(vec.len() * 4);
    for &val in vec {
        buf.extend_from_slice(&val.to_le_bytes());
    }
    buf
}

/// Decode an embedding blob back into an f32 vector.
///
/// Returns `None` if the blob length is not a multiple of 4. An empty blob
/// decodes to an empty vector.
pub fn decode(blob: &[u8]) -> Option<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return None;
    }
    let mut vec = Vec::with_capacity(blob.len() / 4);
    for chunk in blob.chunks_exact(4) {
        vec.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Some(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let original: Vec<f32> = (0..1536).map(|i| i as f32 * 0.001).collect();
        let encoded = encode(&original);
        assert_eq!(encoded.len(), 6144);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_empty_vector() {
        let encoded = encode(&[]);
        assert!(encoded.is_empty());
        assert_eq!(decode(&encoded).unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let blob = vec![0u8; 6];
        assert!(decode(&blob).is_none());
    }

    #[test]
    fn test_special_values() {
        let vec = vec![f32::INFINITY, f32::NEG_INFINITY, 0.0, -0.0];
        let decoded = decode(&encode(&vec)).unwrap();
        assert!(decoded[0].is_infinite() && decoded[0].is_sign_positive());
        assert!(decoded[1].is_infinite() && decoded[1].is_sign_negative());
    }
}
