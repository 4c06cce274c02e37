use sha2::{Digest, Sha256};

/// Wraps the incremental hasher so the service can feed a byte stream
/// through it once rather than buffering the whole payload twice (once to
/// hash, once to store).
#[derive(Default)]
pub struct StreamingHasher {
    inner: Sha256,
}

impl StreamingHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    pub fn finalize_hex(self) -> String {
        hex::encode(self.inner.finalize())
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = StreamingHasher::new();
    hasher.update(bytes);
    hasher.finalize_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector_matches() {
        // sha256("") per FIPS 180-4 test vectors.
        assert_eq!(sha256_hex(b""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85");
    }

    #[test]
    fn incremental_update_matches_one_shot() {
        let mut incremental = StreamingHasher::new();
        incremental.update(b"hello, ");
        incremental.update(b"world");
        assert_eq!(incremental.finalize_hex(), sha256_hex(b"hello, world"));
    }
}
