use crate::error::RenameError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 1024 * 1024;

/// Lowercase hex SHA-256 of the full file content, read in fixed-size chunks.
pub fn hash_file(path: &Path) -> Result<String, RenameError> {
    let file = File::open(path).map_err(|err| RenameError::io(path, err))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|err| RenameError::io(path, err))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::hash_file;
    use crate::error::RenameError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn digest_is_sha256_hex() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("empty.jpg");
        fs::write(&path, b"").expect("write");

        let digest = hash_file(&path).expect("hash");
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn identical_content_in_different_paths_yields_identical_digest() {
        let temp = tempdir().expect("tempdir");
        let a = temp.path().join("a.jpg");
        let b = temp.path().join("b.mp4");
        fs::write(&a, b"same bytes").expect("write a");
        fs::write(&b, b"same bytes").expect("write b");

        assert_eq!(hash_file(&a).expect("a"), hash_file(&b).expect("b"));
    }

    #[test]
    fn differing_content_yields_differing_digest() {
        let temp = tempdir().expect("tempdir");
        let a = temp.path().join("a.jpg");
        let b = temp.path().join("b.jpg");
        fs::write(&a, b"content A").expect("write a");
        fs::write(&b, b"content B").expect("write b");

        assert_ne!(hash_file(&a).expect("a"), hash_file(&b).expect("b"));
    }

    #[test]
    fn content_larger_than_buffer_is_hashed_fully() {
        let temp = tempdir().expect("tempdir");
        let a = temp.path().join("a.mp4");
        let b = temp.path().join("b.mp4");
        let mut bytes = vec![7u8; 3 * 1024 * 1024 + 17];
        fs::write(&a, &bytes).expect("write a");
        if let Some(last) = bytes.last_mut() {
            *last = 8;
        }
        fs::write(&b, &bytes).expect("write b");

        assert_ne!(hash_file(&a).expect("a"), hash_file(&b).expect("b"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = tempdir().expect("tempdir");
        let err = hash_file(&temp.path().join("missing.jpg")).expect_err("missing");
        assert!(matches!(err, RenameError::Io { .. }));
    }
}
