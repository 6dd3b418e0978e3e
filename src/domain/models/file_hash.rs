/// Computes the SHA-256 hash of file content, used both for snapshot
/// reconciliation and as an input to chunk identity.
pub fn compute_file_hash(content: &str) -> String {
    use sha2::{Digest, Sha256};
    let hash = Sha256::digest(content.as_bytes());
    format!("{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_file_hash() {
        let content = "fn main() {}";
        let hash = compute_file_hash(content);

        assert_eq!(hash.len(), 64);

        let hash2 = compute_file_hash(content);
        assert_eq!(hash, hash2);

        let hash3 = compute_file_hash("fn main() { println!(\"hello\"); }");
        assert_ne!(hash, hash3);
    }
}
