use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a constraint.
///
/// Identity fields:
/// - constraint name
/// - source expression (untranslated)
pub fn fingerprint_for_constraint(name: &str, expr: &str) -> String {
    let canonical = [name, expr].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
