//! Deterministic node colors
//!
//! Packages in the same directory share a color. The color is the first
//! three bytes of the SHA-256 digest of the directory name, so it is stable
//! across runs and machines without any lookup table.

use sha2::{Digest, Sha256};

/// Derive a `#rrggbb` color from an arbitrary key.
///
/// Distinct keys may collide; that only means two groups share a color.
pub fn color_for(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("#{:02x}{:02x}{:02x}", digest[0], digest[1], digest[2])
}
