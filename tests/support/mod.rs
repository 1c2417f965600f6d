#![allow(dead_code)]

use sourced_stores::Identity;

pub fn owner() -> Identity {
    Identity::new("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")
}

pub fn alice() -> Identity {
    Identity::new("0x70997970c51812dc3a010c7d01b50e0d17dc79c8")
}

pub fn bob() -> Identity {
    Identity::new("0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc")
}

/// Identities for `n` distinct callers.
pub fn signers(n: usize) -> Vec<Identity> {
    (0..n).map(|i| Identity::new(format!("signer-{i}"))).collect()
}
