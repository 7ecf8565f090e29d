//! SHA-256 content fingerprints for deciding whether a destination file
//! already matches its source document.

use std::fs::File;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{MoziError, Result};
use crate::store::ContentStore;

pub type Fingerprint = [u8; 32];

pub fn store_digest<S: ContentStore + ?Sized>(store: &S, path: &str) -> Result<Fingerprint> {
    let data = store.open(path)?;
    Ok(Sha256::digest(&data).into())
}

pub fn file_digest(path: &Path) -> Result<Fingerprint> {
    let read_err = |source: std::io::Error| MoziError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(read_err)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(read_err)?;
    Ok(hasher.finalize().into())
}

/// Whether the store document and the destination file differ.
///
/// Either side failing to read counts as a difference.
pub fn differs<S: ContentStore + ?Sized>(store: &S, source: &str, dest: &Path) -> bool {
    let incoming = match store_digest(store, source) {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(source, error = %e, "cannot fingerprint source, treating as changed");
            return true;
        }
    };
    let existing = match file_digest(dest) {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(dest = %dest.display(), error = %e, "cannot fingerprint destination, treating as changed");
            return true;
        }
    };
    tracing::debug!(
        source,
        incoming = %hex::encode(incoming),
        existing = %hex::encode(existing),
        "compared fingerprints"
    );
    incoming != existing
}
