use crate::errors::{PipelineError, Result};
use crate::ingest;
use crate::ingest::schema::{COVERAGE, MODELS, SAMPLES, SYSTEMS};
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub hex: String,
    pub components: Vec<String>,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Fingerprints every input shard below `data_root`.
///
/// One component per shard (`<relative path>=<sha256>`), tables in fixed
/// order and shards sorted by path, so the result only changes when the
/// input data does.
pub fn input_fingerprint(data_root: &Path) -> Result<Fingerprint> {
    let mut components = Vec::new();
    for table in [SYSTEMS, MODELS, SAMPLES, COVERAGE] {
        for shard in ingest::find_shards(data_root, table.file_name)? {
            let bytes = std::fs::read(&shard).map_err(|e| PipelineError::io(&shard, e))?;
            let rel = shard.strip_prefix(data_root).unwrap_or(&shard);
            components.push(format!("{}={}", rel.display(), sha256_hex(&bytes)));
        }
    }

    let hex = sha256_hex(components.join("\n").as_bytes());
    Ok(Fingerprint { hex, components })
}
