//! BOM probing for files on disk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::classify::{Detection, detect};
use crate::config::ClassifyConfig;
use crate::error::{BomError, BomResult};
use crate::reader::BomReader;

/// Classify the BOM of a file from a sample of its first bytes.
///
/// Never reads more than the strategy's lookahead, whatever `sample_size` says.
pub fn classify_file<P: AsRef<Path>>(path: P, config: &ClassifyConfig) -> BomResult<Detection> {
    let path = path.as_ref();
    config.validate()?;

    let limit = config.sample_size.min(config.strategy.lookahead());
    let file = File::open(path).map_err(|e| BomError::io(path, e))?;
    let mut sample = Vec::with_capacity(limit);
    file.take(limit as u64)
        .read_to_end(&mut sample)
        .map_err(|e| BomError::io(path, e))?;

    let detection = detect(&sample, config.strategy);
    debug!(path = %path.display(), kind = %detection.kind, sampled = sample.len(), "classified file");
    Ok(detection)
}

/// Open a file for reading with its BOM stripped.
pub fn open_stripped<P: AsRef<Path>>(
    path: P,
    config: &ClassifyConfig,
) -> BomResult<BomReader<File>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BomError::io(path, e))?;
    Ok(BomReader::with_strategy(file, config.strategy))
}
