use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::DiagError;

/// Read and decode one JSON document, refusing files above `max_size`
/// before reading them.
pub fn load_document(path: &Path, max_size: u64) -> Result<Value, DiagError> {
    let metadata = std::fs::metadata(path).map_err(|e| DiagError::io(path, e))?;
    let size = metadata.len();
    if size > max_size {
        return Err(DiagError::OversizedInput {
            path: path.to_path_buf(),
            size,
            limit: max_size,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| DiagError::io(path, e))?;
    debug!("Read {} ({} bytes)", path.display(), size);

    serde_json::from_str(&content).map_err(|source| DiagError::MalformedDocument {
        path: path.to_path_buf(),
        source,
    })
}
