use crate::error::{Result, TraderdError};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Read the last `max_bytes` bytes of a text log file.
///
/// A missing file is an empty log, not an error - the trader may simply
/// not have written anything yet. The file is never loaded whole: the
/// reader seeks to the tail window. If the file grows while being read,
/// the view is re-truncated to the most recent `max_bytes`.
///
/// # Returns
/// * `Ok(String)` - Tail of the log, lossy UTF-8
/// * `Err(TraderdError::Telemetry)` - Failed to open or read the file
pub async fn tail_bytes(path: &Path, max_bytes: u64) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }

    let mut file = File::open(path)
        .await
        .map_err(|e| TraderdError::Telemetry(format!("Failed to open log file: {}", e)))?;

    let len = file
        .metadata()
        .await
        .map_err(|e| TraderdError::Telemetry(format!("Failed to stat log file: {}", e)))?
        .len();

    if len > max_bytes {
        file.seek(std::io::SeekFrom::Start(len - max_bytes))
            .await
            .map_err(|e| TraderdError::Telemetry(format!("Failed to seek log file: {}", e)))?;
    }

    let mut buf = Vec::with_capacity(len.min(max_bytes) as usize);
    file.read_to_end(&mut buf)
        .await
        .map_err(|e| TraderdError::Telemetry(format!("Failed to read log file: {}", e)))?;

    let start = buf.len().saturating_sub(max_bytes as usize);
    Ok(String::from_utf8_lossy(&buf[start..]).into_owned())
}
