//! Input resolution for CLI commands.
//!
//! JSON bodies come from an inline `--input` string, a `--input-file`
//! path, or stdin via `--input-file -`. CSV payloads come from a path or
//! stdin (`-`).

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

/// Resolves and parses a JSON body.
///
/// Priority: `input_file` takes precedence over `input`.
pub fn resolve_json<T: DeserializeOwned>(
    input: Option<&str>,
    input_file: Option<&str>,
) -> anyhow::Result<T> {
    let raw = match (input_file, input) {
        (Some(path), _) => String::from_utf8(read_bytes(path)?)
            .map_err(|e| anyhow::anyhow!("input is not UTF-8: {e}"))?,
        (None, Some(inline)) => inline.to_string(),
        (None, None) => anyhow::bail!("provide --input or --input-file"),
    };
    serde_json::from_str(raw.trim()).map_err(|e| anyhow::anyhow!("invalid JSON input: {e}"))
}

/// Reads raw bytes from a file path, or from stdin when `path` is `-`.
pub fn read_bytes(path: &str) -> anyhow::Result<Vec<u8>> {
    if path == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
        return Ok(buffer);
    }
    let file_path = Path::new(path);
    if !file_path.exists() {
        anyhow::bail!("input file not found: {path}");
    }
    std::fs::read(file_path).map_err(|e| anyhow::anyhow!("failed to read input file: {e}"))
}
