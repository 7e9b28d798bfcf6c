use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialize a loan snapshot piped on stdin, in the same JSON shape as an
/// exported loan record. Returns None when stdin is a terminal or the pipe is
/// empty, so the command falls back to its flags.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(trimmed)?))
}
