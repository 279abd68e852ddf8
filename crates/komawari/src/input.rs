//! Reading source files and writing command output.

use encoding_rs::{Encoding, SHIFT_JIS};
use komawari_core::SourceText;
use komawari_error::{InputError, InputErrorKind, JsonError, KomawariResult};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, instrument};

/// Decode raw file bytes into text.
///
/// A byte-order mark selects UTF-8 or UTF-16 and is stripped. Without one,
/// the bytes must be valid UTF-8 or, failing that, valid Shift_JIS.
///
/// # Examples
///
/// ```
/// use komawari::decode_source;
///
/// assert_eq!(decode_source(b"\xEF\xBB\xBFhello").unwrap(), "hello");
/// assert_eq!(decode_source(b"\x82\xa0").unwrap(), "あ");
/// ```
pub fn decode_source(bytes: &[u8]) -> KomawariResult<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            return Err(InputError::new(InputErrorKind::Undecodable(format!(
                "malformed {} after byte-order mark",
                encoding.name()
            )))
            .into());
        }
        debug!(encoding = encoding.name(), "Decoded input using byte-order mark");
        return Ok(text.into_owned());
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
    if had_errors {
        return Err(InputError::new(InputErrorKind::Undecodable(
            "neither UTF-8, UTF-16 nor Shift_JIS".to_string(),
        ))
        .into());
    }
    debug!("Decoded input as Shift_JIS");
    Ok(text.into_owned())
}

/// Read and decode a source file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_source(path: impl AsRef<Path>) -> KomawariResult<SourceText> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        InputError::new(InputErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    })?;
    let text = decode_source(&bytes)?;
    let source = SourceText::new(text);
    debug!(chars = source.len(), "Read source text");
    Ok(source)
}

/// Read a JSON file (cuts, glossary, roster) into `T`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> KomawariResult<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        InputError::new(InputErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| JsonError::new(format!("{}: {}", path.display(), e)).into())
}

/// Write `content` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> KomawariResult<()> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|e| {
            InputError::new(InputErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
                .into()
        }),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "夜".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_source(&bytes).unwrap(), "夜");
    }

    #[test]
    fn test_plain_utf8_passes_through() {
        assert_eq!(decode_source("銀河".as_bytes()).unwrap(), "銀河");
    }

    #[test]
    fn test_garbage_is_rejected() {
        // 0x81 0x20 is an invalid Shift_JIS lead/trail pair and invalid UTF-8.
        assert!(decode_source(&[0x81, 0x20, 0xFF]).is_err());
    }
}
