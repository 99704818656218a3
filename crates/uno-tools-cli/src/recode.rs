//! Re-encode text between character sets, normalising line breaks.

use std::borrow::Cow;

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

/// Line break written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LineSeparator {
    /// `\r\n`
    Windows,
    /// `\n`
    Unix,
}

impl LineSeparator {
    /// The separator of the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            LineSeparator::Windows
        } else {
            LineSeparator::Unix
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineSeparator::Windows => "\r\n",
            LineSeparator::Unix => "\n",
        }
    }
}

/// A character set together with its byte-order-mark handling.
///
/// The bare `utf-16` label reads a BOM to pick the byte order and writes one
/// on output. Every other label, `utf-8` included, leaves a BOM in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    encoding: &'static Encoding,
    byte_order_mark: bool,
}

impl Codec {
    /// UTF-16 with a BOM; little-endian when writing or when no BOM is found.
    pub fn utf16_with_bom() -> Self {
        Self {
            encoding: UTF_16LE,
            byte_order_mark: true,
        }
    }

    pub fn name(&self) -> &'static str {
        if self.byte_order_mark {
            "UTF-16"
        } else {
            self.encoding.name()
        }
    }

    fn decode<'a>(&self, input: &'a [u8]) -> (Cow<'a, str>, bool) {
        if self.byte_order_mark {
            if let Some((encoding, bom_len)) = Encoding::for_bom(input) {
                if encoding == UTF_16LE || encoding == UTF_16BE {
                    return encoding.decode_without_bom_handling(&input[bom_len..]);
                }
            }
        }
        self.encoding.decode_without_bom_handling(input)
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        // encoding_rs only decodes UTF-16; encoding it is done by hand.
        if self.encoding == UTF_16LE {
            let bom = self.byte_order_mark.then_some(0xFEFF_u16);
            return Ok(bom
                .into_iter()
                .chain(text.encode_utf16())
                .flat_map(u16::to_le_bytes)
                .collect());
        }
        if self.encoding == UTF_16BE {
            return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
        }

        let (bytes, used, had_errors) = self.encoding.encode(text);
        if had_errors || used != self.encoding {
            bail!("text cannot be encoded as {}", self.encoding.name());
        }
        Ok(bytes.into_owned())
    }
}

impl From<&'static Encoding> for Codec {
    fn from(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            byte_order_mark: false,
        }
    }
}

/// Look up a codec by label (`utf-8`, `utf-16`, `utf-16le`, `cp1251`, ...).
///
/// Labels are WHATWG encoding labels, plus `utf16`/`utf_16` for UTF-16
/// with a byte order mark.
pub fn codec(label: &str) -> Result<Codec> {
    let label = label.trim();
    if matches!(
        label.to_ascii_lowercase().replace('_', "-").as_str(),
        "utf-16" | "utf16"
    ) {
        return Ok(Codec::utf16_with_bom());
    }
    Encoding::for_label(label.as_bytes())
        .map(Codec::from)
        .ok_or_else(|| anyhow!("Unknown encoding: {label}"))
}

/// Decode `input` from `source`, rewrite line breaks and encode to
/// `destination`.
///
/// Malformed input is replaced with U+FFFD. Characters the destination
/// cannot represent are an error.
pub fn recode(
    input: &[u8],
    source: impl Into<Codec>,
    destination: impl Into<Codec>,
    separator: LineSeparator,
) -> Result<Vec<u8>> {
    let (source, destination) = (source.into(), destination.into());
    let (text, had_errors) = source.decode(input);
    if had_errors {
        tracing::warn!("malformed {} input replaced", source.name());
    }

    let text = normalize_line_breaks(&text, separator);
    tracing::debug!(
        "recoding {} bytes from {} to {}",
        input.len(),
        source.name(),
        destination.name()
    );
    destination.encode(&text)
}

fn normalize_line_breaks(text: &str, separator: LineSeparator) -> String {
    let unix = text.replace("\r\n", "\n").replace('\r', "\n");
    match separator {
        LineSeparator::Unix => unix,
        LineSeparator::Windows => unix.replace('\n', separator.as_str()),
    }
}
