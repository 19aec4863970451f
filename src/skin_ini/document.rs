//! Line-oriented in-memory view of a `skin.ini` file

use std::fs;
use std::io;
use std::path::Path;

use super::encoding::TextEncoding;
use super::IniError;

/// A configuration file held as raw lines for the duration of one patch.
///
/// Every line keeps its own terminator (`\n` or `\r\n`, none for a final
/// unterminated line) so that untouched lines serialize byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniDocument {
    pub encoding: TextEncoding,
    /// Marker bytes exactly as read, written back verbatim
    pub bom: Vec<u8>,
    pub lines: Vec<String>,
}

impl IniDocument {
    /// Decode a document from raw file bytes.
    pub fn from_bytes(raw: &[u8]) -> Self {
        let (encoding, bom, payload) = TextEncoding::detect(raw);
        let text = encoding.decode(payload);
        Self {
            encoding,
            bom: bom.to_vec(),
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    /// Read a document from disk. A missing file yields an empty document.
    pub fn read(path: &Path) -> Result<Self, IniError> {
        match fs::read(path) {
            Ok(raw) => Ok(Self::from_bytes(&raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} not found, starting from an empty document", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(IniError::Read { path: path.to_path_buf(), source }),
        }
    }

    /// Serialize back to bytes: original marker, then the lines re-encoded.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.bom.clone();
        out.extend(self.encoding.encode(&self.lines.concat()));
        out
    }

    /// Overwrite `path` with the serialized document.
    pub fn write(&self, path: &Path) -> Result<(), IniError> {
        fs::write(path, self.to_bytes())
            .map_err(|source| IniError::Write { path: path.to_path_buf(), source })
    }

    /// Document text without the marker
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}
