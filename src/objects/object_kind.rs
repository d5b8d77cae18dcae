use std::io::BufRead;

/// Type tag carried by every stored record
///
/// Lookups read this tag from the record header and select the matching
/// `ObjectRecord` variant; there is no open-ended dispatch beyond these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
        }
    }

    /// Read the `"<kind> <size>\0"` header off the front of a record
    pub fn parse_header(data_reader: &mut impl BufRead) -> anyhow::Result<ObjectKind> {
        let mut kind = Vec::new();
        data_reader.read_until(b' ', &mut kind)?;

        let kind = String::from_utf8(kind)?;
        let kind = kind.trim();

        // skip the size part
        let mut size = Vec::new();
        data_reader.read_until(b'\0', &mut size)?;

        ObjectKind::try_from(kind)
    }
}

impl TryFrom<&str> for ObjectKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            "tag" => Ok(ObjectKind::Tag),
            _ => Err(anyhow::anyhow!("Invalid object kind: {value}")),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
