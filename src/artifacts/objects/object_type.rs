use crate::errors::GitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Split a decompressed loose object into its kind and payload.
    ///
    /// The header is `<kind> <decimal size>\0`; the declared size must
    /// match the actual payload length or the object is corrupt.
    pub fn parse_header<'a>(raw: &'a [u8], oid: &str) -> anyhow::Result<(ObjectType, &'a [u8])> {
        let spc = raw
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| GitError::CorruptObject(oid.to_string(), "missing header space".into()))?;
        let nul = raw[spc..]
            .iter()
            .position(|&b| b == b'\0')
            .map(|p| spc + p)
            .ok_or_else(|| GitError::CorruptObject(oid.to_string(), "missing header NUL".into()))?;

        let kind = std::str::from_utf8(&raw[..spc])
            .map_err(|_| GitError::UnknownObjectKind(format!("{:?}", &raw[..spc])))?;
        let kind = ObjectType::try_from(kind)?;

        let size: usize = std::str::from_utf8(&raw[spc + 1..nul])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| GitError::CorruptObject(oid.to_string(), "bad size field".into()))?;

        let payload = &raw[nul + 1..];
        if size != payload.len() {
            return Err(GitError::CorruptObject(
                oid.to_string(),
                format!("declared length {} but payload is {} bytes", size, payload.len()),
            )
            .into());
        }

        Ok((kind, payload))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            "tag" => Ok(ObjectType::Tag),
            _ => Err(GitError::UnknownObjectKind(value.to_string()).into()),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
