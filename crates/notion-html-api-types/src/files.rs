use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

/// Notion-hosted file. The URL is signed and expires.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostedFile {
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<String>,
}

/// File reference used by image, video and file blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileObject {
    External { external: ExternalFile },
    File { file: HostedFile },
}

impl FileObject {
    pub fn url(&self) -> &str {
        match self {
            FileObject::External { external } => &external.url,
            FileObject::File { file } => &file.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { external: ExternalFile },
    File { file: HostedFile },
    #[serde(other)]
    Other,
}

impl Icon {
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Icon::Emoji { emoji } => Some(emoji),
            _ => None,
        }
    }
}
