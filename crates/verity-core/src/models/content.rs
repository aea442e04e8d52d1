use std::fmt;

use bytes::Bytes;

/// Content as submitted by a caller, before any validation.
#[derive(Debug, Clone)]
pub enum ContentInput {
    Text(String),
    File(FileInput),
}

impl ContentInput {
    pub fn text(text: impl Into<String>) -> Self {
        ContentInput::Text(text.into())
    }

    pub fn file(
        file_name: Option<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        ContentInput::File(FileInput::new(file_name, mime_type, data))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentInput::Text(text) => Some(text),
            ContentInput::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileInput> {
        match self {
            ContentInput::Text(_) => None,
            ContentInput::File(file) => Some(file),
        }
    }
}

/// An uploaded file with its declared MIME type.
#[derive(Clone)]
pub struct FileInput {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub data: Bytes,
}

impl FileInput {
    pub fn new(
        file_name: Option<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name,
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File name to send upstream when the caller did not supply one.
    pub fn upload_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| "upload".to_string())
    }
}

impl fmt::Debug for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInput")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .finish()
    }
}
