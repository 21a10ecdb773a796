/// An in-memory file destined for object storage.
#[derive(Debug, Clone)]
pub struct Blob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// File extension taken from the original name, if it has one.
    pub fn extension(&self) -> Option<&str> {
        self.file_name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_comes_from_the_last_dot() {
        let blob = Blob::new("portrait.final.png", "image/png", vec![]);
        assert_eq!(blob.extension(), Some("png"));
    }

    #[test]
    fn extension_is_none_without_a_dot() {
        let blob = Blob::new("portrait", "image/png", vec![]);
        assert_eq!(blob.extension(), None);
    }
}
