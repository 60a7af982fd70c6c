use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a texture's bytes come from.
///
/// Identity (used for deduplication) is the path for files and the buffer
/// address for memory sources, never the content.
#[derive(Clone)]
pub enum TextureOrigin {
    File(PathBuf),
    Memory(Arc<[u8]>),
    Static(&'static [u8]),
}

impl TextureOrigin {
    /// True if both refer to the same source (same path, or the same buffer).
    pub fn same_source(&self, other: &TextureOrigin) -> bool {
        match (self, other) {
            (TextureOrigin::File(a), TextureOrigin::File(b)) => a == b,
            (TextureOrigin::Memory(a), TextureOrigin::Memory(b)) => Arc::ptr_eq(a, b),
            (TextureOrigin::Static(a), TextureOrigin::Static(b)) => {
                std::ptr::eq(a.as_ptr(), b.as_ptr()) && a.len() == b.len()
            }
            _ => false,
        }
    }

    /// Byte size for memory origins.
    pub fn byte_len(&self) -> Option<usize> {
        match self {
            TextureOrigin::File(_) => None,
            TextureOrigin::Memory(b) => Some(b.len()),
            TextureOrigin::Static(b) => Some(b.len()),
        }
    }

    /// Reads the encoded image bytes.
    pub fn read(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            TextureOrigin::File(p) => std::fs::read(p).map(Cow::Owned),
            TextureOrigin::Memory(b) => Ok(Cow::Borrowed(&b[..])),
            TextureOrigin::Static(b) => Ok(Cow::Borrowed(*b)),
        }
    }
}

impl fmt::Display for TextureOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureOrigin::File(p) => write!(f, "{}", p.display()),
            TextureOrigin::Memory(b) => write!(f, "<memory {:p}, {} bytes>", b.as_ptr(), b.len()),
            TextureOrigin::Static(b) => write!(f, "<static {:p}, {} bytes>", b.as_ptr(), b.len()),
        }
    }
}

impl fmt::Debug for TextureOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureOrigin({self})")
    }
}

impl From<PathBuf> for TextureOrigin {
    fn from(p: PathBuf) -> Self {
        TextureOrigin::File(p)
    }
}

impl From<&Path> for TextureOrigin {
    fn from(p: &Path) -> Self {
        TextureOrigin::File(p.to_path_buf())
    }
}

impl From<&str> for TextureOrigin {
    fn from(p: &str) -> Self {
        TextureOrigin::File(PathBuf::from(p))
    }
}

impl From<Arc<[u8]>> for TextureOrigin {
    fn from(b: Arc<[u8]>) -> Self {
        TextureOrigin::Memory(b)
    }
}

impl From<&'static [u8]> for TextureOrigin {
    fn from(b: &'static [u8]) -> Self {
        TextureOrigin::Static(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_identity_is_the_buffer_not_the_content() {
        let a: Arc<[u8]> = Arc::from(vec![1u8, 2, 3]);
        let b: Arc<[u8]> = Arc::from(vec![1u8, 2, 3]);
        let a_origin = TextureOrigin::Memory(a.clone());

        assert!(a_origin.same_source(&TextureOrigin::Memory(a)));
        assert!(!a_origin.same_source(&TextureOrigin::Memory(b)));
    }

    #[test]
    fn paths_compare_by_value() {
        let a = TextureOrigin::from("assets/radar.png");
        assert!(a.same_source(&TextureOrigin::from(Path::new("assets/radar.png"))));
        assert!(!a.same_source(&TextureOrigin::from("assets/other.png")));
        assert_eq!(a.byte_len(), None);
    }
}
