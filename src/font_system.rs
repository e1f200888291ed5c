use std::{path::PathBuf, sync::Arc};

use parking_lot::Mutex;

use crate::{
    font_storage::FontStorage,
    typeface::{FontFace, FontResolver, Typeface},
};

/// Process-wide font source shared by every estimator and renderer.
///
/// Wraps [`FontStorage`] in a `Mutex` so both layout trees can resolve fonts
/// through the same `Arc<FontSystem>`. Each component still keeps its own
/// [`crate::typeface::TypefaceCache`], so the lock is only taken on a miss.
pub struct FontSystem {
    /// The underlying font storage.
    pub font_storage: Mutex<FontStorage>,
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSystem {
    /// Creates a font system with empty storage.
    pub fn new() -> Self {
        Self {
            font_storage: Mutex::new(FontStorage::new()),
        }
    }

    /// Convenience for the common "system fonts, shared" setup.
    pub fn with_system_fonts() -> Arc<Self> {
        let system = Self::new();
        system.load_system_fonts();
        Arc::new(system)
    }
}

/// font storage initialization
impl FontSystem {
    /// Loads the system fonts into the storage.
    pub fn load_system_fonts(&self) {
        self.font_storage.lock().load_system_fonts();
    }

    /// Loads a font from binary data.
    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.font_storage.lock().load_font_binary(data);
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_storage.lock().load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&self, dir: PathBuf) {
        self.font_storage.lock().load_fonts_dir(dir)
    }

    /// Sets the family name for the "sans-serif" generic family.
    pub fn set_sans_serif_family(&self, family: impl Into<String>) {
        self.font_storage.lock().set_sans_serif_family(family);
    }

    /// Sets the family name for the "serif" generic family.
    pub fn set_serif_family(&self, family: impl Into<String>) {
        self.font_storage.lock().set_serif_family(family);
    }

    /// Sets the family name for the "monospace" generic family.
    pub fn set_monospace_family(&self, family: impl Into<String>) {
        self.font_storage.lock().set_monospace_family(family);
    }

    /// Checks if no font is registered.
    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }

    /// Returns the number of registered faces.
    pub fn len(&self) -> usize {
        self.font_storage.lock().len()
    }
}

impl FontResolver for FontSystem {
    fn resolve(&self, family: &str) -> Option<Typeface> {
        let mut storage = self.font_storage.lock();
        let (id, font) = storage.resolve_family(family)?;
        if let Some(actual) = storage.face_family(id)
            && !actual.eq_ignore_ascii_case(family)
        {
            log::debug!("Family `{family}` resolved to `{actual}`");
        }
        let face: Arc<dyn FontFace> = font;
        Some(Typeface::new(family, face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_system_resolves_nothing() {
        let system = FontSystem::new();
        assert!(system.is_empty());
        assert!(system.resolve("sans-serif").is_none());
    }
}
