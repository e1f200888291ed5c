use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Font database (`fontdb`) plus the `fontdue` fonts loaded from it so far.
///
/// Faces are parsed lazily, the first time a family resolves to them.
pub struct FontStorage {
    font_db: fontdb::Database,
    /// Subset of `font_db` that has already been parsed by fontdue.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates a new empty font storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading fonts into fontdb and setting up fontdb.
impl FontStorage {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of registered faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }

    /// Chooses the installed family that the generic `sans-serif` name maps to.
    pub fn set_sans_serif_family(&mut self, family: impl Into<String>) {
        self.font_db.set_sans_serif_family(family);
    }

    /// Sets the family name for the "serif" generic family.
    pub fn set_serif_family(&mut self, family: impl Into<String>) {
        self.font_db.set_serif_family(family);
    }

    /// Sets the family name for the "monospace" generic family.
    pub fn set_monospace_family(&mut self, family: impl Into<String>) {
        self.font_db.set_monospace_family(family);
    }
}

/// Get `Font`
impl FontStorage {
    /// Resolves a family name, falling back to the generic sans-serif family.
    ///
    /// Generic CSS names (`sans-serif`, `serif`, `monospace`, `cursive`,
    /// `fantasy`) select the generic family instead of a literal name.
    pub fn resolve_family(&mut self, family: &str) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        let requested = generic_family(family).unwrap_or(fontdb::Family::Name(family));
        let query = fontdb::Query {
            families: &[requested, fontdb::Family::SansSerif],
            ..Default::default()
        };
        let id = self.font_db.query(&query)?;
        self.font(id).map(|font| (id, font))
    }

    /// Retrieves a loaded font by ID, parsing it if necessary.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            scale: 40.0,
                            load_substitutions: true,
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let r: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }

    /// Family name recorded in the database for a face.
    pub fn face_family(&self, id: fontdb::ID) -> Option<String> {
        let face = self.font_db.face(id)?;
        face.families.first().map(|(name, _)| name.clone())
    }
}

fn generic_family(name: &str) -> Option<fontdb::Family<'static>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sans-serif" => Some(fontdb::Family::SansSerif),
        "serif" => Some(fontdb::Family::Serif),
        "monospace" => Some(fontdb::Family::Monospace),
        "cursive" => Some(fontdb::Family::Cursive),
        "fantasy" => Some(fontdb::Family::Fantasy),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_family_names() {
        assert_eq!(generic_family("sans-serif"), Some(fontdb::Family::SansSerif));
        assert_eq!(generic_family(" Monospace "), Some(fontdb::Family::Monospace));
        assert_eq!(generic_family("Roboto"), None);
    }

    #[test]
    fn test_empty_storage_resolves_nothing() {
        let mut storage = FontStorage::new();
        assert!(storage.is_empty());
        assert!(storage.resolve_family("sans-serif").is_none());
        assert!(storage.resolve_family("Roboto").is_none());
    }
}
