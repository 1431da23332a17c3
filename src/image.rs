use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbaImage;

use crate::Context;
use crate::DrawOption;
use crate::drawable::DrawCommand;

/// Handle to an image owned by a [`Context`].
///
/// Handles are plain ids and can be copied freely; the pixels stay in the
/// context's image store.
#[derive(Debug, Clone, Copy)]
pub struct Image {
    pub(crate) id: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Image {}

impl std::hash::Hash for Image {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Image {
    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    /// Draws this image centered at `options.position()`.
    ///
    /// # Example
    /// ```
    /// # use jungle_park::{Context, DrawOption, Pt};
    /// let mut context = Context::new();
    /// context.set_window_size(64, 64);
    /// let image = context.create_image(2, 2, &[255u8; 2 * 2 * 4]).unwrap();
    /// image.draw(
    ///     &mut context,
    ///     DrawOption::default().with_position([Pt::from(10.0f32), Pt::from(10.0f32)]),
    /// );
    /// ```
    pub fn draw(self, context: &mut Context, options: DrawOption) {
        context.push(DrawCommand::Image(
            self.id,
            options,
            [self.width, self.height],
        ));
    }
}

/// Decoded RGBA pixels for every image a context has created or loaded.
#[derive(Debug, Default)]
pub(crate) struct ImageStore {
    entries: Vec<RgbaImage>,
    by_path: HashMap<PathBuf, Image>,
}

impl ImageStore {
    pub(crate) fn insert(&mut self, pixels: RgbaImage) -> Image {
        let image = Image {
            id: self.entries.len() as u32,
            width: pixels.width(),
            height: pixels.height(),
        };
        self.entries.push(pixels);
        image
    }

    pub(crate) fn create(&mut self, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<Image> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            anyhow::bail!(
                "rgba data is {} bytes, expected {} for a {}x{} image",
                rgba.len(),
                expected,
                width,
                height
            );
        }
        let pixels = RgbaImage::from_raw(width, height, rgba.to_vec())
            .context("rgba buffer does not match image dimensions")?;
        Ok(self.insert(pixels))
    }

    /// Loads an image file, decoding each distinct path only once.
    pub(crate) fn load(&mut self, path: &Path) -> anyhow::Result<Image> {
        if let Some(image) = self.by_path.get(path) {
            return Ok(*image);
        }
        let pixels = image::open(path)
            .with_context(|| format!("failed to load image {}", path.display()))?
            .to_rgba8();
        log::debug!(
            "loaded {} ({}x{})",
            path.display(),
            pixels.width(),
            pixels.height()
        );
        let image = self.insert(pixels);
        self.by_path.insert(path.to_path_buf(), image);
        Ok(image)
    }

    pub(crate) fn alias(&mut self, path: &Path, image: Image) {
        self.by_path.insert(path.to_path_buf(), image);
    }

    pub(crate) fn get(&self, id: u32) -> Option<&RgbaImage> {
        self.entries.get(id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_checks_length() {
        let mut store = ImageStore::default();
        assert!(store.create(2, 2, &[0u8; 15]).is_err());

        let image = store.create(2, 3, &[7u8; 24]).unwrap();
        assert_eq!((image.width(), image.height()), (2, 3));
        assert_eq!(store.get(image.id).unwrap().get_pixel(1, 2).0, [7, 7, 7, 7]);
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let mut store = ImageStore::default();
        let err = store.load(Path::new("no/such/tiger.png")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/tiger.png"));
    }

    #[test]
    fn test_alias_short_circuits_load() {
        let mut store = ImageStore::default();
        let image = store.create(1, 1, &[0u8; 4]).unwrap();
        store.alias(Path::new("images/tiger.png"), image);

        let loaded = store.load(Path::new("images/tiger.png")).unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut store = ImageStore::default();
        let a = store.create(1, 1, &[0u8; 4]).unwrap();
        let b = store.create(1, 1, &[0u8; 4]).unwrap();
        assert_ne!(a, b);
    }
}
