//! The jungle park scene: a background and a fixed row of tiger slots.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Context, DrawOption, Image, Pt, Scene, Tiger};

/// Number of tiger slots. Adding a tiger when all slots are taken does nothing.
pub const CAPACITY: usize = 8;

/// Mint cream, painted behind the background image.
pub const BACKGROUND_COLOR: [u8; 3] = [245, 255, 250];

const BACKGROUND_IMAGE_PATH: &str = "images/background.png";
const TIGER_IMAGE_PATH: &str = "images/tiger.png";

/// Where the park finds its assets and how it seeds its random source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkConfig {
    pub background_path: PathBuf,
    pub tiger_path: PathBuf,
    /// Fixed seed for spawn positions; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ParkConfig {
    fn default() -> Self {
        Self {
            background_path: PathBuf::from(BACKGROUND_IMAGE_PATH),
            tiger_path: PathBuf::from(TIGER_IMAGE_PATH),
            seed: None,
        }
    }
}

impl ParkConfig {
    /// Defaults, overridden by `JUNGLE_PARK_BACKGROUND`, `JUNGLE_PARK_TIGER`
    /// and `JUNGLE_PARK_SEED` when set.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = var("JUNGLE_PARK_BACKGROUND") {
            config.background_path = PathBuf::from(path);
        }
        if let Some(path) = var("JUNGLE_PARK_TIGER") {
            config.tiger_path = PathBuf::from(path);
        }
        if let Some(seed) = var("JUNGLE_PARK_SEED") {
            match seed.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(e) => log::warn!("ignoring JUNGLE_PARK_SEED={seed:?}: {e}"),
            }
        }
        config
    }
}

/// Scene controller for the park.
///
/// Owns every tiger and the background. Slots are scanned in index order and
/// the first match wins, so at most one tiger is grabbed, added or removed
/// per input event.
#[derive(Debug)]
pub struct JunglePark {
    background: Image,
    tiger_path: PathBuf,
    tigers: [Option<Tiger>; CAPACITY],
    rng: StdRng,
}

impl JunglePark {
    /// Loads the background and sets up empty slots.
    ///
    /// # Errors
    /// Fails if the background image cannot be loaded.
    pub fn with_config(context: &mut Context, config: ParkConfig) -> anyhow::Result<Self> {
        let background = context.load_image(&config.background_path)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            background,
            tiger_path: config.tiger_path,
            tigers: Default::default(),
            rng,
        })
    }

    pub fn tigers(&self) -> &[Option<Tiger>; CAPACITY] {
        &self.tigers
    }

    pub fn tiger(&self, index: usize) -> Option<&Tiger> {
        self.tigers.get(index).and_then(Option::as_ref)
    }

    pub fn tiger_count(&self) -> usize {
        self.tigers.iter().flatten().count()
    }

    /// Whether the pointer lies strictly inside the tiger's image bounds.
    ///
    /// Half extents are whole pixels: a 41 pixel wide tiger reaches 20 pixels
    /// either side of its center.
    pub fn is_mouse_over(context: &Context, tiger: &Tiger) -> bool {
        let Some((mouse_x, mouse_y)) = crate::cursor_position(context) else {
            return false;
        };
        let half_width = (tiger.width() / 2) as f32;
        let half_height = (tiger.height() / 2) as f32;
        (tiger.x() - mouse_x).abs().as_f32() < half_width
            && (tiger.y() - mouse_y).abs().as_f32() < half_height
    }

    /// Puts a new tiger at a random spot in the first free slot.
    ///
    /// Returns the slot index, or `None` if the park is full or the window
    /// has no area to spawn in.
    ///
    /// # Errors
    /// Fails if the tiger image cannot be loaded; no slot changes.
    pub fn add_tiger(&mut self, context: &mut Context) -> anyhow::Result<Option<usize>> {
        let Some(index) = self.tigers.iter().position(Option::is_none) else {
            log::debug!("park is full, ignoring add");
            return Ok(None);
        };
        let (width, height) = crate::window_size(context);
        if width == 0 || height == 0 {
            log::warn!("window is {width}x{height}, nowhere to put a tiger");
            return Ok(None);
        }
        let x = Pt::from(self.rng.gen_range(0..width));
        let y = Pt::from(self.rng.gen_range(0..height));
        let tiger = Tiger::new(context, &self.tiger_path, x, y)?;
        log::debug!("tiger {index} added at ({x}, {y})");
        self.tigers[index] = Some(tiger);
        Ok(Some(index))
    }

    /// Removes the first tiger under the pointer and returns its slot index.
    pub fn remove_tiger_under_mouse(&mut self, context: &Context) -> Option<usize> {
        let index = self.first_under_mouse(context)?;
        self.tigers[index] = None;
        log::debug!("tiger {index} removed");
        Some(index)
    }

    fn first_under_mouse(&self, context: &Context) -> Option<usize> {
        self.tigers.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|tiger| Self::is_mouse_over(context, tiger))
        })
    }
}

impl Scene for JunglePark {
    fn initialize(context: &mut Context) -> anyhow::Result<Self> {
        let park = Self::with_config(context, ParkConfig::from_env())?;
        log::info!("jungle park ready, press T to add a tiger and R to remove one");
        Ok(park)
    }

    /// Dragged tigers follow the pointer.
    fn update(&mut self, context: &mut Context) {
        let Some((x, y)) = crate::cursor_position(context) else {
            return;
        };
        for tiger in self.tigers.iter_mut().flatten() {
            if tiger.is_dragging() {
                tiger.set_x(x);
                tiger.set_y(y);
            }
        }
    }

    fn draw(&self, context: &mut Context) {
        let [r, g, b] = BACKGROUND_COLOR;
        context.fill_background(r, g, b);

        let (width, height) = crate::window_size(context);
        let center = [Pt::from(width) / 2.0, Pt::from(height) / 2.0];
        self.background
            .draw(context, DrawOption::default().with_position(center));

        for tiger in self.tigers.iter().flatten() {
            tiger.draw(context);
        }
    }

    fn mouse_down(&mut self, context: &mut Context) {
        let Some(index) = self.first_under_mouse(context) else {
            return;
        };
        let Some((x, y)) = crate::cursor_position(context) else {
            return;
        };
        if let Some(tiger) = self.tigers[index].as_mut() {
            tiger.set_dragging(true);
            tiger.set_x(x);
            tiger.set_y(y);
        }
    }

    fn mouse_up(&mut self, _context: &mut Context) {
        for tiger in self.tigers.iter_mut().flatten() {
            tiger.set_dragging(false);
        }
    }

    fn key_pressed(&mut self, context: &mut Context) {
        match crate::current_key(context) {
            Some('T' | 't') => {
                if let Err(e) = self.add_tiger(context) {
                    log::error!("could not add a tiger: {e:#}");
                }
            }
            Some('R' | 'r') => {
                self.remove_tiger_under_mouse(context);
            }
            _ => {}
        }
    }

    fn remove(&self) {
        log::info!("closing park with {} tigers", self.tiger_count());
    }
}
