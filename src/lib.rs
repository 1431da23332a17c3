//! Jungle Park - drag tigers around a jungle background.
//!
//! A fixed-size window shows a background image and up to eight tigers.
//! Press `T` to add a tiger at a random spot, `R` to remove the tiger under
//! the pointer, and hold the left mouse button to drag one around.
//!
//! Scenes implement [`Scene`] and receive a [`Context`] in every callback.
//! The context is the only way a scene talks to the window: it loads images,
//! records draw commands, and exposes the pointer, the current key and the
//! window size.
//!
//! # Example
//! ```no_run
//! use jungle_park::{Context, DrawOption, Image, Pt, Scene};
//!
//! struct Backdrop {
//!     image: Image,
//! }
//!
//! impl Scene for Backdrop {
//!     fn initialize(context: &mut Context) -> anyhow::Result<Self> {
//!         let image = context.load_image("images/background.png")?;
//!         Ok(Self { image })
//!     }
//!
//!     fn draw(&self, context: &mut Context) {
//!         let (w, h) = jungle_park::window_size(context);
//!         let center = [Pt::from(w / 2), Pt::from(h / 2)];
//!         self.image.draw(context, DrawOption::default().with_position(center));
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     jungle_park::run::<Backdrop>(jungle_park::WindowConfig::default())
//! }
//! ```

mod drawable;
mod graphics;
mod image;
mod input;
mod park;
mod pt;
mod tiger;
mod window;

use std::path::Path;

use winit::event_loop::EventLoop;

use drawable::DrawCommand;
pub use drawable::DrawOption;
pub use graphics::Framebuffer;
pub use crate::image::Image;
pub use input::{InputManager, MouseButton};
pub use park::{BACKGROUND_COLOR, CAPACITY, JunglePark, ParkConfig};
pub use pt::Pt;
pub use tiger::Tiger;

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Jungle Park".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// State shared between the window driver and the running scene.
///
/// The context accumulates drawing commands during a frame, owns every
/// decoded image, and carries the input and window size the scene reads.
#[derive(Debug, Default)]
pub struct Context {
    draw_list: Vec<DrawCommand>,
    input: InputManager,
    window_size: (u32, u32),
    images: crate::image::ImageStore,
}

impl Context {
    /// Creates an empty context with a zero-sized window.
    ///
    /// The window driver does this automatically; tests and custom drivers
    /// can create one directly.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Loads an image from disk. Each path is decoded once; later calls
    /// return the same handle.
    ///
    /// # Errors
    /// Returns an error naming the path if the file is missing or cannot be
    /// decoded.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> anyhow::Result<Image> {
        self.images.load(path.as_ref())
    }

    /// Creates an image from raw RGBA8 pixel data.
    ///
    /// # Errors
    /// Returns an error if the data length doesn't match `width * height * 4`.
    pub fn create_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<Image> {
        self.images.create(width, height, rgba)
    }

    /// Makes later [`Context::load_image`] calls for `path` resolve to
    /// `image` without touching the filesystem.
    pub fn preload_image(&mut self, path: impl AsRef<Path>, image: Image) {
        self.images.alias(path.as_ref(), image);
    }

    /// Records a solid fill of the whole window.
    pub fn fill_background(&mut self, r: u8, g: u8, b: u8) {
        self.push(DrawCommand::Fill([r, g, b]));
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    /// Clears all drawing commands from the previous frame.
    pub(crate) fn begin_frame(&mut self) {
        self.draw_list.clear();
    }

    /// Adds a command to the draw list.
    ///
    /// Images whose bounds lie entirely outside the window are culled here.
    pub(crate) fn push(&mut self, drawable: DrawCommand) {
        if let DrawCommand::Image(_, opts, size) = &drawable {
            let (left, top) = opts.top_left(*size);
            let (w, h) = (size[0] as i64, size[1] as i64);
            let (screen_w, screen_h) = (self.window_size.0 as i64, self.window_size.1 as i64);
            if left + w <= 0 || top + h <= 0 || left >= screen_w || top >= screen_h {
                return;
            }
        }
        log::trace!("draw {:?}", drawable);
        self.draw_list.push(drawable);
    }

    pub(crate) fn draw_list(&self) -> &[DrawCommand] {
        &self.draw_list
    }

    pub(crate) fn image_pixels(&self, id: u32) -> Option<&::image::RgbaImage> {
        self.images.get(id)
    }
}

pub fn window_size(context: &Context) -> (u32, u32) {
    context.window_size()
}

pub fn cursor_position(context: &Context) -> Option<(Pt, Pt)> {
    context.input().cursor_position()
}

pub fn mouse_button_down(context: &Context, button: MouseButton) -> bool {
    context.input().mouse_down(button)
}

pub fn current_key(context: &Context) -> Option<char> {
    context.input().current_key()
}

/// Runs the application with the specified [`Scene`] type.
///
/// Creates the window, initializes the scene, and drives it until the window
/// closes or `Escape` is pressed. Returns the scene's initialization error, if
/// any, and any failure of the event loop or presentation surface.
pub fn run<T: Scene + 'static>(window: WindowConfig) -> anyhow::Result<()> {
    let event_loop =
        EventLoop::new().map_err(|e| anyhow::anyhow!("failed to create event loop: {e}"))?;
    let mut app = window::App::new::<T>(window);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("event loop error: {e}"))?;
    app.into_result()
}

/// Callbacks a scene implements; the window driver invokes them on its single
/// thread, never concurrently.
///
/// Per frame the driver calls [`Scene::update`] then [`Scene::draw`]. Input
/// callbacks run as the events arrive, between frames.
pub trait Scene {
    /// Called once, before any other callback. Load assets here.
    fn initialize(context: &mut Context) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Advances per-frame state.
    fn update(&mut self, _context: &mut Context) {}

    /// Records the current frame into the context.
    fn draw(&self, context: &mut Context);

    /// The left mouse button went down.
    fn mouse_down(&mut self, _context: &mut Context) {}

    /// The left mouse button was released.
    fn mouse_up(&mut self, _context: &mut Context) {}

    /// A key was pressed; read it with [`current_key`].
    fn key_pressed(&mut self, _context: &mut Context) {}

    /// Cleanup when the application is shutting down.
    fn remove(&self) {}
}
