use std::num::NonZeroU32;
use std::rc::Rc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::graphics::Framebuffer;
use crate::{Context, MouseButton, Pt, Scene, WindowConfig};

type SceneFactory = Box<dyn Fn(&mut Context) -> anyhow::Result<Box<dyn Scene>>>;

struct Presenter {
    window: Rc<Window>,
    // kept alive for the surface
    _context: softbuffer::Context<Rc<Window>>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
}

pub(crate) struct App {
    config: WindowConfig,
    presenter: Option<Presenter>,
    context: Context,
    framebuffer: Framebuffer,
    scene: Option<Box<dyn Scene>>,
    scene_factory: SceneFactory,
    failure: Option<anyhow::Error>,
}

fn softbuffer_error(what: &str, e: softbuffer::SoftBufferError) -> anyhow::Error {
    anyhow::anyhow!("{what}: {e}")
}

/// The character a key press stands for, if any.
fn key_char(key: &Key) -> Option<char> {
    match key {
        Key::Character(text) => text.chars().next(),
        _ => None,
    }
}

impl App {
    pub(crate) fn new<T: Scene + 'static>(config: WindowConfig) -> Self {
        Self {
            config,
            presenter: None,
            context: Context::new(),
            framebuffer: Framebuffer::new(0, 0),
            scene: None,
            scene_factory: Box::new(|ctx: &mut Context| {
                Ok(Box::new(T::initialize(ctx)?) as Box<dyn Scene>)
            }),
            failure: None,
        }
    }

    pub(crate) fn into_result(self) -> anyhow::Result<()> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        if self.failure.is_none() {
            self.failure = Some(error);
        }
        event_loop.exit();
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);
        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow::anyhow!("failed to create window: {e}"))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| softbuffer_error("failed to create softbuffer context", e))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| softbuffer_error("failed to create softbuffer surface", e))?;

        let size = window.inner_size();
        self.resize(size.width, size.height);
        log::info!("window opened at {}x{}", size.width, size.height);

        self.presenter = Some(Presenter {
            window,
            _context: context,
            surface,
        });

        let scene = (self.scene_factory)(&mut self.context)?;
        self.scene = Some(scene);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.context.set_window_size(width, height);
        self.framebuffer.resize(width, height);
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let (Some(presenter), Some(scene)) = (self.presenter.as_mut(), self.scene.as_mut()) else {
            return Ok(());
        };

        self.context.begin_frame();
        scene.update(&mut self.context);
        scene.draw(&mut self.context);
        self.context.input_mut().end_frame();

        let (Some(width), Some(height)) = (
            NonZeroU32::new(self.framebuffer.width()),
            NonZeroU32::new(self.framebuffer.height()),
        ) else {
            // minimized
            return Ok(());
        };
        self.framebuffer.render(&self.context);

        presenter
            .surface
            .resize(width, height)
            .map_err(|e| softbuffer_error("failed to resize surface", e))?;
        let mut buffer = presenter
            .surface
            .buffer_mut()
            .map_err(|e| softbuffer_error("failed to acquire frame buffer", e))?;
        buffer.copy_from_slice(self.framebuffer.pixels());
        buffer
            .present()
            .map_err(|e| softbuffer_error("failed to present frame", e))?;
        Ok(())
    }

    fn keyboard_input(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        if event.logical_key == Key::Named(NamedKey::Escape) {
            event_loop.exit();
            return;
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let Some(c) = key_char(&event.logical_key) else {
            return;
        };
        self.context.input_mut().set_current_key(Some(c));
        scene.key_pressed(&mut self.context);
        self.context.input_mut().set_current_key(None);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
        if self.presenter.is_some() {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Focused(focused) => {
                let was_dragging = self.context.input().mouse_down(MouseButton::Left);
                self.context.input_mut().handle_focus(focused);
                // the release may never arrive once focus is gone
                if was_dragging && !focused {
                    if let Some(scene) = self.scene.as_mut() {
                        scene.mouse_up(&mut self.context);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.context
                    .input_mut()
                    .handle_cursor_moved(Pt::from(position.x), Pt::from(position.y));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from_winit(button);
                let pressed = state == ElementState::Pressed;
                let changed = self.context.input_mut().handle_mouse_input(pressed, button);
                if !changed || button != MouseButton::Left {
                    return;
                }
                if let Some(scene) = self.scene.as_mut() {
                    if pressed {
                        scene.mouse_down(&mut self.context);
                    } else {
                        scene.mouse_up(&mut self.context);
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.keyboard_input(event_loop, event),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(presenter) = self.presenter.as_ref() {
            presenter.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(scene) = self.scene.take() {
            scene.remove();
        }
        // surface before window
        self.presenter.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_key_char() {
        assert_eq!(key_char(&Key::Character(SmolStr::new("T"))), Some('T'));
        assert_eq!(key_char(&Key::Character(SmolStr::new("r"))), Some('r'));
        assert_eq!(key_char(&Key::Named(NamedKey::Enter)), None);
    }
}
