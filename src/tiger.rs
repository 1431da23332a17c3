use std::path::Path;

use crate::{Context, DrawOption, Image, Pt};

/// One draggable tiger.
///
/// A tiger only holds state. Whoever owns it decides when it is being
/// dragged and where it should be.
#[derive(Debug, Clone, PartialEq)]
pub struct Tiger {
    image: Image,
    x: Pt,
    y: Pt,
    dragging: bool,
}

impl Tiger {
    /// Loads the tiger image at `path` and places the tiger at `(x, y)`.
    ///
    /// # Errors
    /// Fails if the image cannot be loaded.
    pub fn new(context: &mut Context, path: impl AsRef<Path>, x: Pt, y: Pt) -> anyhow::Result<Self> {
        let image = context.load_image(path)?;
        Ok(Self {
            image,
            x,
            y,
            dragging: false,
        })
    }

    /// Draws the tiger centered on its position.
    pub fn draw(&self, context: &mut Context) {
        self.image
            .draw(context, DrawOption::default().with_position([self.x, self.y]));
    }

    pub fn image(&self) -> Image {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn x(&self) -> Pt {
        self.x
    }

    pub fn y(&self) -> Pt {
        self.y
    }

    pub fn set_x(&mut self, x: Pt) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: Pt) {
        self.y = y;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::DrawCommand;

    fn context_with_tiger_image() -> Context {
        let mut ctx = Context::new();
        ctx.set_window_size(200, 200);
        let image = ctx.create_image(40, 20, &[255u8; 40 * 20 * 4]).unwrap();
        ctx.preload_image("tiger.png", image);
        ctx
    }

    #[test]
    fn test_new_tiger_is_idle() {
        let mut ctx = context_with_tiger_image();
        let tiger = Tiger::new(&mut ctx, "tiger.png", Pt::from(10u32), Pt::from(20u32)).unwrap();
        assert_eq!((tiger.x(), tiger.y()), (Pt::from(10u32), Pt::from(20u32)));
        assert_eq!((tiger.width(), tiger.height()), (40, 20));
        assert!(!tiger.is_dragging());
    }

    #[test]
    fn test_missing_image_fails() {
        let mut ctx = Context::new();
        assert!(Tiger::new(&mut ctx, "missing/tiger.png", Pt::default(), Pt::default()).is_err());
    }

    #[test]
    fn test_setters() {
        let mut ctx = context_with_tiger_image();
        let mut tiger = Tiger::new(&mut ctx, "tiger.png", Pt::default(), Pt::default()).unwrap();
        tiger.set_x(Pt::from(-30.0f32));
        tiger.set_y(Pt::from(900.0f32));
        tiger.set_dragging(true);
        assert_eq!(tiger.x(), Pt::from(-30.0f32));
        assert_eq!(tiger.y(), Pt::from(900.0f32));
        assert!(tiger.is_dragging());
    }

    #[test]
    fn test_draw_records_centered_blit() {
        let mut ctx = context_with_tiger_image();
        let tiger = Tiger::new(&mut ctx, "tiger.png", Pt::from(100u32), Pt::from(50u32)).unwrap();
        tiger.draw(&mut ctx);

        let [DrawCommand::Image(id, opts, size)] = ctx.draw_list() else {
            panic!("expected one image draw, got {:?}", ctx.draw_list());
        };
        assert_eq!(*id, tiger.image().id);
        assert_eq!(opts.position(), [Pt::from(100u32), Pt::from(50u32)]);
        assert_eq!(*size, [40, 20]);
    }
}
