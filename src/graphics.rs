//! CPU compositor that turns a frame's draw list into `0RGB` pixels.
//!
//! The pixel layout matches what `softbuffer` presents: one `u32` per pixel,
//! row-major, `0x00RRGGBB`.

use image::RgbaImage;

use crate::Context;
use crate::drawable::{DrawCommand, DrawOption};

#[inline]
pub(crate) fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// Source-over blend of a straight-alpha RGBA pixel onto an opaque one.
#[inline]
fn blend(dst: u32, [r, g, b, a]: [u8; 4]) -> u32 {
    match a {
        0 => dst,
        255 => pack_rgb(r, g, b),
        _ => {
            let [dr, dg, db] = unpack_rgb(dst);
            let a = a as u32;
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
            pack_rgb(mix(r, dr), mix(g, dg), mix(b, db))
        }
    }
}

/// A window-sized pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Resizes the buffer. Contents are undefined until the next render.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width as usize * height as usize, 0);
    }

    /// Replays the context's draw list in order.
    ///
    /// Draw commands whose image id is unknown to the context are skipped.
    pub fn render(&mut self, context: &Context) {
        for command in context.draw_list() {
            match command {
                DrawCommand::Fill([r, g, b]) => self.fill(pack_rgb(*r, *g, *b)),
                DrawCommand::Image(id, opts, _) => match context.image_pixels(*id) {
                    Some(pixels) => self.blit(pixels, opts),
                    None => log::warn!("draw of unknown image id {}", id),
                },
            }
        }
    }

    fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    fn blit(&mut self, src: &RgbaImage, opts: &DrawOption) {
        let (left, top) = opts.top_left([src.width(), src.height()]);
        let (fw, fh) = (self.width as i64, self.height as i64);

        // clip the source rectangle to the frame
        let x0 = left.max(0);
        let y0 = top.max(0);
        let x1 = (left + src.width() as i64).min(fw);
        let y1 = (top + src.height() as i64).min(fh);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            let sy = (y - top) as u32;
            for x in x0..x1 {
                let sx = (x - left) as u32;
                let dst = &mut self.pixels[row + x as usize];
                *dst = blend(*dst, src.get_pixel(sx, sy).0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pt;

    fn solid(ctx: &mut Context, w: u32, h: u32, rgba: [u8; 4]) -> crate::Image {
        let data: Vec<u8> = rgba.iter().copied().cycle().take((w * h * 4) as usize).collect();
        ctx.create_image(w, h, &data).unwrap()
    }

    fn at(x: f32, y: f32) -> DrawOption {
        DrawOption::new([Pt::from(x), Pt::from(y)])
    }

    #[test]
    fn test_fill_covers_frame() {
        let mut ctx = Context::new();
        ctx.set_window_size(4, 3);
        ctx.fill_background(245, 255, 250);

        let mut fb = Framebuffer::new(4, 3);
        fb.render(&ctx);
        assert!(fb.pixels().iter().all(|&p| p == 0x00F5FFFA));
    }

    #[test]
    fn test_blit_is_centered() {
        let mut ctx = Context::new();
        ctx.set_window_size(10, 10);
        let red = solid(&mut ctx, 4, 2, [255, 0, 0, 255]);
        ctx.fill_background(0, 0, 0);
        red.draw(&mut ctx, at(5.0, 5.0));

        let mut fb = Framebuffer::new(10, 10);
        fb.render(&ctx);
        // covers x in 3..7, y in 4..6
        assert_eq!(fb.pixel(3, 4), Some(0xFF0000));
        assert_eq!(fb.pixel(6, 5), Some(0xFF0000));
        assert_eq!(fb.pixel(2, 4), Some(0));
        assert_eq!(fb.pixel(7, 4), Some(0));
        assert_eq!(fb.pixel(3, 3), Some(0));
        assert_eq!(fb.pixel(3, 6), Some(0));
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut ctx = Context::new();
        ctx.set_window_size(4, 4);
        let blue = solid(&mut ctx, 4, 4, [0, 0, 255, 255]);
        ctx.fill_background(0, 0, 0);
        blue.draw(&mut ctx, at(0.0, 0.0));

        let mut fb = Framebuffer::new(4, 4);
        fb.render(&ctx);
        assert_eq!(fb.pixel(0, 0), Some(0x0000FF));
        assert_eq!(fb.pixel(1, 1), Some(0x0000FF));
        assert_eq!(fb.pixel(2, 0), Some(0));
        assert_eq!(fb.pixel(0, 2), Some(0));
    }

    #[test]
    fn test_alpha_blends_over_background() {
        let mut ctx = Context::new();
        ctx.set_window_size(2, 2);
        let half = solid(&mut ctx, 2, 2, [255, 255, 255, 128]);
        let clear = solid(&mut ctx, 2, 2, [255, 0, 0, 0]);
        ctx.fill_background(0, 0, 0);
        half.draw(&mut ctx, at(1.0, 1.0));
        clear.draw(&mut ctx, at(1.0, 1.0));

        let mut fb = Framebuffer::new(2, 2);
        fb.render(&ctx);
        assert_eq!(fb.pixel(0, 0), Some(pack_rgb(128, 128, 128)));
    }

    #[test]
    fn test_resize_tracks_dimensions() {
        let mut fb = Framebuffer::new(2, 2);
        fb.resize(3, 5);
        assert_eq!((fb.width(), fb.height()), (3, 5));
        assert_eq!(fb.pixels().len(), 15);
        assert_eq!(fb.pixel(3, 0), None);
    }
}
