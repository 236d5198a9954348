use crate::colour::{colours, Colour};
use crate::font::{Font, RasterGlyph};
use crate::layout::{self, TextSurface};
use crate::units::Px;
use crate::CardError;
use base64::{engine::general_purpose, Engine as _};
use id_arena::{Arena, Id};
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use log::warn;
use std::path::Path;

/// Width of a rendered card in pixels
pub const CARD_WIDTH: u32 = 640;
/// Height of a rendered card in pixels, from the aspect ratio of the physical
/// card (85.6mm by 54mm)
pub const CARD_HEIGHT: u32 = 404;

/// A raster drawing surface with an active font and fill state, in the manner
/// of a 2D canvas context. Fonts are stored "globally" within the canvas and
/// referred to by the [Id] returned from [Canvas::add_font].
///
/// The canvas is the shared mutable resource of every drawing call: it is
/// owned exclusively by the caller for the duration of a call, and no two
/// layout calls may draw onto the same canvas concurrently.
pub struct Canvas {
    pub fonts: Arena<Font>,
    image: RgbaImage,
    font: Option<(Id<Font>, Px)>,
    fill: Colour,
}

impl Canvas {
    /// Create a canvas of the given pixel dimensions, filled white
    pub fn new(width: u32, height: u32) -> Canvas {
        Canvas {
            fonts: Arena::new(),
            image: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            font: None,
            fill: colours::BLACK,
        }
    }

    /// Create a canvas with the standard card dimensions
    pub fn new_card() -> Canvas {
        Canvas::new(CARD_WIDTH, CARD_HEIGHT)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Add a font to the canvas. The returned id stays valid for the lifetime
    /// of the canvas
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Select the font and size the next text operations draw with
    pub fn set_font(&mut self, font: Id<Font>, size: Px) {
        self.font = Some((font, size));
    }

    /// Select the fill colour for the next text operations. Black until set
    pub fn set_fill(&mut self, colour: Colour) {
        self.fill = colour;
    }

    fn active_font(&self) -> Result<(Id<Font>, Px), CardError> {
        self.font
            .ok_or_else(|| CardError::InvalidInput("no font selected on the canvas".into()))
    }

    /// Flood the whole surface with one colour
    pub fn fill(&mut self, colour: Colour) {
        let [r, g, b] = colour.to_bytes();
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([r, g, b, 255]);
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, colour: Colour) {
        let [r, g, b] = colour.to_bytes();
        for py in y.max(0)..(y + height as i64).min(self.image.height() as i64) {
            for px in x.max(0)..(x + width as i64).min(self.image.width() as i64) {
                self.image.put_pixel(px as u32, py as u32, Rgba([r, g, b, 255]));
            }
        }
    }

    /// Composite an image onto the surface, scaled to the given size
    pub fn draw_image(&mut self, image: &DynamicImage, x: i64, y: i64, width: u32, height: u32) {
        let scaled = image
            .resize_exact(width, height, imageops::FilterType::Triangle)
            .to_rgba8();
        imageops::overlay(&mut self.image, &scaled, x, y);
    }

    /// The width the given text would occupy under the active font and size,
    /// rounded up to whole pixels
    pub fn measure_text(&self, text: &str) -> Result<Px, CardError> {
        let (font, size) = self.active_font()?;
        Ok(self.fonts[font].width_of_text(text, size).ceil())
    }

    /// Draw text with its baseline anchored at the given position, using the
    /// active font, size, and fill colour. Characters the face cannot map
    /// even through replacement fallbacks are skipped
    pub fn fill_text(&mut self, text: &str, x: Px, y: Px) -> Result<(), CardError> {
        let (font_id, size) = self.active_font()?;
        let font = &self.fonts[font_id];

        let mut pen_x = x.0;
        for ch in text.chars() {
            match font.rasterize(ch, size) {
                Some(glyph) => blend_glyph(&mut self.image, &glyph, pen_x, y.0, self.fill),
                None if !ch.is_whitespace() && font.glyph_id(ch).is_none() => {
                    warn!("no glyph for {ch:?} in the active font, skipping it");
                }
                None => {}
            }
            pen_x += font.advance(ch, size).0;
        }

        Ok(())
    }

    /// Block-mode wrapping against a maximum line width, mirroring
    /// [layout::draw_wrapped]
    pub fn wrap_text(
        &mut self,
        text: &str,
        x: Px,
        y: Px,
        max_width: Option<Px>,
        line_height: Option<Px>,
    ) -> Result<(), CardError> {
        layout::draw_wrapped(self, text, (x, y), max_width, line_height)
    }

    /// Per-character placement with a fixed letter spacing, bounded by the
    /// canvas width, mirroring [layout::draw_loose]
    pub fn loose_text(&mut self, text: &str, x: Px, y: Px, letter_spacing: Px) -> Result<(), CardError> {
        layout::draw_loose(self, text, (x, y), Some(letter_spacing))
    }

    /// The general text layout entry point, mirroring [layout::draw_flexible]
    pub fn flexible_text(
        &mut self,
        text: &str,
        x: Px,
        y: Px,
        max_width: Option<Px>,
        line_height: Option<Px>,
        letter_spacing: Option<Px>,
    ) -> Result<(), CardError> {
        layout::draw_flexible(self, text, (x, y), max_width, line_height, letter_spacing)
    }

    /// The finished surface
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the surface as a PNG
    pub fn to_png(&self) -> Result<Vec<u8>, CardError> {
        let mut bytes = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut bytes);
        self.image
            .write_to(&mut cursor, image::ImageOutputFormat::Png)?;
        Ok(bytes)
    }

    /// Encode the surface as a `data:image/png;base64,` URL
    pub fn to_data_url(&self) -> Result<String, CardError> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(png)
        ))
    }

    /// Write the surface to disk, with the format taken from the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CardError> {
        self.image.save(path)?;
        Ok(())
    }
}

impl TextSurface for Canvas {
    fn measure(&self, text: &str) -> Result<Px, CardError> {
        self.measure_text(text)
    }

    fn draw_text(&mut self, text: &str, x: Px, y: Px) -> Result<(), CardError> {
        self.fill_text(text, x, y)
    }

    fn surface_width(&self) -> Option<Px> {
        Some(Px(self.image.width() as f32))
    }
}

/// Blend a coverage bitmap onto the surface at a baseline-anchored pen
/// position, clipping at the edges
fn blend_glyph(image: &mut RgbaImage, glyph: &RasterGlyph, pen_x: f32, baseline: f32, colour: Colour) {
    let [r, g, b] = colour.to_bytes();
    let left = (pen_x + glyph.left).round() as i64;
    let top = (baseline - glyph.top).round() as i64;

    for gy in 0..glyph.height {
        for gx in 0..glyph.width {
            let alpha = glyph.coverage[gy * glyph.width + gx] as u32;
            if alpha == 0 {
                continue;
            }
            let px = left + gx as i64;
            let py = top + gy as i64;
            if px < 0 || py < 0 || px >= image.width() as i64 || py >= image.height() as i64 {
                continue;
            }

            let pixel = image.get_pixel_mut(px as u32, py as u32);
            for (dst, src) in pixel.0.iter_mut().take(3).zip([r, g, b]) {
                *dst = ((src as u32 * alpha + *dst as u32 * (255 - alpha)) / 255) as u8;
            }
        }
    }
}
