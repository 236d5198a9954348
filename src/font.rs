use crate::units::Px;
use crate::CardError;
use ab_glyph_rasterizer::{point, Point, Rasterizer};
use owned_ttf_parser::{AsFaceRef, GlyphId, OutlineBuilder, OwnedFace};

/// A parsed font object. Fonts can be TTF or OTF fonts. Text is measured from
/// the font's horizontal advances and drawn by rasterizing glyph outlines into
/// coverage bitmaps, so any face with outline data will do.
///
/// Typically, fonts are referred to throughout user applications by the
/// [id_arena::Id] returned when adding them to a [Canvas](crate::Canvas),
/// and not by direct references
pub struct Font {
    pub face: OwnedFace,
}

/// A single rasterized glyph: a row-major coverage bitmap plus the bearings
/// needed to blit it against a baseline-anchored pen position
pub struct RasterGlyph {
    /// Horizontal offset from the pen position to the left edge of the bitmap
    pub left: f32,
    /// Vertical offset from the baseline up to the top edge of the bitmap
    pub top: f32,
    /// Bitmap width in pixels
    pub width: usize,
    /// Bitmap height in pixels
    pub height: usize,
    /// One coverage byte per pixel, row-major from the top-left corner
    pub coverage: Vec<u8>,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if
    /// the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, CardError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    fn scaling(&self, size: Px) -> f32 {
        size.0 / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Px) -> Px {
        Px(self.scaling(size) * self.face.as_face_ref().ascender() as f32)
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Px) -> Px {
        Px(self.scaling(size) * self.face.as_face_ref().descender() as f32)
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: Px) -> Px {
        let scaling = self.scaling(size);
        let leading = scaling * self.face.as_face_ref().line_gap() as f32;
        let ascent = scaling * self.face.as_face_ref().ascender() as f32;
        let descent = scaling * self.face.as_face_ref().descender() as f32;
        Px(leading + ascent - descent)
    }

    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.face.as_face_ref().glyph_index(ch)
    }

    /// Resolve a character to a glyph, substituting the replacement character
    /// and then a question mark when the face has no mapping for it
    fn glyph_or_replacement(&self, ch: char) -> Option<GlyphId> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
    }

    /// The horizontal advance of a single character at the given size.
    /// Characters without a glyph (after replacement fallback) advance by zero
    pub fn advance(&self, ch: char, size: Px) -> Px {
        let scaling = self.scaling(size);
        self.glyph_or_replacement(ch)
            .and_then(|gid| self.face.as_face_ref().glyph_hor_advance(gid))
            .map(|adv| Px(scaling * adv as f32))
            .unwrap_or_default()
    }

    /// Calculate the width of a given string of text at the given font size
    pub fn width_of_text(&self, text: &str, size: Px) -> Px {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }

    /// Rasterize a single character at the given size into a coverage bitmap.
    /// Returns [None] for characters with no outline, such as whitespace;
    /// their advance still applies
    pub fn rasterize(&self, ch: char, size: Px) -> Option<RasterGlyph> {
        let face = self.face.as_face_ref();
        let gid = self.glyph_or_replacement(ch)?;
        let bbox = face.glyph_bounding_box(gid)?;

        let scale = self.scaling(size);
        let x_min = bbox.x_min as f32 * scale;
        let x_max = bbox.x_max as f32 * scale;
        let y_min = bbox.y_min as f32 * scale;
        let y_max = bbox.y_max as f32 * scale;

        let width = (x_max - x_min).ceil() as usize + 1;
        let height = (y_max - y_min).ceil() as usize + 1;

        let mut pen = OutlinePen {
            rasterizer: Rasterizer::new(width, height),
            scale,
            x_off: -x_min,
            y_off: y_max,
            first: point(0.0, 0.0),
            last: point(0.0, 0.0),
        };
        face.outline_glyph(gid, &mut pen)?;

        let mut coverage = vec![0u8; width * height];
        pen.rasterizer.for_each_pixel_2d(|x, y, alpha| {
            coverage[y as usize * width + x as usize] = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
        });

        Some(RasterGlyph {
            left: x_min,
            top: y_max,
            width,
            height,
            coverage,
        })
    }
}

/// Feeds y-flipped, pixel-scaled glyph outline segments into the coverage
/// rasterizer. Font outlines are y-up; the bitmap is y-down from its top edge
struct OutlinePen {
    rasterizer: Rasterizer,
    scale: f32,
    x_off: f32,
    y_off: f32,
    first: Point,
    last: Point,
}

impl OutlinePen {
    fn map(&self, x: f32, y: f32) -> Point {
        point(x * self.scale + self.x_off, self.y_off - y * self.scale)
    }
}

impl OutlineBuilder for OutlinePen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.last = self.map(x, y);
        self.first = self.last;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.rasterizer.draw_line(self.last, p);
        self.last = p;
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let control = self.map(x1, y1);
        let p = self.map(x, y);
        self.rasterizer.draw_quad(self.last, control, p);
        self.last = p;
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c0 = self.map(x1, y1);
        let c1 = self.map(x2, y2);
        let p = self.map(x, y);
        self.rasterizer.draw_cubic(self.last, c0, c1, p);
        self.last = p;
    }

    fn close(&mut self) {
        self.rasterizer.draw_line(self.last, self.first);
        self.last = self.first;
    }
}
