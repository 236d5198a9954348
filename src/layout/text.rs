use crate::units::Px;
use crate::CardError;

/// The width limit used when neither the caller nor the surface provides one
pub const FALLBACK_MAX_WIDTH: Px = Px(300.0);

/// The capability the layout engine draws through: a width measurement for
/// strings under the surface's active font and style, a baseline-anchored
/// draw primitive, and optionally the surface's own width to fall back on
/// when no maximum line width is requested.
///
/// The engine treats measurement as a black box and propagates its failures
/// unmodified; it never estimates a width on its own.
pub trait TextSurface {
    /// The width the given text would occupy if drawn with the currently
    /// active font and style
    fn measure(&self, text: &str) -> Result<Px, CardError>;

    /// Draw text with its baseline anchored at the given position, using the
    /// currently active font and fill style
    fn draw_text(&mut self, text: &str, x: Px, y: Px) -> Result<(), CardError>;

    /// The pixel width of the surface, when known. Used as the ambient
    /// fallback for an unset maximum line width
    fn surface_width(&self) -> Option<Px> {
        None
    }
}

/// Parameters for one layout call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Maximum line width. Unset resolves to the surface width if known,
    /// else [FALLBACK_MAX_WIDTH]; resolution happens once per call
    pub max_width: Option<Px>,
    /// Vertical distance between successive baselines
    pub line_height: Px,
    /// Fixed additive gap between successive characters. Zero keeps glyph
    /// spacing with the draw primitive; positive switches to per-character
    /// placement
    pub letter_spacing: Px,
}

impl Default for LayoutParams {
    fn default() -> Self {
        LayoutParams {
            max_width: None,
            line_height: Px(30.0),
            letter_spacing: Px(0.0),
        }
    }
}

/// A line segment placed by the engine: the text assigned to the line and the
/// baseline-anchored coordinates it was (or would be) drawn at
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub text: String,
    pub coords: (Px, Px),
}

/// Resolve the effective maximum line width: the hard limit when given, else
/// the ambient surface width, else the fallback constant
pub fn resolve_max_width(requested: Option<Px>, ambient: Option<Px>) -> Px {
    requested.or(ambient).unwrap_or(FALLBACK_MAX_WIDTH)
}

/// The two placement strategies sharing the line-breaking loop. Exactly one
/// is selected per call and never changes mid-call.
enum Placement {
    /// Whole-line placement: completed lines are drawn when they break and
    /// the remainder is flushed at the end
    Block,
    /// Per-character placement with a fixed gap: characters are drawn as they
    /// are consumed, so line breaks only move the cursor
    Loose { spacing: Px },
}

impl Placement {
    /// A completed line is leaving the buffer because the next character
    /// would overflow
    fn commit_line<S: TextSurface>(
        &mut self,
        surface: &mut S,
        line: &str,
        x: Px,
        y: Px,
    ) -> Result<(), CardError> {
        match self {
            Placement::Block => surface.draw_text(line, x, y),
            // loose mode already placed every character of this line
            Placement::Loose { .. } => Ok(()),
        }
    }

    /// A character was consumed, either appended to the line or starting a
    /// fresh one
    fn place_char<S: TextSurface>(
        &mut self,
        surface: &mut S,
        ch: char,
        cursor: &mut (Px, Px),
    ) -> Result<(), CardError> {
        match self {
            Placement::Block => Ok(()),
            Placement::Loose { spacing } => {
                let mut buf = [0u8; 4];
                let ch = ch.encode_utf8(&mut buf);
                surface.draw_text(ch, cursor.0, cursor.1)?;
                cursor.0 += surface.measure(ch)? + *spacing;
                Ok(())
            }
        }
    }

    /// The input is exhausted; whatever is left in the buffer belongs to the
    /// final line
    fn flush<S: TextSurface>(
        &mut self,
        surface: &mut S,
        line: &str,
        x: Px,
        y: Px,
    ) -> Result<(), CardError> {
        match self {
            Placement::Block if !line.is_empty() => surface.draw_text(line, x, y),
            _ => Ok(()),
        }
    }
}

/// Lay out text against a maximum line width, drawing through the surface.
///
/// The input is consumed one character at a time. For each character the
/// candidate line (current buffer plus the character) is measured, with the
/// letter-spacing overhead counted from the gaps between the characters
/// already in the buffer. When the candidate overflows and the buffer is
/// non-empty, the line breaks before the character: the cursor returns to the
/// origin column and descends one line height, and the character starts the
/// next line. A character wider than the limit on an empty buffer is placed
/// alone on its line rather than split, so the loop always terminates after
/// exactly one decision per character.
///
/// In loose mode characters are drawn the moment they are consumed, so a
/// failure partway through leaves the earlier characters rendered; there is
/// no transaction mechanism. Callers needing all-or-nothing rendering should
/// lay out to an offscreen surface first.
pub fn layout_text<S: TextSurface>(
    surface: &mut S,
    text: &str,
    origin: (Px, Px),
    params: &LayoutParams,
) -> Result<(), CardError> {
    if params.line_height.0 <= 0.0 {
        return Err(CardError::InvalidInput(format!(
            "line height must be positive, got {}",
            params.line_height
        )));
    }
    if params.letter_spacing.0 < 0.0 {
        return Err(CardError::InvalidInput(format!(
            "letter spacing must not be negative, got {}",
            params.letter_spacing
        )));
    }
    let max_width = resolve_max_width(params.max_width, surface.surface_width());
    if max_width.0 <= 0.0 {
        return Err(CardError::InvalidInput(format!(
            "maximum line width must be positive, got {}",
            max_width
        )));
    }

    let spacing = params.letter_spacing;
    let mut placement = if spacing.0 > 0.0 {
        Placement::Loose { spacing }
    } else {
        Placement::Block
    };

    // the line being built and the position of the next character
    let mut line = String::new();
    let mut line_len = 0usize;
    let mut cursor = origin;

    for ch in text.chars() {
        // spacing overhead counts the gaps between characters already in the
        // buffer, not the one the candidate would introduce
        let spacing_overhead = spacing * line_len.saturating_sub(1) as f32;
        let mut candidate = line.clone();
        candidate.push(ch);
        let candidate_width = surface.measure(&candidate)? + spacing_overhead;

        if candidate_width > max_width && line_len > 0 {
            placement.commit_line(surface, &line, origin.0, cursor.1)?;
            line.clear();
            line.push(ch);
            line_len = 1;
            cursor.0 = origin.0;
            cursor.1 += params.line_height;
        } else {
            line.push(ch);
            line_len += 1;
        }

        placement.place_char(surface, ch, &mut cursor)?;
    }

    placement.flush(surface, &line, origin.0, cursor.1)
}

/// Block-mode wrapping: lay out text with whole-line placement and no letter
/// spacing. `line_height` defaults to 30 pixels
pub fn draw_wrapped<S: TextSurface>(
    surface: &mut S,
    text: &str,
    origin: (Px, Px),
    max_width: Option<Px>,
    line_height: Option<Px>,
) -> Result<(), CardError> {
    draw_flexible(surface, text, origin, max_width, line_height, None)
}

/// Spaced placement: lay out text character by character with the given gap,
/// bounded by the surface's own width so that short labels stay on one line
pub fn draw_loose<S: TextSurface>(
    surface: &mut S,
    text: &str,
    origin: (Px, Px),
    letter_spacing: Option<Px>,
) -> Result<(), CardError> {
    draw_flexible(surface, text, origin, None, None, letter_spacing)
}

/// The general entry point exposing every parameter. Unset parameters take
/// their defaults: surface width (else 300) for `max_width`, 30 for
/// `line_height`, and 0 for `letter_spacing`
pub fn draw_flexible<S: TextSurface>(
    surface: &mut S,
    text: &str,
    origin: (Px, Px),
    max_width: Option<Px>,
    line_height: Option<Px>,
    letter_spacing: Option<Px>,
) -> Result<(), CardError> {
    let defaults = LayoutParams::default();
    let params = LayoutParams {
        max_width,
        line_height: line_height.unwrap_or(defaults.line_height),
        letter_spacing: letter_spacing.unwrap_or(defaults.letter_spacing),
    };
    layout_text(surface, text, origin, &params)
}

/// A [TextSurface] that records draw calls instead of rendering them, backed
/// by any measurement function. Wrapping the engine with a collector is how
/// callers obtain line counts or bounding boxes, since the engine itself
/// draws write-once and keeps no side channel.
pub struct LineCollector<M> {
    measure: M,
    ambient_width: Option<Px>,
    lines: Vec<LineLayout>,
}

impl<M> LineCollector<M>
where
    M: Fn(&str) -> Result<Px, CardError>,
{
    pub fn new(measure: M) -> LineCollector<M> {
        LineCollector {
            measure,
            ambient_width: None,
            lines: Vec::new(),
        }
    }

    /// Give the collector an ambient width, standing in for a surface of that
    /// pixel width
    pub fn with_ambient_width(mut self, width: Px) -> LineCollector<M> {
        self.ambient_width = Some(width);
        self
    }

    /// The draw calls recorded so far, in placement order
    pub fn lines(&self) -> &[LineLayout] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<LineLayout> {
        self.lines
    }
}

impl<M> TextSurface for LineCollector<M>
where
    M: Fn(&str) -> Result<Px, CardError>,
{
    fn measure(&self, text: &str) -> Result<Px, CardError> {
        (self.measure)(text)
    }

    fn draw_text(&mut self, text: &str, x: Px, y: Px) -> Result<(), CardError> {
        self.lines.push(LineLayout {
            text: text.to_string(),
            coords: (x, y),
        });
        Ok(())
    }

    fn surface_width(&self) -> Option<Px> {
        self.ambient_width
    }
}

/// Wrap text in block mode without drawing anything, returning the line
/// segments the engine would have placed
pub fn wrap_lines<M>(
    text: &str,
    origin: (Px, Px),
    params: &LayoutParams,
    measure: M,
) -> Result<Vec<LineLayout>, CardError>
where
    M: Fn(&str) -> Result<Px, CardError>,
{
    let mut collector = LineCollector::new(measure);
    let params = LayoutParams {
        letter_spacing: Px(0.0),
        ..*params
    };
    layout_text(&mut collector, text, origin, &params)?;
    Ok(collector.into_lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten pixels per character, regardless of the character
    fn ten_per_char(text: &str) -> Result<Px, CardError> {
        Ok(Px(text.chars().count() as f32 * 10.0))
    }

    fn block_params(max_width: f32) -> LayoutParams {
        LayoutParams {
            max_width: Some(Px(max_width)),
            ..LayoutParams::default()
        }
    }

    fn run(text: &str, params: &LayoutParams) -> Vec<LineLayout> {
        let mut surface = LineCollector::new(ten_per_char);
        layout_text(&mut surface, text, (Px(0.0), Px(0.0)), params).unwrap();
        surface.into_lines()
    }

    #[test]
    fn empty_input_draws_nothing() {
        assert!(run("", &block_params(100.0)).is_empty());

        let loose = LayoutParams {
            max_width: Some(Px(100.0)),
            letter_spacing: Px(5.0),
            ..LayoutParams::default()
        };
        assert!(run("", &loose).is_empty());
    }

    #[test]
    fn block_lines_reassemble_the_input() {
        let lines = run("abcdefghij", &block_params(30.0));
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["abc", "def", "ghi", "j"]);

        let joined: String = texts.concat();
        assert_eq!(joined, "abcdefghij");
    }

    #[test]
    fn block_lines_stay_within_the_width_bound() {
        for line in run("abcdefghij", &block_params(30.0)) {
            assert!(ten_per_char(&line.text).unwrap() <= Px(30.0));
        }
    }

    #[test]
    fn block_cursor_descends_by_line_height_and_resets_x() {
        let params = LayoutParams {
            max_width: Some(Px(30.0)),
            line_height: Px(28.0),
            letter_spacing: Px(0.0),
        };
        let lines = run("abcdefg", &params);
        let coords: Vec<(f32, f32)> = lines.iter().map(|l| (l.coords.0 .0, l.coords.1 .0)).collect();
        assert_eq!(coords, [(0.0, 0.0), (0.0, 28.0), (0.0, 56.0)]);
    }

    #[test]
    fn overwide_character_is_placed_alone_without_splitting() {
        // every character measures 10, wider than the 1 pixel limit
        let lines = run("WW", &block_params(1.0));
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["W", "W"]);
        assert_eq!(lines[0].coords.1, Px(0.0));
        assert_eq!(lines[1].coords.1, Px(30.0));

        let single = run("W", &block_params(1.0));
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].text, "W");
    }

    #[test]
    fn loose_mode_draws_each_character_with_spacing() {
        let params = LayoutParams {
            max_width: Some(Px(300.0)),
            letter_spacing: Px(5.0),
            ..LayoutParams::default()
        };
        let draws = run("AB", &params);
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].text, "A");
        assert_eq!(draws[0].coords, (Px(0.0), Px(0.0)));
        // character width 10, plus spacing 5
        assert_eq!(draws[1].text, "B");
        assert_eq!(draws[1].coords, (Px(15.0), Px(0.0)));
    }

    #[test]
    fn flexible_at_zero_spacing_matches_wrapped() {
        let mut wrapped = LineCollector::new(ten_per_char);
        draw_wrapped(&mut wrapped, "abcdefghij", (Px(4.0), Px(9.0)), Some(Px(30.0)), None).unwrap();

        let mut flexible = LineCollector::new(ten_per_char);
        draw_flexible(
            &mut flexible,
            "abcdefghij",
            (Px(4.0), Px(9.0)),
            Some(Px(30.0)),
            None,
            Some(Px(0.0)),
        )
        .unwrap();

        assert_eq!(wrapped.lines(), flexible.lines());
    }

    #[test]
    fn small_spacing_keeps_the_same_break_points() {
        // spacing of 1 against a 35 pixel limit never changes which
        // characters land on which line compared to no spacing at all
        let text = "abcdefghij";
        let block_lines = run(text, &block_params(35.0));

        let loose = LayoutParams {
            max_width: Some(Px(35.0)),
            letter_spacing: Px(1.0),
            ..LayoutParams::default()
        };
        let draws = run(text, &loose);

        // group the per-character draws into lines by their y coordinate
        let mut loose_lines: Vec<String> = Vec::new();
        let mut last_y = None;
        for draw in &draws {
            if last_y != Some(draw.coords.1) {
                loose_lines.push(String::new());
                last_y = Some(draw.coords.1);
            }
            loose_lines.last_mut().unwrap().push_str(&draw.text);
        }

        let block_texts: Vec<&str> = block_lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(loose_lines, block_texts);
    }

    #[test]
    fn unset_width_falls_back_to_the_ambient_surface_width() {
        let mut surface = LineCollector::new(ten_per_char).with_ambient_width(Px(20.0));
        layout_text(&mut surface, "abc", (Px(0.0), Px(0.0)), &LayoutParams::default()).unwrap();
        let texts: Vec<&str> = surface.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["ab", "c"]);
    }

    #[test]
    fn unset_width_without_a_surface_uses_the_fallback_constant() {
        // 29 characters measure 290, just under the 300 fallback
        let text: String = std::iter::repeat('x').take(29).collect();
        let lines = run(&text, &LayoutParams::default());
        assert_eq!(lines.len(), 1);

        let text: String = std::iter::repeat('x').take(31).collect();
        let lines = run(&text, &LayoutParams::default());
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn non_positive_dimensions_are_rejected_before_drawing() {
        let mut surface = LineCollector::new(ten_per_char);

        let bad_height = LayoutParams {
            max_width: Some(Px(100.0)),
            line_height: Px(0.0),
            ..LayoutParams::default()
        };
        let err = layout_text(&mut surface, "abc", (Px(0.0), Px(0.0)), &bad_height);
        assert!(matches!(err, Err(CardError::InvalidInput(_))));

        let bad_width = LayoutParams {
            max_width: Some(Px(-4.0)),
            ..LayoutParams::default()
        };
        let err = layout_text(&mut surface, "abc", (Px(0.0), Px(0.0)), &bad_width);
        assert!(matches!(err, Err(CardError::InvalidInput(_))));

        assert!(surface.lines().is_empty());
    }

    #[test]
    fn measurement_failure_propagates_and_keeps_earlier_loose_draws() {
        // measurement gives out once the candidate line reaches three characters
        let flaky = |text: &str| -> Result<Px, CardError> {
            if text.chars().count() >= 3 {
                Err(CardError::InvalidInput("measurement failed".into()))
            } else {
                ten_per_char(text)
            }
        };

        let mut surface = LineCollector::new(flaky);
        let params = LayoutParams {
            max_width: Some(Px(300.0)),
            letter_spacing: Px(2.0),
            ..LayoutParams::default()
        };
        let result = layout_text(&mut surface, "abcd", (Px(0.0), Px(0.0)), &params);
        assert!(result.is_err());
        // the first two characters were already placed when measurement failed
        assert_eq!(surface.lines().len(), 2);
    }

    #[test]
    fn wrap_lines_ignores_letter_spacing() {
        let params = LayoutParams {
            max_width: Some(Px(30.0)),
            letter_spacing: Px(50.0),
            ..LayoutParams::default()
        };
        let lines = wrap_lines("abcdef", (Px(0.0), Px(0.0)), &params, ten_per_char).unwrap();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["abc", "def"]);
    }
}
