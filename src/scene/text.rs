//! Text overlay state: content, font, color, padding, alignment, shadow and case transform.

use crate::foundation::core::{Color, Edges, Rect, Vec2};
use crate::foundation::error::{GrailError, GrailResult};

/// Pixels per typographic point at the reference 96 DPI.
pub const PX_PER_PT: f64 = 96.0 / 72.0;

/// Horizontal alignment inside the content box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    /// Flush left.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Flush right.
    Right,
}

impl HAlign {
    /// Parse `"left"`, `"center"` or `"right"`.
    pub fn parse(s: &str) -> GrailResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(GrailError::validation(format!(
                "unknown horizontal alignment \"{other}\""
            ))),
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Vertical alignment inside the content box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    /// Top edge.
    Top,
    /// Vertically centered.
    #[default]
    Middle,
    /// Bottom edge.
    Bottom,
}

impl VAlign {
    /// Parse `"top"`, `"middle"` or `"bottom"`.
    pub fn parse(s: &str) -> GrailResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            other => Err(GrailError::validation(format!(
                "unknown vertical alignment \"{other}\""
            ))),
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

/// Case transform applied to the text at display time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseTransform {
    /// Unchanged.
    #[default]
    Normal,
    /// First letter of every word upper-cased, the rest lower-cased.
    Title,
    /// All upper case.
    Upper,
    /// All lower case.
    Lower,
    /// First character upper-cased, the rest lower-cased.
    Capitalize,
}

impl CaseTransform {
    /// Parse one of `normal`, `title`, `upper`, `lower`, `capitalize`.
    pub fn parse(s: &str) -> GrailResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "none" | "" => Ok(Self::Normal),
            "title" => Ok(Self::Title),
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "capitalize" => Ok(Self::Capitalize),
            other => Err(GrailError::validation(format!(
                "unknown text transform \"{other}\""
            ))),
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Title => "title",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Capitalize => "capitalize",
        }
    }

    /// Apply the transform to `text`.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Normal => text.to_string(),
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Title => title_case(text),
            Self::Capitalize => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.as_str().to_lowercase().chars())
                        .collect(),
                    None => String::new(),
                }
            }
        }
    }
}

// A word is a run of letters; anything else (digits, apostrophes, spaces) starts a new word.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Font request: family name, point size and style name.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Family name, matched against registered fonts.
    pub family: String,
    /// Size in points.
    pub size_pt: f64,
    /// Style name such as `"normal"`, `"bold"` or `"italic"`.
    pub style: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "decorative".to_string(),
            size_pt: 12.0,
            style: "normal".to_string(),
        }
    }
}

impl FontSpec {
    /// Size in pixels at 96 DPI.
    pub fn size_px(&self) -> f64 {
        self.size_pt * PX_PER_PT
    }
}

/// Drop shadow drawn as an offset copy of the text.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shadow {
    /// Offset of the shadow copy.
    pub offset: Vec2,
    /// Blur radius. Stored and echoed back, not rasterized.
    pub blur: f64,
    /// Shadow color.
    pub color: Color,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset: Vec2::new(0.0, 5.0),
            blur: 0.0,
            color: Color::BLACK,
        }
    }
}

/// Overlay text drawn over all layers.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOverlay {
    text: String,
    font: FontSpec,
    color: Color,
    padding: Edges,
    align: (HAlign, VAlign),
    shadow: Shadow,
    case: CaseTransform,
    bounds: Rect,
}

impl TextOverlay {
    /// Empty overlay covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            text: String::new(),
            font: FontSpec::default(),
            color: Color::WHITE,
            padding: Edges::default(),
            align: (HAlign::Center, VAlign::Middle),
            shadow: Shadow::default(),
            case: CaseTransform::Normal,
            bounds,
        }
    }

    /// Raw text as set.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text after the case transform.
    pub fn display_text(&self) -> String {
        self.case.apply(&self.text)
    }

    /// Font request.
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Fill color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Padding inside the bounds.
    pub fn padding(&self) -> Edges {
        self.padding
    }

    /// Horizontal and vertical alignment.
    pub fn align(&self) -> (HAlign, VAlign) {
        self.align
    }

    /// Shadow parameters.
    pub fn shadow(&self) -> Shadow {
        self.shadow
    }

    /// Case transform.
    pub fn case_transform(&self) -> CaseTransform {
        self.case
    }

    /// Overlay bounds (the composition rect).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replace the font wholesale.
    pub fn set_font(&mut self, size_pt: f64, family: &str, style: &str) -> GrailResult<()> {
        let size_pt = checked_font_size(size_pt)?;
        self.font = FontSpec {
            family: family.to_string(),
            size_pt,
            style: style.to_string(),
        };
        Ok(())
    }

    /// Change only the family.
    pub fn set_font_family(&mut self, family: &str) {
        self.font.family = family.to_string();
    }

    /// Change only the point size.
    pub fn set_font_size(&mut self, size_pt: f64) -> GrailResult<()> {
        self.font.size_pt = checked_font_size(size_pt)?;
        Ok(())
    }

    /// Change only the style.
    pub fn set_font_style(&mut self, style: &str) {
        self.font.style = style.to_string();
    }

    /// Set the fill color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Set the padding in pixels.
    pub fn set_padding(&mut self, left: f64, top: f64, right: f64, bottom: f64) -> GrailResult<()> {
        if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
            return Err(GrailError::validation("text padding must be finite"));
        }
        self.padding = Edges::new(left, top, right, bottom);
        Ok(())
    }

    /// Set the alignment.
    pub fn set_align(&mut self, h: HAlign, v: VAlign) {
        self.align = (h, v);
    }

    /// Set all shadow parameters.
    pub fn set_shadow(&mut self, x: f64, y: f64, blur: f64, color: Color) -> GrailResult<()> {
        if ![x, y, blur].iter().all(|v| v.is_finite()) {
            return Err(GrailError::validation("shadow parameters must be finite"));
        }
        self.shadow = Shadow {
            offset: Vec2::new(x, y),
            blur: blur.max(0.0),
            color,
        };
        Ok(())
    }

    /// Set only the shadow offset.
    pub fn set_shadow_offset(&mut self, x: f64, y: f64) -> GrailResult<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GrailError::validation("shadow offset must be finite"));
        }
        self.shadow.offset = Vec2::new(x, y);
        Ok(())
    }

    /// Set only the shadow blur. Negative values clamp to zero.
    pub fn set_shadow_blur(&mut self, blur: f64) -> GrailResult<()> {
        if !blur.is_finite() {
            return Err(GrailError::validation("shadow blur must be finite"));
        }
        self.shadow.blur = blur.max(0.0);
        Ok(())
    }

    /// Set only the shadow color.
    pub fn set_shadow_color(&mut self, color: Color) {
        self.shadow.color = color;
    }

    /// Set the case transform.
    pub fn set_transform(&mut self, case: CaseTransform) {
        self.case = case;
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Bounds minus padding.
    pub fn content_box(&self) -> Rect {
        self.padding.inset(self.bounds)
    }

    /// Content box shifted by the shadow offset.
    pub fn shadow_box(&self) -> Rect {
        self.content_box() + self.shadow.offset
    }
}

fn checked_font_size(size_pt: f64) -> GrailResult<f64> {
    if !size_pt.is_finite() || size_pt <= 0.0 {
        return Err(GrailError::validation("font size must be finite and > 0"));
    }
    Ok(size_pt)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/text.rs"]
mod tests;
