//! Font registry and paragraph layout for the text overlay and the test-card label.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::{Affine, Color, Rect, Vec2};
use crate::foundation::error::{GrailError, GrailResult};
use crate::render::cpu::affine_to_cpu;
use crate::scene::text::{HAlign, VAlign};

/// Environment variable naming the fallback font directory.
pub const FONT_DIR_ENV: &str = "GRAIL_FONT_DIR";

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct Face {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Fonts available to the renderer, loaded from raw bytes or a directory.
///
/// Family lookup is case-insensitive. A request for an unknown family falls back to the first
/// registered face, so the generic names control surfaces send (`"decorative"`, `"sans"`) still
/// render with whatever is installed.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: Vec<Face>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
        }
    }

    /// Registry loaded from `dir`, or from [`FONT_DIR_ENV`] when `dir` is `None`.
    ///
    /// Missing directories are logged and produce an empty registry; text then renders as nothing.
    pub fn discover(dir: Option<&Path>) -> Self {
        let mut book = Self::new();
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(FONT_DIR_ENV).map(PathBuf::from));
        let Some(dir) = dir else {
            tracing::warn!("no font directory given and {FONT_DIR_ENV} is unset; text is disabled");
            return book;
        };
        match book.load_dir(&dir) {
            Ok(0) => tracing::warn!(dir = %dir.display(), "font directory has no usable fonts"),
            Ok(n) => tracing::debug!(dir = %dir.display(), faces = n, "loaded fonts"),
            Err(err) => tracing::warn!(dir = %dir.display(), %err, "failed to load fonts"),
        }
        book
    }

    /// Register every font file directly inside `dir`, in file-name order. Returns the number of
    /// families added.
    pub fn load_dir(&mut self, dir: &Path) -> GrailResult<usize> {
        let entries =
            std::fs::read_dir(dir).with_context(|| format!("read font dir '{}'", dir.display()))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();

        let mut added = 0;
        for path in paths {
            let bytes =
                std::fs::read(&path).with_context(|| format!("read font '{}'", path.display()))?;
            match self.add_font(bytes) {
                Ok(families) => added += families.len(),
                Err(err) => tracing::warn!(path = %path.display(), %err, "skipping font file"),
            }
        }
        Ok(added)
    }

    /// Register a font from raw bytes. Returns the family names it provides.
    pub fn add_font(&mut self, bytes: Vec<u8>) -> GrailResult<Vec<String>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        if families.is_empty() {
            return Err(GrailError::validation("no font families registered from font bytes"));
        }

        let mut names = Vec::with_capacity(families.len());
        for (id, _) in families {
            let name = self
                .font_ctx
                .collection
                .family_name(id)
                .ok_or_else(|| GrailError::validation("registered font family has no name"))?
                .to_string();
            if self.faces.iter().any(|f| f.family == name) {
                continue;
            }
            self.faces.push(Face {
                family: name.clone(),
                data: vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.clone()),
                    0,
                ),
            });
            names.push(name);
        }
        Ok(names)
    }

    /// Registered family names in registration order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.family.as_str())
    }

    /// Whether no font is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Family that a request for `family` renders with.
    pub fn resolve(&self, family: &str) -> Option<&str> {
        self.face_index(family).map(|i| self.faces[i].family.as_str())
    }

    fn face_index(&self, family: &str) -> Option<usize> {
        if self.faces.is_empty() {
            return None;
        }
        Some(
            self.faces
                .iter()
                .position(|f| f.family.eq_ignore_ascii_case(family))
                .unwrap_or(0),
        )
    }

    /// Shape `text` wrapped to `max_width` pixels.
    ///
    /// `None` when no font is registered or the text is empty.
    pub(crate) fn layout(&mut self, request: &TextRequest<'_>) -> GrailResult<Option<PreparedText>> {
        if !request.size_px.is_finite() || request.size_px <= 0.0 {
            return Err(GrailError::validation("text size must be finite and > 0"));
        }
        if request.text.is_empty() {
            return Ok(None);
        }
        let Some(index) = self.face_index(request.family) else {
            return Ok(None);
        };
        let family = self.faces[index].family.clone();
        let font = self.faces[index].data.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, request.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(request.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            request.color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(request.text);
        let max_width = request.max_width.max(1.0);
        layout.break_all_lines(Some(max_width));
        let alignment = match request.align {
            HAlign::Left => parley::Alignment::Start,
            HAlign::Center => parley::Alignment::Center,
            HAlign::Right => parley::Alignment::End,
        };
        layout.align(Some(max_width), alignment, parley::AlignmentOptions::default());

        Ok(Some(PreparedText { layout, font }))
    }
}

/// Inputs for [`FontBook::layout`].
#[derive(Clone, Debug)]
pub(crate) struct TextRequest<'a> {
    pub(crate) text: &'a str,
    pub(crate) family: &'a str,
    pub(crate) size_px: f32,
    pub(crate) color: Color,
    pub(crate) max_width: f32,
    pub(crate) align: HAlign,
}

/// A shaped paragraph plus the font data its glyph ids refer to.
pub(crate) struct PreparedText {
    layout: parley::Layout<TextBrushRgba8>,
    font: vello_cpu::peniko::FontData,
}

impl PreparedText {
    pub(crate) fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }

    /// Top-left placement of the paragraph inside `bounds`. Lines are already aligned
    /// horizontally across the box width.
    pub(crate) fn origin_in(&self, bounds: Rect, valign: VAlign) -> Vec2 {
        let free = bounds.height() - self.height();
        let dy = match valign {
            VAlign::Top => 0.0,
            VAlign::Middle => free / 2.0,
            VAlign::Bottom => free,
        };
        Vec2::new(bounds.x0, bounds.y0 + dy)
    }

    /// Fill every glyph run at `origin`, using each run's brush color.
    pub(crate) fn draw(&self, ctx: &mut vello_cpu::RenderContext, origin: Vec2) {
        ctx.set_transform(affine_to_cpu(Affine::translate(origin)));
        for line in self.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
