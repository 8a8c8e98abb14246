use std::sync::Arc;

use crate::assets::frames::FrameProvider;
use crate::foundation::core::{Affine, Color, Point, Rect};
use crate::foundation::error::{GrailError, GrailResult};
use crate::render::frame::Frame;
use crate::render::testcard::render_test_card;
use crate::render::text::{FontBook, TextRequest};
use crate::scene::display::Scene;
use crate::scene::layer::Layer;
use crate::scene::testcard::TestCard;
use crate::scene::text::TextOverlay;

/// Rasterizes a [`Scene`] into a composition-sized frame.
///
/// Stacking order is background, layers (bottom first), text shadow, text, then the test card
/// when it is shown. Global opacity applies to layers and text.
pub struct CpuRenderer {
    fonts: FontBook,
    card: Option<(TestCard, vello_cpu::Image)>,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("fonts", &self.fonts)
            .field("cached_card", &self.card.as_ref().map(|(card, _)| card))
            .finish()
    }
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new(FontBook::new())
    }
}

impl CpuRenderer {
    /// Renderer drawing text with `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts, card: None }
    }

    /// Font registry.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Mutable font registry, for registering fonts after construction.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Composite the scene. Layers pull their pixels from `frames`.
    #[tracing::instrument(skip_all, fields(w = scene.width(), h = scene.height()))]
    pub fn render(&mut self, scene: &Scene, frames: &mut dyn FrameProvider) -> GrailResult<Frame> {
        let (w, h) = size_to_u16(scene.width(), scene.height())?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let rect = scene.rect();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(scene.background()));
        ctx.fill_rect(&rect_to_cpu(rect));

        let opacity = scene.opacity() as f32;
        if opacity > 0.0 {
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            for layer in scene.layers() {
                draw_layer(&mut ctx, scene, layer, frames)?;
            }
            self.draw_text(&mut ctx, scene.text())?;
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }

        if scene.testcard() {
            let card = self.card_paint(scene.test_card())?;
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(card);
            ctx.fill_rect(&rect_to_cpu(rect));
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap_to_frame(&pixmap))
    }

    /// Rasterize `card` on its own, outside any scene.
    pub fn test_card(&mut self, card: &TestCard) -> GrailResult<Frame> {
        render_test_card(card, &mut self.fonts)
    }

    fn card_paint(&mut self, card: &TestCard) -> GrailResult<vello_cpu::Image> {
        if let Some((cached, paint)) = &self.card
            && cached == card
        {
            return Ok(paint.clone());
        }
        tracing::debug!(w = card.width(), h = card.height(), "regenerating test card");
        let frame = render_test_card(card, &mut self.fonts)?;
        let paint = image_paint(frame_to_pixmap(&frame)?);
        self.card = Some((card.clone(), paint.clone()));
        Ok(paint)
    }

    fn draw_text(&mut self, ctx: &mut vello_cpu::RenderContext, text: &TextOverlay) -> GrailResult<()> {
        let display = text.display_text();
        if display.is_empty() {
            return Ok(());
        }
        let (h, v) = text.align();
        let content = text.content_box();
        let shadow = text.shadow();
        let mut request = TextRequest {
            text: &display,
            family: &text.font().family,
            size_px: text.font().size_px() as f32,
            color: shadow.color,
            max_width: content.width() as f32,
            align: h,
        };

        if shadow.color.a > 0
            && let Some(prepared) = self.fonts.layout(&request)?
        {
            let bounds = text.shadow_box();
            prepared.draw(ctx, prepared.origin_in(bounds, v));
        }

        request.color = text.color();
        if let Some(prepared) = self.fonts.layout(&request)? {
            prepared.draw(ctx, prepared.origin_in(content, v));
        }
        Ok(())
    }
}

fn draw_layer(
    ctx: &mut vello_cpu::RenderContext,
    scene: &Scene,
    layer: &Layer,
    frames: &mut dyn FrameProvider,
) -> GrailResult<()> {
    let size = layer.size();
    let opacity = layer.opacity() as f32;
    if opacity <= 0.0 || size.width <= 0.0 || size.height <= 0.0 {
        return Ok(());
    }
    let Some(frame) = frames.frame(layer) else {
        return Ok(());
    };
    if frame.is_empty() {
        return Ok(());
    }
    let (fw, fh) = (f64::from(frame.width), f64::from(frame.height));
    let fit = Affine::scale_non_uniform(size.width / fw, size.height / fh);
    let transform = layer.transform(f64::from(scene.width()), f64::from(scene.height())) * fit;

    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(image_paint(frame_to_pixmap(&frame)?));
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, fw, fh));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
    Ok(())
}

pub(crate) fn size_to_u16(width: u32, height: u32) -> GrailResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GrailError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GrailError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(GrailError::render("surface must be at least 1x1"));
    }
    Ok((w, h))
}

pub(crate) fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

pub(crate) fn frame_to_pixmap(frame: &Frame) -> GrailResult<vello_cpu::Pixmap> {
    if !frame.premultiplied {
        return Err(GrailError::render("layer frames must be premultiplied"));
    }
    let (w, h) = size_to_u16(frame.width, frame.height)?;
    if frame.data.len() != frame.width as usize * frame.height as usize * 4 {
        return Err(GrailError::render("frame byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(frame.width as usize * frame.height as usize);
    for px in frame.data.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn pixmap_to_frame(pixmap: &vello_cpu::Pixmap) -> Frame {
    Frame {
        width: u32::from(pixmap.width()),
        height: u32::from(pixmap.height()),
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
