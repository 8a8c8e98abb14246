use kurbo::{Circle, Shape, Stroke, StrokeOpts};

use crate::foundation::core::Rect;
use crate::foundation::error::GrailResult;
use crate::render::cpu::{bezpath_to_cpu, color_to_cpu, pixmap_to_frame, rect_to_cpu, size_to_u16};
use crate::render::frame::Frame;
use crate::render::text::{FontBook, TextRequest};
use crate::scene::testcard::TestCard;
use crate::scene::text::{HAlign, PX_PER_PT, VAlign};

const STROKE_TOLERANCE: f64 = 0.1;

/// Rasterize `card`. The label is skipped when `fonts` is empty.
#[tracing::instrument(skip(fonts), fields(w = card.width(), h = card.height()))]
pub fn render_test_card(card: &TestCard, fonts: &mut FontBook) -> GrailResult<Frame> {
    let (w, h) = size_to_u16(card.width(), card.height())?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    let rect = card.rect();
    let center = rect.center();

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color_to_cpu(TestCard::BACKGROUND));
    ctx.fill_rect(&rect_to_cpu(rect));

    let half = TestCard::GRID_WIDTH / 2.0;
    ctx.set_paint(color_to_cpu(TestCard::FOREGROUND));
    let (ys, xs) = card.grid_lines();
    for y in ys {
        ctx.fill_rect(&rect_to_cpu(Rect::new(rect.x0, y - half, rect.x1, y + half)));
    }
    for x in xs {
        ctx.fill_rect(&rect_to_cpu(Rect::new(x - half, rect.y0, x + half, rect.y1)));
    }

    let half = TestCard::AXIS_WIDTH / 2.0;
    ctx.set_paint(color_to_cpu(TestCard::ACCENT));
    ctx.fill_rect(&rect_to_cpu(Rect::new(
        rect.x0,
        center.y - half,
        rect.x1,
        center.y + half,
    )));
    ctx.fill_rect(&rect_to_cpu(Rect::new(
        center.x - half,
        rect.y0,
        center.x + half,
        rect.y1,
    )));

    let radius = card.circle_radius();
    let stroke = Stroke::new(TestCard::CIRCLE_WIDTH);
    for c in card.circle_centers() {
        let outline = kurbo::stroke(
            Circle::new(c, radius).path_elements(STROKE_TOLERANCE),
            &stroke,
            &StrokeOpts::default(),
            STROKE_TOLERANCE,
        );
        ctx.fill_path(&bezpath_to_cpu(&outline));
    }

    let label = card.label();
    let bounds = card.label_box();
    let prepared = fonts.layout(&TextRequest {
        text: &label,
        family: "decorative",
        size_px: (TestCard::LABEL_SIZE_PT * PX_PER_PT) as f32,
        color: TestCard::FOREGROUND,
        max_width: bounds.width() as f32,
        align: HAlign::Center,
    })?;
    if let Some(text) = prepared {
        text.draw(&mut ctx, text.origin_in(bounds, VAlign::Middle));
    }

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap_to_frame(&pixmap))
}

#[cfg(test)]
#[path = "../../tests/unit/render/testcard.rs"]
mod tests;
