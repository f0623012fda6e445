//! Executes planned paint operations against the 2d canvas context.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::brush::PaintOp;

/// Background the raster is cleared to at every round boundary.
const BACKGROUND: &str = "#ffffff";

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPainter {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> CanvasPainter {
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        CanvasPainter { ctx, width, height }
    }

    /// Clear the raster to a blank background.
    pub fn clear(&self) {
        self.reset_modifiers();
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    /// Apply ops strictly in order. Transient modifiers (alpha, glow, erase
    /// compositing) are set from each op before it draws and reset after, so
    /// no brush leaks state into the next op or into effect overlays.
    pub fn apply(&self, ops: &[PaintOp]) -> Result<(), JsValue> {
        for op in ops {
            match op {
                PaintOp::Stroke {
                    from,
                    to,
                    width,
                    color,
                    alpha,
                    glow,
                    erase,
                } => {
                    let css = color.css();
                    self.ctx.set_global_alpha(*alpha);
                    if let Some(blur) = glow {
                        self.ctx.set_shadow_blur(*blur);
                        self.ctx.set_shadow_color(&css);
                    }
                    if *erase {
                        self.ctx.set_global_composite_operation("destination-out")?;
                    }
                    self.ctx.set_stroke_style_str(&css);
                    self.ctx.set_line_width(*width);
                    self.ctx.begin_path();
                    self.ctx.move_to(from.x, from.y);
                    // A zero-length line_to with round caps renders a stub
                    // rather than erroring; required for the first sample of
                    // a stroke.
                    self.ctx.line_to(to.x, to.y);
                    self.ctx.stroke();
                    self.reset_modifiers();
                }
                PaintOp::Disc { center, radius, color } => {
                    self.ctx.set_fill_style_str(&color.css());
                    self.ctx.begin_path();
                    self.ctx
                        .arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU)?;
                    self.ctx.fill();
                }
                PaintOp::Square { x, y, size, color } => {
                    self.ctx.set_fill_style_str(&color.css());
                    self.ctx.fill_rect(*x, *y, *size, *size);
                }
            }
        }
        Ok(())
    }

    /// Drop any transient rendering state. Also called when the active brush
    /// changes mid-stroke so a lingering glow never outlives its brush.
    pub fn reset_modifiers(&self) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_shadow_blur(0.0);
        self.ctx.set_shadow_color("rgba(0,0,0,0)");
        // Cannot fail for a known mode string.
        let _ = self.ctx.set_global_composite_operation("source-over");
    }
}
