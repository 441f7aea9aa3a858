use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::domain::chart::formatting::{current_price_caption, format_axis_tick};
use crate::domain::chart::{ChartSurface, DrawInstruction, FrameLayout, LinearScale, WICK_COLOR};
use crate::domain::errors::{AppError, RenderingResult};
use crate::domain::logging::LogComponent;

const BACKGROUND_COLOR: &str = "#FFFFFF";
const TEXT_COLOR: &str = "#333333";
const LABEL_FONT: &str = "12px Arial";
const MESSAGE_FONT: &str = "16px Arial";

fn js_error(context: &str, err: JsValue) -> AppError {
    AppError::RenderingError(format!("{context}: {err:?}"))
}

/// Canvas 2D implementation of [`ChartSurface`].
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self { context }
    }

    /// Look up `canvas_id`, size it to `width` x `height` and take its 2D context.
    pub fn from_canvas_id(canvas_id: &str, width: u32, height: u32) -> RenderingResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| AppError::RenderingError("document not available".into()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| AppError::RenderingError(format!("canvas '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AppError::RenderingError(format!("'{canvas_id}' is not a canvas")))?;

        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")
            .map_err(|e| js_error("failed to get 2D context", e))?
            .ok_or_else(|| AppError::RenderingError("2D context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AppError::RenderingError("failed to cast to 2D context".into()))?;

        Ok(Self::new(context))
    }

    /// Min/max price ticks on the left and the current price caption on top.
    pub fn annotate(
        &mut self,
        layout: &FrameLayout,
        scale: &LinearScale,
        current_price: Option<f64>,
    ) -> RenderingResult<()> {
        let ctx = &self.context;
        ctx.set_fill_style(&JsValue::from(TEXT_COLOR));
        ctx.set_font(LABEL_FONT);

        ctx.fill_text(&format_axis_tick(scale.max_price), 10.0, layout.plot_top() + 15.0)
            .map_err(|e| js_error("fill_text", e))?;
        ctx.fill_text(&format_axis_tick(scale.min_price), 10.0, layout.plot_bottom())
            .map_err(|e| js_error("fill_text", e))?;

        ctx.set_font(MESSAGE_FONT);
        ctx.fill_text(&current_price_caption(current_price), layout.padding, 30.0)
            .map_err(|e| js_error("fill_text", e))?;
        Ok(())
    }
}

impl ChartSurface for CanvasSurface {
    fn clear(&mut self, layout: &FrameLayout) -> RenderingResult<()> {
        self.context.clear_rect(0.0, 0.0, layout.width, layout.height);
        self.context.set_fill_style(&JsValue::from(BACKGROUND_COLOR));
        self.context.fill_rect(0.0, 0.0, layout.width, layout.height);
        Ok(())
    }

    fn paint(&mut self, instruction: &DrawInstruction) -> RenderingResult<()> {
        let ctx = &self.context;

        ctx.set_stroke_style(&JsValue::from(WICK_COLOR));
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(instruction.wick_x, instruction.wick_top);
        ctx.line_to(instruction.wick_x, instruction.wick_bottom);
        ctx.stroke();

        ctx.set_fill_style(&JsValue::from(instruction.color()));
        ctx.fill_rect(instruction.x, instruction.top(), instruction.width, instruction.height);
        Ok(())
    }

    fn show_message(&mut self, layout: &FrameLayout, message: &str) -> RenderingResult<()> {
        self.clear(layout)?;
        self.context.set_fill_style(&JsValue::from(TEXT_COLOR));
        self.context.set_font(MESSAGE_FONT);
        self.context
            .fill_text(message, layout.padding, layout.height / 2.0)
            .map_err(|e| js_error("fill_text", e))?;

        crate::log_warn!(
            LogComponent::Infrastructure("CanvasSurface"),
            "Showing message instead of chart: {}",
            message
        );
        Ok(())
    }
}
