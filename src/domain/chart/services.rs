use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::domain::chart::{CandleSlot, DrawInstruction, Frame, FrameLayout, PriceScale};
use crate::domain::errors::RenderingResult;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{CandlestickRecord, SeriesResult};

/// Bodies thinner than this are drawn at this height instead of vanishing.
pub const MIN_BODY_HEIGHT_PX: f64 = 1.0;
/// Shown in place of the chart when a render pass fails.
pub const RENDER_FAILURE_MESSAGE: &str = "Unable to render chart. Please try again later.";

/// Per-record geometry check between the data and the drawing layer.
#[derive(Debug, Clone, Copy)]
pub struct RenderGuard {
    /// Body width as a share of the slot width.
    body_ratio: f64,
}

impl Default for RenderGuard {
    fn default() -> Self {
        Self { body_ratio: 0.5 }
    }
}

impl RenderGuard {
    pub fn new(body_ratio: f64) -> Self {
        let body_ratio = if body_ratio.is_finite() && body_ratio > 0.0 {
            body_ratio.min(1.0)
        } else {
            0.5
        };
        Self { body_ratio }
    }

    /// Pixel geometry for one record, or `None` when it cannot be drawn.
    ///
    /// The body comes from `body_high`/`body_low`; `high`/`low` only place the
    /// wick. The origin is `body_low` for bullish candles and `body_high`
    /// otherwise; `body_top` is whichever end is smaller in pixel space.
    pub fn render(
        &self,
        record: &CandlestickRecord,
        slot: CandleSlot,
        scale: Option<&dyn PriceScale>,
    ) -> Option<DrawInstruction> {
        let scale = scale.filter(|s| s.is_ready())?;
        if !(slot.x.is_finite() && slot.width.is_finite() && slot.width > 0.0) {
            return None;
        }

        let body_high_px = scale.to_pixel(record.body_high());
        let body_low_px = scale.to_pixel(record.body_low());
        let height = (body_high_px - body_low_px).abs();
        let y = if record.is_bullish() { body_low_px } else { body_high_px };
        let wick_top = scale.to_pixel(record.high());
        let wick_bottom = scale.to_pixel(record.low());

        if ![body_high_px, body_low_px, height, y, wick_top, wick_bottom]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }

        let width = slot.width * self.body_ratio;
        Some(DrawInstruction {
            x: slot.center() - width / 2.0,
            y,
            width,
            height: height.max(MIN_BODY_HEIGHT_PX),
            body_top: body_high_px.min(body_low_px),
            wick_x: slot.center(),
            wick_top,
            wick_bottom,
            is_bullish: record.is_bullish(),
        })
    }

    /// Draw list for a whole series laid out in equal slots.
    pub fn build_frame(
        &self,
        records: &[CandlestickRecord],
        layout: &FrameLayout,
        scale: Option<&dyn PriceScale>,
    ) -> Frame {
        let mut frame = Frame::default();
        for (index, record) in records.iter().enumerate() {
            match self.render(record, layout.slot(index, records.len()), scale) {
                Some(instruction) => frame.instructions.push(instruction),
                None => frame.skipped += 1,
            }
        }
        if frame.skipped > 0 {
            crate::log_debug!(
                LogComponent::Domain("RenderGuard"),
                "Skipped {} of {} candles with unusable geometry",
                frame.skipped,
                records.len()
            );
        }
        frame
    }
}

/// Drawing backend for one render pass.
pub trait ChartSurface {
    fn clear(&mut self, layout: &FrameLayout) -> RenderingResult<()>;
    fn paint(&mut self, instruction: &DrawInstruction) -> RenderingResult<()>;
    fn show_message(&mut self, layout: &FrameLayout, message: &str) -> RenderingResult<()>;
}

/// Result of a guarded render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Drawn(Frame),
    Failed { message: &'static str },
}

impl RenderOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, RenderOutcome::Failed { .. })
    }

    pub fn frame(&self) -> Option<&Frame> {
        match self {
            RenderOutcome::Drawn(frame) => Some(frame),
            RenderOutcome::Failed { .. } => None,
        }
    }
}

/// Fault boundary around a full render pass: surface errors and panics become
/// [`RenderOutcome::Failed`] and the surface is asked to show a static message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderBoundary {
    guard: RenderGuard,
}

impl ChartRenderBoundary {
    pub fn new(guard: RenderGuard) -> Self {
        Self { guard }
    }

    pub fn render_pass(
        &self,
        records: &[CandlestickRecord],
        layout: &FrameLayout,
        scale: Option<&dyn PriceScale>,
        surface: &mut dyn ChartSurface,
    ) -> RenderOutcome {
        let attempt = catch_unwind(AssertUnwindSafe(|| -> RenderingResult<Frame> {
            let frame = self.guard.build_frame(records, layout, scale);
            surface.clear(layout)?;
            for instruction in &frame.instructions {
                surface.paint(instruction)?;
            }
            Ok(frame)
        }));

        let reason = match attempt {
            Ok(Ok(frame)) => return RenderOutcome::Drawn(frame),
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        crate::log_error!(LogComponent::Domain("RenderBoundary"), "Render pass failed: {}", reason);
        let shown = catch_unwind(AssertUnwindSafe(|| {
            surface.show_message(layout, RENDER_FAILURE_MESSAGE)
        }));
        if !matches!(shown, Ok(Ok(()))) {
            crate::log_warn!(
                LogComponent::Domain("RenderBoundary"),
                "Surface could not display the fallback message"
            );
        }
        RenderOutcome::Failed { message: RENDER_FAILURE_MESSAGE }
    }

    /// Render a provider result with a scale fitted to the layout.
    pub fn render_series(
        &self,
        series: &SeriesResult,
        layout: &FrameLayout,
        surface: &mut dyn ChartSurface,
    ) -> RenderOutcome {
        let scale = layout.fit_scale(series.records());
        self.render_pass(
            series.records(),
            layout,
            scale.as_ref().map(|s| s as &dyn PriceScale),
            surface,
        )
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during render pass".to_string()
    }
}
