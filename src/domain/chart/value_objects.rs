use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::domain::market_data::CandlestickRecord;

/// Price → pixel mapping supplied by the charting layer.
///
/// The layer may not be ready when data arrives, so callers pass the scale as
/// an optional capability and check `is_ready` before use.
pub trait PriceScale {
    fn to_pixel(&self, price: f64) -> f64;

    fn is_ready(&self) -> bool {
        true
    }
}

impl<F> PriceScale for F
where
    F: Fn(f64) -> f64,
{
    fn to_pixel(&self, price: f64) -> f64 {
        self(price)
    }
}

/// Value Object - linear price axis with Y growing downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub min_price: f64,
    pub max_price: f64,
    /// Pixel of `max_price`.
    pub top_px: f64,
    /// Pixel of `min_price`.
    pub bottom_px: f64,
}

impl LinearScale {
    pub fn new(min_price: f64, max_price: f64, top_px: f64, bottom_px: f64) -> Self {
        Self { min_price, max_price, top_px, bottom_px }
    }

    /// Auto domain from the records' low/high padded by 10% of the span.
    /// A flat series is widened by 1% of its price so the span never collapses.
    pub fn fit(records: &[CandlestickRecord], top_px: f64, bottom_px: f64) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let (lo, hi) = records.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.low()), hi.max(r.high()))
        });
        let span = hi - lo;
        let padding = if span > 0.0 {
            span * 0.1
        } else if lo != 0.0 {
            lo.abs() * 0.01
        } else {
            1.0
        };
        Some(Self::new(lo - padding, hi + padding, top_px, bottom_px))
    }

    pub fn price_range(&self) -> f64 {
        self.max_price - self.min_price
    }
}

impl PriceScale for LinearScale {
    fn to_pixel(&self, price: f64) -> f64 {
        let normalized = (price - self.min_price) / self.price_range();
        self.bottom_px - normalized * (self.bottom_px - self.top_px)
    }

    fn is_ready(&self) -> bool {
        self.price_range().is_finite() && self.price_range() > 0.0
    }
}

/// Horizontal band reserved for one candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleSlot {
    pub x: f64,
    pub width: f64,
}

impl CandleSlot {
    pub fn new(x: f64, width: f64) -> Self {
        Self { x, width }
    }

    pub fn center(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Plot area inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Reserved on the right for price labels.
    pub text_space: f64,
}

impl FrameLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, padding: 50.0, text_space: 80.0 }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.padding * 2.0 - self.text_space
    }

    pub fn plot_top(&self) -> f64 {
        self.padding
    }

    pub fn plot_bottom(&self) -> f64 {
        self.height - self.padding
    }

    /// Slot `index` of `count` equal bands across the plot width.
    pub fn slot(&self, index: usize, count: usize) -> CandleSlot {
        let width = self.plot_width() / count.max(1) as f64;
        CandleSlot::new(self.padding + index as f64 * width, width)
    }

    pub fn fit_scale(&self, records: &[CandlestickRecord]) -> Option<LinearScale> {
        LinearScale::fit(records, self.plot_top(), self.plot_bottom())
    }
}

/// Pixel geometry of one candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawInstruction {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Smaller pixel coordinate of the two body ends.
    pub body_top: f64,
    pub wick_x: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_bullish: bool,
}

impl DrawInstruction {
    pub fn color(&self) -> &'static str {
        if self.is_bullish { BULLISH_COLOR } else { BEARISH_COLOR }
    }

    /// Edge a top-down rectangle fill starts from, whatever the scale direction.
    pub fn top(&self) -> f64 {
        self.body_top
    }

    pub fn to_instance(&self) -> BodyInstance {
        BodyInstance {
            rect: [self.x as f32, self.y as f32, self.width as f32, self.height as f32],
            wick: [self.wick_x as f32, self.wick_top as f32, self.wick_bottom as f32],
            bullish: u32::from(self.is_bullish),
        }
    }
}

pub const BULLISH_COLOR: &str = "#00FF00";
pub const BEARISH_COLOR: &str = "#FF0000";
pub const WICK_COLOR: &str = "#000000";

/// GPU-friendly instance layout of a [`DrawInstruction`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub rect: [f32; 4],
    pub wick: [f32; 3],
    pub bullish: u32,
}

/// Draw list for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub instructions: Vec<DrawInstruction>,
    /// Records whose geometry was rejected.
    pub skipped: usize,
}

impl Frame {
    pub fn instances(&self) -> Vec<BodyInstance> {
        self.instructions.iter().map(DrawInstruction::to_instance).collect()
    }

    pub fn instance_bytes(instances: &[BodyInstance]) -> &[u8] {
        bytemuck::cast_slice(instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::Timestamp;

    fn record(low: f64, high: f64) -> CandlestickRecord {
        CandlestickRecord::from_ohlc(Timestamp::from_millis(0), "", low, high, low, high)
            .expect("valid candle")
    }

    #[test]
    fn linear_scale_inverts_y() {
        let scale = LinearScale::new(0.0, 100.0, 10.0, 110.0);
        assert_eq!(scale.to_pixel(100.0), 10.0);
        assert_eq!(scale.to_pixel(0.0), 110.0);
        assert_eq!(scale.to_pixel(50.0), 60.0);
        assert!(scale.is_ready());
    }

    #[test]
    fn collapsed_scale_is_not_ready() {
        let scale = LinearScale::new(5.0, 5.0, 0.0, 100.0);
        assert!(!scale.is_ready());
        assert!(scale.to_pixel(5.0).is_nan());
    }

    #[test]
    fn fit_pads_the_domain() {
        let scale = LinearScale::fit(&[record(90.0, 100.0), record(95.0, 110.0)], 0.0, 200.0)
            .expect("non-empty records");
        assert!((scale.min_price - 88.0).abs() < 1e-9);
        assert!((scale.max_price - 112.0).abs() < 1e-9);
    }

    #[test]
    fn fit_widens_a_flat_series() {
        let flat = CandlestickRecord::flat(Timestamp::from_millis(0), "", 200.0);
        let scale = LinearScale::fit(&[flat], 0.0, 100.0).expect("non-empty records");
        assert!(scale.is_ready());
        assert!((scale.to_pixel(200.0) - 50.0).abs() < 1e-9);
        assert!(LinearScale::fit(&[], 0.0, 100.0).is_none());
    }

    #[test]
    fn layout_slots_cover_plot_width() {
        let layout = FrameLayout::new(800.0, 500.0);
        assert_eq!(layout.plot_width(), 620.0);
        let last = layout.slot(3, 4);
        assert_eq!(last.x + last.width, layout.padding + layout.plot_width());
        assert_eq!(layout.slot(0, 0).width, 620.0);
    }

    #[test]
    fn instances_are_byte_castable() {
        let frame = Frame {
            instructions: vec![DrawInstruction {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
                body_top: 2.0,
                wick_x: 2.5,
                wick_top: 0.0,
                wick_bottom: 9.0,
                is_bullish: true,
            }],
            skipped: 0,
        };
        let instances = frame.instances();
        assert_eq!(Frame::instance_bytes(&instances).len(), std::mem::size_of::<BodyInstance>());
        assert_eq!(instances[0].bullish, 1);
        assert_eq!(frame.instructions[0].color(), BULLISH_COLOR);
        assert_eq!(frame.instructions[0].top(), 2.0);
    }
}
