use serde::Serialize;
use utoipa::ToSchema;

/// CSS pixels per millimetre at 96 DPI.
pub const PX_PER_MM: f64 = 96.0 / 25.4;

pub fn mm_to_px(mm: f64) -> f64 {
    mm * PX_PER_MM
}

/// Physical page with a uniform margin on all four sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PageFormat {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl PageFormat {
    pub const A4: PageFormat = PageFormat {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 7.5,
    };

    pub fn with_margin(self, margin_mm: f64) -> Self {
        Self { margin_mm, ..self }
    }

    /// The margin leaves a positive content box.
    pub fn is_valid(&self) -> bool {
        self.margin_mm >= 0.0
            && self.content_width_mm() > 0.0
            && self.content_height_mm() > 0.0
    }

    pub fn content_width_mm(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height_mm(&self) -> f64 {
        self.height_mm - 2.0 * self.margin_mm
    }

    /// Raster size of the content box at `scale` times 96 DPI.
    pub fn content_box_px(&self, scale: f64) -> RasterSize {
        RasterSize {
            width_px: (mm_to_px(self.content_width_mm()) * scale).round() as u32,
            height_px: (mm_to_px(self.content_height_mm()) * scale).round() as u32,
        }
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::A4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RasterSize {
    pub width_px: u32,
    pub height_px: u32,
}
