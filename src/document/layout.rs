//! Page geometry for the payment sheet
//!
//! Every coordinate is in PDF points. Vertical offsets are measured down from
//! the top edge of the page; horizontal ones from the left edge.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported page formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// US Letter, 8.5 x 11 in
    #[default]
    Letter,
    /// US Legal, 8.5 x 14 in
    Legal,
    /// ISO A4, 210 x 297 mm
    A4,
}

impl PageSize {
    /// Width and height in points
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "letter" => Some(Self::Letter),
            "legal" => Some(Self::Legal),
            "a4" => Some(Self::A4),
            _ => None,
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
            .ok_or_else(|| format!("Unsupported page size '{value}', expected letter, legal or a4"))
    }
}

/// Absolute positions of every element on the sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Page format
    pub page_size: PageSize,
    /// Left edge of all text lines
    pub text_left: f32,
    /// Baseline of the title
    pub title_offset: f32,
    /// Baseline of the address line
    pub address_offset: f32,
    /// Baseline of the amount line
    pub amount_offset: f32,
    /// Baseline of the rate line
    pub rate_offset: f32,
    /// Bottom edge of the QR image
    pub qr_offset: f32,
    /// Side of the (square) QR image
    pub qr_size: f32,
    /// Distance from the QR bottom edge down to the caption baseline
    pub caption_gap: f32,
    /// Title font size
    pub title_font_size: f32,
    /// Detail lines font size
    pub body_font_size: f32,
    /// Caption font size
    pub caption_font_size: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            text_left: 100.0,
            title_offset: 100.0,
            address_offset: 130.0,
            amount_offset: 150.0,
            rate_offset: 170.0,
            qr_offset: 300.0,
            qr_size: 200.0,
            caption_gap: 30.0,
            title_font_size: 16.0,
            body_font_size: 12.0,
            caption_font_size: 10.0,
        }
    }
}

impl PageLayout {
    /// Page height in points
    pub fn page_height(&self) -> f32 {
        self.page_size.dimensions().1
    }

    /// Convert a top-down offset into a bottom-up PDF y coordinate.
    pub fn y_from_top(&self, offset: f32) -> f32 {
        self.page_height() - offset
    }

    /// Bottom-left corner of the QR image, centered horizontally
    pub fn qr_origin(&self) -> (f32, f32) {
        let (width, _) = self.page_size.dimensions();
        ((width - self.qr_size) / 2.0, self.y_from_top(self.qr_offset))
    }

    /// Baseline of the caption under the QR image
    pub fn caption_y(&self) -> f32 {
        self.qr_origin().1 - self.caption_gap
    }

    /// Check that every element lands on the page with a usable size.
    pub fn validate(&self) -> Result<(), String> {
        let named = [
            ("text_left", self.text_left),
            ("title_offset", self.title_offset),
            ("address_offset", self.address_offset),
            ("amount_offset", self.amount_offset),
            ("rate_offset", self.rate_offset),
            ("qr_offset", self.qr_offset),
            ("qr_size", self.qr_size),
            ("caption_gap", self.caption_gap),
            ("title_font_size", self.title_font_size),
            ("body_font_size", self.body_font_size),
            ("caption_font_size", self.caption_font_size),
        ];
        if let Some((name, value)) = named.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("layout.{name} must be a finite number, got {value}"));
        }

        for (name, value) in [
            ("qr_size", self.qr_size),
            ("title_font_size", self.title_font_size),
            ("body_font_size", self.body_font_size),
            ("caption_font_size", self.caption_font_size),
        ] {
            if value <= 0.0 {
                return Err(format!("layout.{name} must be positive, got {value}"));
            }
        }

        let (width, height) = self.page_size.dimensions();
        if !(0.0..=width).contains(&self.text_left) {
            return Err(format!(
                "layout.text_left {} is outside the page width {width}",
                self.text_left
            ));
        }
        for (name, value) in [
            ("title_offset", self.title_offset),
            ("address_offset", self.address_offset),
            ("amount_offset", self.amount_offset),
            ("rate_offset", self.rate_offset),
        ] {
            if !(0.0..=height).contains(&value) {
                return Err(format!("layout.{name} {value} is outside the page height {height}"));
            }
        }

        let (qr_x, qr_y) = self.qr_origin();
        if qr_x < 0.0 || qr_y < 0.0 || qr_y + self.qr_size > height {
            return Err(format!(
                "QR square of {} at offset {} does not fit on a {:?} page",
                self.qr_size, self.qr_offset, self.page_size
            ));
        }
        if !(0.0..=height).contains(&self.caption_y()) {
            return Err(format!(
                "layout.caption_gap {} puts the caption below the bottom of the page",
                self.caption_gap
            ));
        }

        Ok(())
    }
}
