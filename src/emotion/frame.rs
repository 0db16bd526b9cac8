use serde::{Deserialize, Serialize};

use crate::emotion::types::FaceBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    Gray,
    Bgr,
    Rgb,
    Bgra,
    Rgba,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::Bgr | PixelLayout::Rgb => 3,
            PixelLayout::Bgra | PixelLayout::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            layout,
            data,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        let expected = self.width as usize * self.height as usize * self.layout.channels();
        expected > 0 && self.data.len() == expected
    }

    /// BT.601 亮度，与 OpenCV `COLOR_BGR2GRAY` 权重一致；格式错误返回 `None`
    pub fn to_gray(&self) -> Option<GrayImage> {
        if !self.is_well_formed() {
            return None;
        }

        let channels = self.layout.channels();
        let pixels = match self.layout {
            PixelLayout::Gray => self.data.clone(),
            PixelLayout::Bgr | PixelLayout::Bgra => self
                .data
                .chunks_exact(channels)
                .map(|px| luma(px[2], px[1], px[0]))
                .collect(),
            PixelLayout::Rgb | PixelLayout::Rgba => self
                .data
                .chunks_exact(channels)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
        };

        Some(GrayImage {
            width: self.width,
            height: self.height,
            pixels,
        })
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((y + 500) / 1000).min(255) as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl GrayImage {
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// 裁剪到图像边界内，区域为空返回 `None`
    pub fn crop(&self, region: &FaceBox) -> Option<GrayImage> {
        let x0 = region.x.max(0) as u32;
        let y0 = region.y.max(0) as u32;
        let x1 = (i64::from(region.x) + i64::from(region.width)).clamp(0, i64::from(self.width))
            as u32;
        let y1 = (i64::from(region.y) + i64::from(region.height))
            .clamp(0, i64::from(self.height)) as u32;
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        let width = x1 - x0;
        let height = y1 - y0;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in y0..y1 {
            let start = (row * self.width + x0) as usize;
            pixels.extend_from_slice(&self.pixels[start..start + width as usize]);
        }

        Some(GrayImage {
            width,
            height,
            pixels,
        })
    }
}
