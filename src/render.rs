use image::{Rgb, RgbImage};
use imageproc::{drawing, rect};
use rusttype::{Font, Scale};

use std::fs;
use std::path::Path;

use crate::config::HarnessConfig;
use crate::error::{PlateError, PlateErrorKind};
use crate::processor::{Classification, Tag};

const LABEL_SCALE: f32 = 24.0;
const LABEL_MARGIN: u32 = 4;

pub fn load_font(path: impl AsRef<Path>) -> Result<Font<'static>, PlateError> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    Font::try_from_vec(data).ok_or_else(|| PlateErrorKind::FontError(path.to_path_buf()).into())
}

pub fn highlight(tag: Tag, config: &HarnessConfig) -> Rgb<u8> {
    match tag {
        Tag::Good => Rgb(config.good_color),
        Tag::Bad => Rgb(config.bad_color),
    }
}

/// Outlines one region, growing the outline outwards to `pen_width` pixels.
/// Regions with no area are left alone.
pub fn draw_region(img: &mut RgbImage, classification: &Classification, config: &HarnessConfig) {
    let origin = classification.poly.origin();
    let (width, height) = (classification.geometry.width, classification.geometry.height);
    if width <= 0 || height <= 0 {
        return;
    }
    let color = highlight(classification.tag, config);
    for grow in 0..config.pen_width.max(1) as i32 {
        let outline = rect::Rect::at(origin.x - grow, origin.y - grow)
            .of_size((width + 2 * grow) as u32, (height + 2 * grow) as u32);
        drawing::draw_hollow_rect_mut(img, outline, color);
    }
}

pub fn draw_regions(img: &mut RgbImage, classifications: &[Classification], config: &HarnessConfig) {
    for classification in classifications {
        draw_region(img, classification, config);
    }
}

/// Writes the best guess into the top left corner.
pub fn draw_label(img: &mut RgbImage, font: &Font<'_>, text: &str, config: &HarnessConfig) {
    if text.is_empty() {
        return;
    }
    let scale = Scale::uniform(LABEL_SCALE);
    drawing::draw_text_mut(img, Rgb(config.good_color), LABEL_MARGIN, LABEL_MARGIN, scale, font, text);
}
