use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ImageEncoder, Rgb, RgbImage};
use nalgebra::Vector3;

use crate::Result;

// 렌더 결과. 색상은 한 줄씩(row-major) 저장됨
pub struct Image {
    width: u32,
    height: u32,
    pub pixels: Vec<Vector3<f32>>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vector3::zeros(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Vector3<f32> {
        self.pixels[(x + y * self.width) as usize]
    }

    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| color_to_rgb(&self.get(x, y)))
    }

    // .ppm(또는 확장자 없음)은 바이너리 P6, 나머지는 image가 확장자로 판단
    pub fn save(&self, path: &Path) -> Result<()> {
        let rgb = self.to_rgb8();
        let is_ppm = path
            .extension()
            .map_or(true, |ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let mut writer = BufWriter::new(File::create(path)?);
            PnmEncoder::new(&mut writer)
                .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
                .write_image(rgb.as_raw(), self.width, self.height, ColorType::Rgb8)?;
            writer.flush()?;
        } else {
            rgb.save(path)?;
        }

        Ok(())
    }
}

// 한 성분이라도 1을 넘으면 픽셀 전체를 같은 비율로 줄여서 색조를 유지
pub fn tone_map(color: &Vector3<f32>) -> Vector3<f32> {
    let max = color.max();
    if max > 1.0 {
        color * (1.0 / max)
    } else {
        *color
    }
}

pub fn color_to_rgb(color: &Vector3<f32>) -> Rgb<u8> {
    let mapped = tone_map(color);
    let channel = |c: f32| (255.0 * c.clamp(0.0, 1.0)) as u8;
    Rgb([channel(mapped.x), channel(mapped.y), channel(mapped.z)])
}
