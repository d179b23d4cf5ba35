use crate::geometry::{scale_rounded, CropRect};
use image::{imageops, DynamicImage, GenericImageView};

/// Image resize and crop operations
pub struct ImageResize;

impl ImageResize {
    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            imageops::FilterType::CatmullRom
        } else {
            imageops::FilterType::Lanczos3
        }
    }

    /// Resize image to exact dimensions
    pub fn resize_exact(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (width, height) {
            return img.clone();
        }
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Resize so the height equals `height`, keeping the aspect ratio
    pub fn resize_to_height(img: &DynamicImage, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let width = scale_rounded(orig_width, height, orig_height);
        Self::resize_exact(img, width, height)
    }

    /// Resize so the width equals `width`, keeping the aspect ratio
    pub fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let height = scale_rounded(orig_height, width, orig_width);
        Self::resize_exact(img, width, height)
    }

    /// Copy the region described by `rect` into a new image
    pub fn crop(img: &DynamicImage, rect: CropRect) -> DynamicImage {
        img.crop_imm(rect.x, rect.y, rect.width, rect.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn test_select_filter_by_ratio() {
        assert_eq!(
            ImageResize::select_filter(1000, 1000, 100, 100),
            imageops::FilterType::Triangle
        );
        assert_eq!(
            ImageResize::select_filter(180, 180, 100, 100),
            imageops::FilterType::CatmullRom
        );
        assert_eq!(
            ImageResize::select_filter(120, 120, 100, 100),
            imageops::FilterType::Lanczos3
        );
    }

    #[test]
    fn test_resize_exact() {
        let resized = ImageResize::resize_exact(&solid(100, 100), 50, 30);
        assert_eq!(resized.dimensions(), (50, 30));
    }

    #[test]
    fn test_resize_to_height_keeps_aspect() {
        let resized = ImageResize::resize_to_height(&solid(600, 400), 200);
        assert_eq!(resized.dimensions(), (300, 200));
    }

    #[test]
    fn test_resize_to_width_keeps_aspect() {
        let resized = ImageResize::resize_to_width(&solid(400, 600), 200);
        assert_eq!(resized.dimensions(), (200, 300));
    }

    #[test]
    fn test_crop_takes_requested_region() {
        let mut canvas = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255]));
        canvas.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        let img = DynamicImage::ImageRgba8(canvas);

        let cropped = ImageResize::crop(
            &img,
            CropRect {
                x: 1,
                y: 0,
                width: 2,
                height: 2,
            },
        );
        assert_eq!(cropped.dimensions(), (2, 2));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(cropped.get_pixel(1, 0), Rgba([0, 0, 0, 255]));
    }
}
