//! Thumbnail geometry
//!
//! Pure functions deciding the intermediate resize and the centered crop for a
//! thumbnail. Nothing here touches pixels or I/O.

use crate::error::ThumbnailError;
use serde::Serialize;

/// Region of an image to keep, in pixels from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Full geometry for one thumbnail: resize first, then crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThumbnailPlan {
    pub resize_width: u32,
    pub resize_height: u32,
    pub crop: CropRect,
}

/// `round(value * numerator / denominator)`, half-up, never below 1.
/// Saturates at `u32::MAX`.
pub(crate) fn scale_rounded(value: u32, numerator: u32, denominator: u32) -> u32 {
    let denominator = u128::from(denominator.max(1));
    let scaled = (u128::from(value) * u128::from(numerator) * 2 + denominator) / (2 * denominator);
    scaled.clamp(1, u128::from(u32::MAX)) as u32
}

/// Intermediate size to resize to before center-cropping to `target`.
///
/// Landscape images (`natural_width > natural_height`) are resized to the
/// target height and portrait or square images to the target width, with the
/// other side following the natural aspect ratio.
///
/// When that choice leaves the derived side shorter than its target (the
/// target is proportionally wider or taller than the image), the other
/// dimension drives instead, so the result always covers the target and the
/// crop that follows is well defined.
pub fn resize_dimension_for(
    natural_width: u32,
    natural_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    debug_assert!(natural_width > 0 && natural_height > 0);

    let by_height = || {
        (
            scale_rounded(natural_width, target_height, natural_height),
            target_height,
        )
    };
    let by_width = || {
        (
            target_width,
            scale_rounded(natural_height, target_width, natural_width),
        )
    };

    if natural_width > natural_height {
        let (width, height) = by_height();
        if width >= target_width {
            (width, height)
        } else {
            by_width()
        }
    } else {
        let (width, height) = by_width();
        if height >= target_height {
            (width, height)
        } else {
            by_height()
        }
    }
}

/// Centered `crop_width` x `crop_height` region of a `current_width` x
/// `current_height` image. Offsets round down.
///
/// A crop larger than the image is a logic error upstream and fails with
/// [`ThumbnailError::GeometryPrecondition`].
pub fn center_crop_rect(
    current_width: u32,
    current_height: u32,
    crop_width: u32,
    crop_height: u32,
) -> Result<CropRect, ThumbnailError> {
    if crop_width > current_width || crop_height > current_height {
        return Err(ThumbnailError::GeometryPrecondition {
            image_width: current_width,
            image_height: current_height,
            crop_width,
            crop_height,
        });
    }

    Ok(CropRect {
        x: (current_width - crop_width) / 2,
        y: (current_height - crop_height) / 2,
        width: crop_width,
        height: crop_height,
    })
}

/// Resize and crop decisions for turning a `natural` image into a `target` thumbnail.
pub fn plan_thumbnail(
    natural_width: u32,
    natural_height: u32,
    target_width: u32,
    target_height: u32,
) -> Result<ThumbnailPlan, ThumbnailError> {
    if target_width == 0 || target_height == 0 {
        return Err(ThumbnailError::InvalidTarget {
            width: target_width,
            height: target_height,
        });
    }

    let (resize_width, resize_height) =
        resize_dimension_for(natural_width, natural_height, target_width, target_height);
    let crop = center_crop_rect(resize_width, resize_height, target_width, target_height)?;

    Ok(ThumbnailPlan {
        resize_width,
        resize_height,
        crop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_resizes_to_target_height() {
        // 800x600 -> height 200, width round(800*200/600) = 267
        assert_eq!(resize_dimension_for(800, 600, 200, 200), (267, 200));
        assert_eq!(resize_dimension_for(1920, 1080, 320, 180), (320, 180));
        assert_eq!(resize_dimension_for(3000, 1000, 100, 100), (300, 100));
    }

    #[test]
    fn test_portrait_and_square_resize_to_target_width() {
        assert_eq!(resize_dimension_for(600, 800, 200, 200), (200, 267));
        assert_eq!(resize_dimension_for(500, 500, 200, 200), (200, 200));
        assert_eq!(resize_dimension_for(400, 600, 200, 200), (200, 300));
    }

    #[test]
    fn test_landscape_property_over_range() {
        for natural_width in (101..=2000).step_by(37) {
            for natural_height in (100..natural_width).step_by(53) {
                let (w, h) = resize_dimension_for(natural_width, natural_height, 150, 150);
                assert_eq!(h, 150);
                let expected = (natural_width as f64 * 150.0 / natural_height as f64).round();
                assert_eq!(w as f64, expected, "{}x{}", natural_width, natural_height);
            }
        }
    }

    #[test]
    fn test_portrait_property_over_range() {
        for natural_height in (100..=2000).step_by(41) {
            for natural_width in (50..=natural_height).step_by(29) {
                let (w, h) = resize_dimension_for(natural_width, natural_height, 120, 120);
                assert_eq!(w, 120);
                let expected = (natural_height as f64 * 120.0 / natural_width as f64).round();
                assert_eq!(h as f64, expected, "{}x{}", natural_width, natural_height);
            }
        }
    }

    #[test]
    fn test_rounds_half_up() {
        // 300 * 100 / 200 = 150 exactly; 301 * 100 / 200 = 150.5 -> 151
        assert_eq!(resize_dimension_for(300, 200, 100, 100), (150, 100));
        assert_eq!(resize_dimension_for(301, 200, 100, 100), (151, 100));
    }

    #[test]
    fn test_wide_target_falls_back_to_width() {
        // Landscape, but the target is wider than the image aspect: driving by
        // height would give 267x200, too narrow for a 400 wide crop.
        assert_eq!(resize_dimension_for(800, 600, 400, 200), (400, 300));
    }

    #[test]
    fn test_tall_target_falls_back_to_height() {
        assert_eq!(resize_dimension_for(600, 800, 200, 400), (300, 400));
        assert_eq!(resize_dimension_for(100, 100, 50, 200), (200, 200));
    }

    #[test]
    fn test_result_always_covers_target() {
        let naturals = [(1, 1), (1, 5000), (5000, 1), (640, 480), (37, 911)];
        let targets = [(1, 1), (200, 200), (400, 100), (100, 400), (999, 3)];
        for (nw, nh) in naturals {
            for (tw, th) in targets {
                let (w, h) = resize_dimension_for(nw, nh, tw, th);
                assert!(w >= tw && h >= th, "{}x{} -> {}x{}", nw, nh, tw, th);
            }
        }
    }

    #[test]
    fn test_extreme_dimensions_saturate() {
        assert_eq!(scale_rounded(u32::MAX, u32::MAX, 1), u32::MAX);
        assert_eq!(scale_rounded(u32::MAX, u32::MAX, u32::MAX), u32::MAX);
        assert_eq!(
            resize_dimension_for(u32::MAX, 1, u32::MAX, u32::MAX),
            (u32::MAX, u32::MAX)
        );
        let plan = plan_thumbnail(u32::MAX, 1, u32::MAX, u32::MAX).unwrap();
        assert_eq!((plan.crop.x, plan.crop.y), (0, 0));
    }

    #[test]
    fn test_center_crop_rect() {
        let rect = center_crop_rect(267, 200, 200, 200).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 33,
                y: 0,
                width: 200,
                height: 200
            }
        );

        let rect = center_crop_rect(200, 200, 200, 200).unwrap();
        assert_eq!((rect.x, rect.y), (0, 0));
    }

    #[test]
    fn test_center_crop_rect_stays_in_bounds() {
        for current_width in [1u32, 2, 3, 10, 99, 100, 101, 1000] {
            for current_height in [1u32, 7, 64, 333] {
                for crop_width in 1..=current_width.min(12) {
                    for crop_height in 1..=current_height.min(12) {
                        let rect =
                            center_crop_rect(current_width, current_height, crop_width, crop_height)
                                .unwrap();
                        assert!(rect.x + rect.width <= current_width);
                        assert!(rect.y + rect.height <= current_height);
                    }
                }
            }
        }
    }

    #[test]
    fn test_oversized_crop_fails_fast() {
        let err = center_crop_rect(267, 200, 400, 200).unwrap_err();
        assert!(matches!(
            err,
            ThumbnailError::GeometryPrecondition {
                image_width: 267,
                crop_width: 400,
                ..
            }
        ));
        assert!(center_crop_rect(200, 100, 200, 101).is_err());
    }

    #[test]
    fn test_plan_thumbnail() {
        let plan = plan_thumbnail(800, 600, 200, 200).unwrap();
        assert_eq!((plan.resize_width, plan.resize_height), (267, 200));
        assert_eq!(plan.crop.x, 33);
        assert_eq!((plan.crop.width, plan.crop.height), (200, 200));
    }

    #[test]
    fn test_plan_rejects_zero_target() {
        assert!(matches!(
            plan_thumbnail(800, 600, 0, 200),
            Err(ThumbnailError::InvalidTarget { width: 0, .. })
        ));
    }
}
