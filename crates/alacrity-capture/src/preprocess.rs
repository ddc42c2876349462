//! 캡처 이미지 전처리.
//!
//! fast_image_resize 기반 다운스케일. 종횡비를 유지하고 절대 확대하지 않는다.

use alacrity_core::error::CoreError;
use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbaImage;
use tracing::debug;

/// 긴 변이 `max_dimension`을 넘지 않는 목표 크기 계산.
///
/// 두 변이 모두 한도 이하이거나 한 변이 0이면 원본 크기를 그대로 반환한다.
/// 짧은 변은 같은 비율로 줄이고 반올림하며, 최소 1픽셀을 유지한다.
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_dimension && height <= max_dimension) {
        return (width, height);
    }

    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (short as f64 * max_dimension as f64 / long as f64).round() as u32;
        scaled.clamp(1, max_dimension)
    };

    if width >= height {
        (max_dimension, scale(height, width))
    } else {
        (scale(width, height), max_dimension)
    }
}

/// 긴 변 기준 다운스케일 (확대 없음)
pub fn resize_to_fit(image: RgbaImage, max_dimension: u32) -> Result<RgbaImage, CoreError> {
    let (src_w, src_h) = image.dimensions();
    let (dst_w, dst_h) = target_dimensions(src_w, src_h, max_dimension);

    if (dst_w, dst_h) == (src_w, src_h) {
        return Ok(image);
    }

    let src_image = FirImage::from_vec_u8(src_w, src_h, image.into_raw(), PixelType::U8x4)
        .map_err(|e| CoreError::Internal(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(dst_w, dst_h, PixelType::U8x4);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));

    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::Internal(format!("리사이즈 실패: {e}")))?;

    let resized = RgbaImage::from_raw(dst_w, dst_h, dst_image.into_vec())
        .ok_or_else(|| CoreError::Internal("결과 이미지 생성 실패".to_string()))?;

    debug!("캡처 리사이즈: {}x{} → {}x{}", src_w, src_h, dst_w, dst_h);

    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_image(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, image::Rgba([100, 150, 200, 255]))
    }

    #[test]
    fn landscape_scales_to_max_width() {
        let resized = resize_to_fit(make_test_image(2400, 1350), 1200).unwrap();
        assert_eq!(resized.dimensions(), (1200, 675));
    }

    #[test]
    fn portrait_scales_to_max_height() {
        let resized = resize_to_fit(make_test_image(900, 1800), 1200).unwrap();
        assert_eq!(resized.dimensions(), (600, 1200));
    }

    #[test]
    fn small_image_unchanged() {
        let resized = resize_to_fit(make_test_image(640, 480), 1200).unwrap();
        assert_eq!(resized.dimensions(), (640, 480));
    }

    #[test]
    fn exact_limit_unchanged() {
        assert_eq!(target_dimensions(1200, 1200, 1200), (1200, 1200));
        assert_eq!(target_dimensions(1200, 300, 1200), (1200, 300));
    }

    #[test]
    fn never_upscales_and_keeps_aspect_ratio() {
        let cases = [
            (1920, 1080),
            (1080, 1920),
            (3000, 7),
            (7, 3000),
            (1201, 1199),
            (5120, 2880),
            (333, 4444),
            (5000, 0),
            (0, 5000),
        ];

        for (w, h) in cases {
            let (tw, th) = target_dimensions(w, h, 1200);
            assert!(tw <= w && th <= h, "{w}x{h} → {tw}x{th} 확대됨");
            assert!(tw.max(th) <= 1200);

            if w == 0 || h == 0 {
                assert_eq!((tw, th), (w, h));
                continue;
            }

            // 짧은 변 오차 1픽셀 미만 (반올림 허용)
            if w >= h {
                let expected = h as f64 * tw as f64 / w as f64;
                assert!((th as f64 - expected).abs() < 1.0, "{w}x{h} → {tw}x{th}");
            } else {
                let expected = w as f64 * th as f64 / h as f64;
                assert!((tw as f64 - expected).abs() < 1.0, "{w}x{h} → {tw}x{th}");
            }
        }
    }

    #[test]
    fn extreme_ratio_keeps_one_pixel() {
        assert_eq!(target_dimensions(10_000, 1, 100), (100, 1));
    }

    #[test]
    fn empty_image_passes_through() {
        let resized = resize_to_fit(RgbaImage::new(0, 0), 1200).unwrap();
        assert_eq!(resized.dimensions(), (0, 0));
    }

    #[test]
    fn zero_height_frame_is_not_grown() {
        let resized = resize_to_fit(RgbaImage::new(5000, 0), 1200).unwrap();
        assert_eq!(resized.dimensions(), (5000, 0));
    }
}
