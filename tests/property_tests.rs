use image::{DynamicImage, GenericImageView};
use img_shrink::{is_image_file, resize_image, scaled_dimensions, OptimizeOptions};
use proptest::prelude::*;
use std::path::Path;

proptest! {
    #[test]
    fn options_quality_in_range(quality in 1u8..=100u8) {
        let options = OptimizeOptions::new(None, None, Some(quality));
        prop_assert!(options.is_ok());
    }

    #[test]
    fn options_invalid_quality(quality in 0u8..=255u8) {
        let result = OptimizeOptions::new(None, None, Some(quality));
        if quality == 0 || quality > 100 {
            prop_assert!(result.is_err());
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn scaled_dimensions_fit_and_keep_aspect(
        width in 1u32..=20_000u32,
        height in 1u32..=20_000u32,
        max_dimension in 1u32..=4000u32
    ) {
        match scaled_dimensions(width, height, max_dimension) {
            None => {
                prop_assert!(width <= max_dimension && height <= max_dimension);
            }
            Some((new_w, new_h)) => {
                prop_assert!(width > max_dimension || height > max_dimension);
                prop_assert!(new_w >= 1 && new_h >= 1);
                prop_assert!(new_w <= max_dimension && new_h <= max_dimension);
                prop_assert_eq!(new_w.max(new_h), max_dimension);

                // the short side is the exact truncation of side * max / longest
                let longest = u64::from(width.max(height));
                let expected = |side: u32| {
                    ((u64::from(side) * u64::from(max_dimension)) / longest).max(1) as u32
                };
                prop_assert_eq!((new_w, new_h), (expected(width), expected(height)));
            }
        }
    }

    #[test]
    fn scaled_dimensions_are_stable(
        width in 1u32..=20_000u32,
        height in 1u32..=20_000u32,
        max_dimension in 1u32..=4000u32
    ) {
        if let Some((new_w, new_h)) = scaled_dimensions(width, height, max_dimension) {
            prop_assert_eq!(scaled_dimensions(new_w, new_h, max_dimension), None);
        }
    }

    #[test]
    fn resize_image_hits_target(
        width in 20u32..=300u32,
        height in 20u32..=300u32,
        max_dimension in 10u32..=100u32
    ) {
        let img = DynamicImage::new_rgb8(width, height);
        if let Some((new_w, new_h)) = scaled_dimensions(width, height, max_dimension) {
            let resized = resize_image(&img, new_w, new_h);
            prop_assert_eq!(resized.dimensions(), (new_w, new_h));
        }
    }

    #[test]
    fn is_image_file_recognizes_extensions(
        extension in prop::sample::select(&["jpg", "JPG", "jpeg", "png", "PNG", "webp", "bmp", "gif", "tiff", "txt"])
    ) {
        let filename = format!("test.{}", extension);
        let expected = matches!(extension.to_lowercase().as_str(), "jpg" | "jpeg" | "png" | "webp");
        prop_assert_eq!(is_image_file(Path::new(&filename)), expected);
    }
}
