use tictrack_core::{
    adaptive_threshold_mean, box_blur_rgb, mirror_horizontal, rgb_to_gray, GrayImage, RgbImage,
};

/// Per-frame preprocessing output. The mirrored color frame is kept alongside
/// the binary image because both are rectified with the same transform later.
pub struct PreprocessedFrame {
    /// Horizontally mirrored color frame; overlay marks are drawn onto this.
    pub color: RgbImage,
    /// Grayscale of the blurred color frame.
    pub gray: GrayImage,
    /// Adaptively thresholded binary image used for all contour work.
    pub binary: GrayImage,
}

/// Mirror, blur, grayscale and adaptively threshold a raw camera frame.
/// Always succeeds given a non-empty frame.
pub fn preprocess(
    frame: &RgbImage,
    blur_kernel: usize,
    threshold_window: usize,
    threshold_offset: i32,
) -> PreprocessedFrame {
    let mut color = frame.clone();
    mirror_horizontal(&mut color);

    let blurred = box_blur_rgb(&color, blur_kernel);
    let gray = rgb_to_gray(&blurred);
    let binary = adaptive_threshold_mean(&gray.view(), threshold_window, threshold_offset);

    PreprocessedFrame {
        color,
        gray,
        binary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_binary_image_of_frame_size() {
        let mut frame = RgbImage::new(32, 24);
        for (i, v) in frame.data.iter_mut().enumerate() {
            *v = ((i * 7) % 251) as u8;
        }
        let pre = preprocess(&frame, 3, 11, 3);
        assert_eq!(pre.binary.width, 32);
        assert_eq!(pre.binary.height, 24);
        assert!(pre.binary.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn blur_runs_before_grayscale_conversion() {
        let mut frame = RgbImage::new(8, 8);
        for (i, v) in frame.data.iter_mut().enumerate() {
            *v = ((i * 13) % 256) as u8;
        }
        let pre = preprocess(&frame, 3, 5, 3);

        let mut mirrored = frame.clone();
        mirror_horizontal(&mut mirrored);
        let expected = rgb_to_gray(&box_blur_rgb(&mirrored, 3));
        assert_eq!(pre.gray.data, expected.data);
    }

    #[test]
    fn color_output_is_mirrored() {
        let mut frame = RgbImage::new(4, 1);
        frame.set_pixel(0, 0, [255, 0, 0]);
        let pre = preprocess(&frame, 3, 5, 3);
        assert_eq!(pre.color.pixel(3, 0), [255, 0, 0]);
    }
}
