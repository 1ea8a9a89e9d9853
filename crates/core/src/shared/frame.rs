use std::path::Path;

/// Bytes per RGB pixel.
pub const RGB_CHANNELS: usize = 3;

/// A bitmap frame: contiguous RGB bytes in row-major order.
///
/// Decoding happens at I/O boundaries only; the detection layer reads
/// pixels through [`Frame::pixel`].
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * RGB_CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A black frame of the given size.
    pub fn black(width: u32, height: u32) -> Self {
        Self::new(
            vec![0u8; width as usize * height as usize * RGB_CHANNELS],
            width,
            height,
        )
    }

    /// Decode an image file into an RGB frame using the `image` crate.
    pub fn open(path: &Path) -> Result<Self, image::ImageError> {
        Ok(Self::from(image::open(path)?.to_rgb8()))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the frame has no pixels to sample.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGB value at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * RGB_CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

impl From<image::RgbImage> for Frame {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.data(), &data[..]);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_black_frame_is_zeroed() {
        let frame = Frame::black(4, 3);
        assert_eq!(frame.data().len(), 36);
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_sized_frame_is_empty() {
        assert!(Frame::black(0, 10).is_empty());
        assert!(Frame::black(10, 0).is_empty());
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2);
    }

    #[test]
    fn test_pixel_access_is_row_major() {
        // 2x2 RGB: set pixel (row=1, col=0) to red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let frame = Frame::new(data, 2, 2);
        assert_eq!(frame.pixel(0, 1), [255, 0, 0]);
        assert_eq!(frame.pixel(1, 0), [0, 0, 0]);
    }

    #[test]
    fn test_data_mut_allows_modification() {
        let mut frame = Frame::black(2, 1);
        frame.data_mut()[0] = 255;
        assert_eq!(frame.pixel(0, 0), [255, 0, 0]);
    }

    #[test]
    fn test_from_rgb_image_keeps_pixels() {
        let mut img = image::RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([10, 20, 30]));
        let frame = Frame::from(img);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.pixel(2, 1), [10, 20, 30]);
    }

    #[test]
    fn test_open_reads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut img = image::RgbImage::new(5, 4);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        img.save(&path).unwrap();

        let frame = Frame::open(&path).unwrap();
        assert_eq!((frame.width(), frame.height()), (5, 4));
        assert_eq!(frame.pixel(4, 3), [50, 100, 200]);
    }

    #[test]
    fn test_open_nonexistent_returns_error() {
        assert!(Frame::open(Path::new("/nonexistent/frame.png")).is_err());
    }
}
