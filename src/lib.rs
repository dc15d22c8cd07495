use image::RgbImage;
use rusttype::Font;
use tracing::{info, instrument};

use std::path::Path;

use error::{PlateError, PlateErrorKind};

pub mod config;
pub mod detector;
pub mod error;
pub mod navigation;
pub mod processor;
pub mod region;
pub mod render;
pub mod selector;
pub mod text;
pub mod utils;

pub use config::HarnessConfig;
pub use detector::{CommandDetector, SidecarDetector, TextDetector};
pub use navigation::Navigator;
pub use processor::{process, Annotation, Classification, ImageResult, Tag};
pub use selector::select_best;

/// Runs plate classification for single image files.
pub struct PlateTester<D> {
    detector: D,
    config: HarnessConfig,
    font: Option<Font<'static>>,
}

impl<D: TextDetector> PlateTester<D> {
    pub fn new(detector: D, config: HarnessConfig) -> Self {
        Self { detector, config, font: None }
    }

    /// Font used to write the best guess onto annotated images.
    pub fn with_font(mut self, font: Font<'static>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Asks the detector about one image and classifies what it found.
    #[instrument(skip(self), fields(image = %path.display()))]
    pub fn process_file(&self, path: &Path) -> Result<ImageResult, PlateError> {
        if !path.is_file() {
            return Err(PlateErrorKind::MissingImage(path.to_path_buf()).into());
        }
        let annotations = self.detector.detect_text(path)?;
        let result = process(&annotations, &self.config);
        info!(
            regions = result.classifications.len(),
            best_guess = %result.best_guess,
            "processed image"
        );
        Ok(result)
    }

    /// Like `process_file`, and also returns the image with every region outlined.
    pub fn annotate_file(&self, path: &Path) -> Result<(ImageResult, RgbImage), PlateError> {
        let result = self.process_file(path)?;
        let img = self.render(path, &result)?;
        Ok((result, img))
    }

    /// Decodes the image and draws an already computed result onto it.
    pub fn render(&self, path: &Path, result: &ImageResult) -> Result<RgbImage, PlateError> {
        let mut img = image::open(path)?.to_rgb8();
        render::draw_regions(&mut img, &result.classifications, &self.config);
        if let Some(font) = &self.font {
            render::draw_label(&mut img, font, &result.best_guess, &self.config);
        }
        Ok(img)
    }
}

#[cfg(test)]
mod test {
    use super::{Annotation, HarnessConfig, PlateTester, TextDetector};
    use crate::error::{PlateError, PlateErrorKind};
    use crate::region::BoundingPoly;

    use image::{Rgb, RgbImage};

    use std::error::Error;
    use std::path::Path;

    struct Fixed(Vec<Annotation>);

    impl TextDetector for Fixed {
        fn detect_text(&self, _image: &Path) -> Result<Vec<Annotation>, PlateError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let tester = PlateTester::new(Fixed(Vec::new()), HarnessConfig::default());
        let err = tester.process_file(Path::new("/no/such/car.jpg")).unwrap_err();
        assert!(matches!(err.kind(), PlateErrorKind::MissingImage(_)));
    }

    #[test]
    fn annotate_draws_on_a_copy() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("car.png");
        RgbImage::new(120, 60).save(&path)?;

        let detector = Fixed(vec![Annotation::new(
            "7ABC123",
            Some(BoundingPoly::from_rect(10, 10, 100, 40)),
        )]);
        let tester = PlateTester::new(detector, HarnessConfig::default());
        let (result, img) = tester.annotate_file(&path)?;
        assert_eq!(result.best_guess, "7ABC123");
        assert_eq!(img.get_pixel(10, 10), &Rgb([255, 0, 0]));
        assert_eq!(image::open(&path)?.to_rgb8().get_pixel(10, 10), &Rgb([0, 0, 0]));
        Ok(())
    }
}
