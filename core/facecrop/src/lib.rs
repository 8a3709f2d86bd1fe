//! Face-aligned crop geometry and export.
//!
//! The non-GUI core of an image cropping front-end: map a detected face
//! bounding box from source-image pixels into a crop widget's display
//! space, decide the crop box to apply (face-anchored or centered
//! fallback), and rasterize the selection into a fixed-size PNG, optionally
//! masked to a circle. Face detection and the interactive widget stay
//! behind traits ([`FaceDetector`], [`CropWidget`]).
//!
//! # Example
//!
//! ```no_run
//! use facecrop::{CropSession, FaceModel, ImageWidget, MaskMode, Size};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let mut widget = ImageWidget::from_bytes(&bytes, Size::new(400, 300)).unwrap();
//! widget.finish_layout();
//!
//! let model = FaceModel::unloaded(); // load a detector backend here
//! let mut session = CropSession::new(widget);
//! session.load_image(session.widget().natural_size()).unwrap();
//! session.align_crop_box().unwrap(); // centered fallback without detections
//! let exported = session.export(MaskMode::None).unwrap();
//! std::fs::write(exported.filename, &exported.data).unwrap();
//! # let _ = model;
//! ```
#![warn(missing_docs)]

mod error;
mod export;
/// Face detection traits and data types.
pub mod face_detector;
/// Rectangles, sizes, and source/display space mapping.
pub mod geometry;
mod policy;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
/// The crop widget capability and an in-memory reference implementation.
pub mod widget;

use image::RgbaImage;
use log::{debug, warn};

/// Error type returned by facecrop operations.
pub use error::FaceCropError;
/// Fixed-target PNG export with optional circular masking.
pub use export::render_export;
/// Face detection trait and face bounding-box type.
pub use face_detector::{best_face, FaceBounds, FaceDetector};
/// Geometry primitives and coordinate-space mapping.
pub use geometry::{map_to_display, map_to_source, Rect, Size};
/// Crop-box selection.
pub use policy::{centered_default, select_crop_box};
#[cfg(feature = "rustface")]
/// Built-in detector backed by a SeetaFace model.
pub use rustface_backend::RustfaceDetector;
/// Crop widget capability and reference implementation.
pub use widget::{CropWidget, ImageLayout, ImageWidget};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output aspect ratios supported by the exporter, each with a fixed target
/// raster size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AspectRatio {
    /// 1:1, exported at 300×300.
    #[default]
    Square,
    /// 4:5, exported at 300×375.
    Portrait,
    /// 16:9, exported at 400×225.
    Widescreen,
}

impl AspectRatio {
    /// Fixed output raster size for this ratio.
    pub fn target_size(self) -> Size {
        match self {
            AspectRatio::Square => Size::new(300, 300),
            AspectRatio::Portrait => Size::new(300, 375),
            AspectRatio::Widescreen => Size::new(400, 225),
        }
    }

    /// The nominal width/height ratio.
    pub fn ratio(self) -> f64 {
        match self {
            AspectRatio::Square => 1.0,
            AspectRatio::Portrait => 4.0 / 5.0,
            AspectRatio::Widescreen => 16.0 / 9.0,
        }
    }
}

/// Default padding multiplier for [`CropStrategy::PaddedCentered`].
pub const DEFAULT_PAD_FACTOR: f64 = 2.0;

/// How the crop box is derived from a detected face.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CropStrategy {
    /// Use the face bounding box unmodified.
    Tight,
    /// Expand the face box by `pad_factor` on both axes, centered on the
    /// face center and clamped into the source image.
    PaddedCentered {
        /// Multiplier applied to the face box dimensions.
        pad_factor: f64,
    },
}

impl Default for CropStrategy {
    fn default() -> Self {
        CropStrategy::PaddedCentered {
            pad_factor: DEFAULT_PAD_FACTOR,
        }
    }
}

/// Masking applied to the exported raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaskMode {
    /// Rectangular export at the aspect ratio's target size.
    #[default]
    None,
    /// Square export with the corners outside the inscribed circle made
    /// transparent.
    Circle,
}

impl MaskMode {
    /// Download filename the original component used for this mode.
    pub fn filename(self) -> &'static str {
        match self {
            MaskMode::None => "cropped-face.png",
            MaskMode::Circle => "circular-cropped-image.png",
        }
    }
}

/// Terminal artifact of an export: encoded PNG plus its metadata.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    /// PNG-encoded bytes.
    pub data: Vec<u8>,
    /// Width of the exported raster in pixels.
    pub width: u32,
    /// Height of the exported raster in pixels.
    pub height: u32,
    /// Suggested download filename.
    pub filename: &'static str,
}

/// Face detection model handle with an explicit loading lifecycle.
///
/// The detector backend loads asynchronously in the environments this crate
/// targets; a `FaceModel` starts unloaded and becomes ready once
/// [`finish_loading`](Self::finish_loading) hands it a backend. Detection
/// before that point fails with the retryable
/// [`FaceCropError::ModelNotReady`].
pub struct FaceModel {
    detector: Option<Box<dyn FaceDetector>>,
}

impl FaceModel {
    /// A model whose backend has not arrived yet.
    pub fn unloaded() -> Self {
        Self { detector: None }
    }

    /// A model that is ready immediately.
    pub fn loaded(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector: Some(detector),
        }
    }

    /// Complete loading with the given backend.
    pub fn finish_loading(&mut self, detector: Box<dyn FaceDetector>) {
        self.detector = Some(detector);
    }

    /// Whether detection requests can be served.
    pub fn is_ready(&self) -> bool {
        self.detector.is_some()
    }

    /// Run detection over an image. The image is converted to grayscale for
    /// the backend; results are in source-space pixels.
    pub fn detect(&self, image: &RgbaImage) -> Result<Vec<FaceBounds>, FaceCropError> {
        let detector = self.detector.as_deref().ok_or(FaceCropError::ModelNotReady)?;
        let gray = image::imageops::grayscale(image);
        Ok(detector.detect(gray.as_raw(), gray.width(), gray.height()))
    }
}

/// Orchestrates one upload → detect → align → export cycle over a crop
/// widget.
///
/// Everything runs on the caller's thread. A new
/// [`load_image`](Self::load_image) fully supersedes the previous image,
/// detections, and crop selection: last write wins, nothing is merged.
pub struct CropSession<W: CropWidget> {
    widget: W,
    aspect: AspectRatio,
    strategy: CropStrategy,
    source: Option<Size>,
    detections: Vec<FaceBounds>,
}

impl<W: CropWidget> CropSession<W> {
    /// Create a session with the default aspect ratio (1:1) and strategy
    /// (padded-centered).
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            aspect: AspectRatio::default(),
            strategy: CropStrategy::default(),
            source: None,
            detections: Vec::new(),
        }
    }

    /// Borrow the widget handle.
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Mutably borrow the widget handle, e.g. for manual crop adjustment.
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// Currently selected aspect ratio.
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect
    }

    /// Set the crop strategy used by subsequent alignments.
    pub fn set_strategy(&mut self, strategy: CropStrategy) {
        self.strategy = strategy;
    }

    /// Begin a new upload cycle for an image of the given natural size.
    ///
    /// Discards the previous detection result; the widget's crop selection
    /// is replaced on the next [`align_crop_box`](Self::align_crop_box).
    pub fn load_image(&mut self, natural: Size) -> Result<(), FaceCropError> {
        natural.ensure_nonzero()?;
        debug!("new image loaded: {}x{}", natural.width, natural.height);
        self.source = Some(natural);
        self.detections.clear();
        Ok(())
    }

    /// Run face detection for the current image and store the result.
    ///
    /// Returns the number of faces found. Fails with the retryable
    /// [`FaceCropError::ModelNotReady`] while the model is still loading.
    pub fn detect(
        &mut self,
        model: &FaceModel,
        image: &RgbaImage,
    ) -> Result<usize, FaceCropError> {
        let natural = Size::new(image.width(), image.height());
        if self.source != Some(natural) {
            self.load_image(natural)?;
        }
        self.detections = model.detect(image)?;
        debug!("detection finished: {} face(s)", self.detections.len());
        Ok(self.detections.len())
    }

    /// Detections recorded for the current image.
    pub fn detections(&self) -> &[FaceBounds] {
        &self.detections
    }

    /// Compute the crop box for the current detections and apply it to the
    /// widget, returning the display-space box that was written.
    ///
    /// Requires the widget to have finished laying out the *current* image:
    /// a missing layout, or one whose natural size disagrees with the loaded
    /// image, yields the retryable [`FaceCropError::LayoutNotReady`]. This
    /// is the readiness signal that replaces the fixed delay of older
    /// implementations.
    pub fn align_crop_box(&mut self) -> Result<Rect, FaceCropError> {
        let layout = self.widget.layout().ok_or(FaceCropError::LayoutNotReady)?;
        let source = self.source.ok_or(FaceCropError::LayoutNotReady)?;
        if layout.natural != source {
            // The widget still shows the previous image.
            warn!(
                "widget layout is stale: showing {}x{}, expected {}x{}",
                layout.natural.width, layout.natural.height, source.width, source.height
            );
            return Err(FaceCropError::LayoutNotReady);
        }

        if self.detections.is_empty() {
            debug!("no face detected, falling back to centered crop");
        }
        let selected = select_crop_box(&self.detections, source, self.aspect, self.strategy)?;
        let display_box = map_to_display(selected, source, layout.display)?;
        self.widget.set_crop_box(display_box);
        Ok(display_box)
    }

    /// Switch the aspect ratio and re-align the crop box.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) -> Result<Rect, FaceCropError> {
        self.aspect = aspect;
        self.align_crop_box()
    }

    /// Rasterize the widget's current crop region into its terminal PNG
    /// form. Synchronous; performs no further suspension.
    pub fn export(&self, mask: MaskMode) -> Result<ExportedImage, FaceCropError> {
        let cropped = self.widget.cropped_image()?;
        render_export(&cropped, self.aspect, mask)
    }
}
