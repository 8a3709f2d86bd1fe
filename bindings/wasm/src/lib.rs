//! WebAssembly binding for the facecrop core.
//!
//! Exposes the coordinate mapper, crop-box policy, and export renderer to
//! JavaScript. The browser keeps owning the file input, the crop widget,
//! and the download link; this module only answers the geometry and
//! rasterization questions.

use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// A rectangle as exchanged with JavaScript, in either coordinate space.
#[derive(Deserialize, Clone, Copy)]
pub struct JsRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<JsRect> for facecrop::Rect {
    fn from(r: JsRect) -> Self {
        facecrop::Rect::new(r.x, r.y, r.width, r.height)
    }
}

/// Options controlling crop-box selection, passed as a JavaScript object.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectOptions {
    pub aspect: Option<String>,
    pub strategy: Option<String>,
    pub pad_factor: Option<f64>,
}

fn string_to_aspect(aspect: &str) -> Result<facecrop::AspectRatio, JsValue> {
    match aspect {
        "1:1" | "square" => Ok(facecrop::AspectRatio::Square),
        "4:5" | "portrait" => Ok(facecrop::AspectRatio::Portrait),
        "16:9" | "widescreen" => Ok(facecrop::AspectRatio::Widescreen),
        _ => Err(make_error(
            "INVALID_OPTIONS",
            &format!("unknown aspect ratio: {aspect}"),
        )),
    }
}

fn string_to_mask(mask: &str) -> Result<facecrop::MaskMode, JsValue> {
    match mask {
        "none" => Ok(facecrop::MaskMode::None),
        "circle" => Ok(facecrop::MaskMode::Circle),
        _ => Err(make_error(
            "INVALID_OPTIONS",
            &format!("unknown mask mode: {mask}"),
        )),
    }
}

fn resolve_strategy(opts: &SelectOptions) -> Result<facecrop::CropStrategy, JsValue> {
    let pad_factor = opts.pad_factor.unwrap_or(facecrop::DEFAULT_PAD_FACTOR);
    match opts.strategy.as_deref() {
        None | Some("padded") => Ok(facecrop::CropStrategy::PaddedCentered { pad_factor }),
        Some("tight") => Ok(facecrop::CropStrategy::Tight),
        Some(other) => Err(make_error(
            "INVALID_OPTIONS",
            &format!("unknown strategy: {other}"),
        )),
    }
}

/// Create a JS `Error` with a machine-readable `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Convert a `FaceCropError` into a JS `Error` with a `code` property and a
/// `retryable` flag.
fn to_js_error(e: facecrop::FaceCropError) -> JsValue {
    use facecrop::FaceCropError as E;
    let code = match &e {
        E::InvalidDimension { .. } => "INVALID_DIMENSION",
        E::ModelNotReady => "MODEL_NOT_READY",
        E::LayoutNotReady => "LAYOUT_NOT_READY",
        E::EmptyCrop => "EMPTY_CROP",
        E::Decode(_) => "DECODE_ERROR",
        E::Encode(_) => "ENCODE_ERROR",
        E::ModelLoad(_) => "MODEL_LOAD_ERROR",
    };
    let err = make_error(code, &e.to_string());
    let _ = js_sys::Reflect::set(&err, &"retryable".into(), &JsValue::from(e.is_retryable()));
    err
}

fn rect_to_object(rect: facecrop::Rect) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"x".into(), &JsValue::from(rect.x))?;
    js_sys::Reflect::set(&obj, &"y".into(), &JsValue::from(rect.y))?;
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(rect.width))?;
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(rect.height))?;
    Ok(JsValue::from(obj))
}

fn parse_detections(detections: JsValue) -> Result<Vec<facecrop::FaceBounds>, JsValue> {
    if detections.is_undefined() || detections.is_null() {
        return Ok(Vec::new());
    }
    let rects: Vec<JsRect> = serde_wasm_bindgen::from_value(detections)
        .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid detections: {e}")))?;
    Ok(rects
        .into_iter()
        .map(|r| facecrop::FaceBounds {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
            confidence: 0.0,
        })
        .collect())
}

/// Map a source-space rectangle into display space.
///
/// @param rect - `{x, y, width, height}` in source pixels
/// @param sourceWidth/sourceHeight - natural image dimensions
/// @param displayWidth/displayHeight - rendered widget dimensions
#[wasm_bindgen(js_name = "mapToDisplay")]
pub fn map_to_display(
    rect: JsValue,
    source_width: u32,
    source_height: u32,
    display_width: u32,
    display_height: u32,
) -> Result<JsValue, JsValue> {
    let rect: JsRect = serde_wasm_bindgen::from_value(rect)
        .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid rect: {e}")))?;
    let mapped = facecrop::map_to_display(
        rect.into(),
        facecrop::Size::new(source_width, source_height),
        facecrop::Size::new(display_width, display_height),
    )
    .map_err(to_js_error)?;
    rect_to_object(mapped)
}

/// Decide the crop box, in source space, for a detection result.
///
/// @param detections - array of `{x, y, width, height}` boxes (ordered by
///   confidence), or null for the centered fallback
/// @param options - optional object: `{aspect, strategy, padFactor}`
#[wasm_bindgen(js_name = "selectCropBox")]
pub fn select_crop_box(
    detections: JsValue,
    source_width: u32,
    source_height: u32,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let opts: SelectOptions = if options.is_undefined() || options.is_null() {
        SelectOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))?
    };

    let aspect = match opts.aspect.as_deref() {
        Some(a) => string_to_aspect(a)?,
        None => facecrop::AspectRatio::default(),
    };
    let strategy = resolve_strategy(&opts)?;

    // The binding treats the array order as the ranking; give the first box
    // the top confidence so the core's highest-confidence pick honors it.
    let mut faces = parse_detections(detections)?;
    for (rank, face) in faces.iter_mut().enumerate() {
        face.confidence = -(rank as f64);
    }

    let selected = facecrop::select_crop_box(
        &faces,
        facecrop::Size::new(source_width, source_height),
        aspect,
        strategy,
    )
    .map_err(to_js_error)?;
    rect_to_object(selected)
}

/// Render the cropped region to a PNG at the fixed target size.
///
/// @param rgba - RGBA8 pixel buffer of the cropped canvas
/// @param width/height - dimensions of that buffer
/// @param aspect - `"1:1" | "4:5" | "16:9"`
/// @param mask - `"none" | "circle"`
///
/// Returns `{data: Uint8Array, width, height, filename}`.
#[wasm_bindgen(js_name = "renderExport")]
pub fn render_export(
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    aspect: &str,
    mask: &str,
) -> Result<JsValue, JsValue> {
    let aspect = string_to_aspect(aspect)?;
    let mask = string_to_mask(mask)?;

    let cropped = image::RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        make_error(
            "INVALID_OPTIONS",
            "rgba buffer does not match width * height * 4",
        )
    })?;

    let exported = facecrop::render_export(&cropped, aspect, mask).map_err(to_js_error)?;

    let obj = js_sys::Object::new();
    let data = js_sys::Uint8Array::from(&exported.data[..]);
    js_sys::Reflect::set(&obj, &"data".into(), &data)?;
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(exported.width))?;
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(exported.height))?;
    js_sys::Reflect::set(
        &obj,
        &"filename".into(),
        &JsValue::from_str(exported.filename),
    )?;
    Ok(JsValue::from(obj))
}
