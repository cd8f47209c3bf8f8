/// Best-effort metadata carry between source and output containers.
///
/// Extraction and re-application failures are reported as warnings by the
/// pipeline, never as job failures.
use crate::error::{CompressionError, Result};
use crate::formats::ImageKind;
use img_parts::jpeg::{markers, Jpeg, JpegSegment};
use img_parts::{Bytes, DynImage, ImageEXIF, ImageICC};

/// APP1 namespace header that distinguishes XMP from EXIF segments.
const XMP_HEADER: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

#[derive(Debug, Clone, Default)]
pub struct MetadataBundle {
    pub exif: Option<Bytes>,
    pub xmp: Option<Bytes>,
    pub icc: Option<Bytes>,
}

impl MetadataBundle {
    pub fn is_empty(&self) -> bool {
        self.exif.is_none() && self.xmp.is_none() && self.icc.is_none()
    }
}

/// Pull EXIF, XMP and ICC data out of a source image.
///
/// BMP and TIFF are not parsed; same-format jobs keep their bytes anyway
/// and cross-format jobs have nothing portable to carry.
pub fn extract(input: &[u8], kind: ImageKind) -> Result<MetadataBundle> {
    match kind {
        ImageKind::Bmp | ImageKind::Tiff => Ok(MetadataBundle::default()),
        ImageKind::Jpeg | ImageKind::Png | ImageKind::WebP => {
            let parsed = DynImage::from_bytes(Bytes::copy_from_slice(input))
                .map_err(|e| CompressionError::Metadata(e.to_string()))?;
            let Some(image) = parsed else {
                return Ok(MetadataBundle::default());
            };
            let mut bundle = MetadataBundle {
                exif: image.exif(),
                icc: image.icc_profile(),
                xmp: None,
            };
            if let DynImage::Jpeg(jpeg) = &image {
                bundle.xmp = extract_xmp(jpeg);
            }
            Ok(bundle)
        }
    }
}

/// Re-embed a bundle into freshly encoded bytes.
///
/// An empty bundle passes the bytes through untouched. XMP is carried for
/// JPEG outputs only; the pipeline warns when it has to be dropped.
pub fn apply(compressed: &[u8], kind: ImageKind, bundle: &MetadataBundle) -> Result<Vec<u8>> {
    if bundle.is_empty() {
        return Ok(compressed.to_vec());
    }

    match kind {
        ImageKind::Bmp | ImageKind::Tiff => Err(CompressionError::Metadata(format!(
            "{kind} containers do not support embedded metadata"
        ))),
        ImageKind::Jpeg => {
            let mut jpeg = Jpeg::from_bytes(Bytes::copy_from_slice(compressed))
                .map_err(|e| CompressionError::Metadata(e.to_string()))?;
            jpeg.set_exif(bundle.exif.clone());
            jpeg.set_icc_profile(bundle.icc.clone());
            if let Some(xmp) = &bundle.xmp {
                insert_xmp(&mut jpeg, xmp.clone());
            }
            encode(DynImage::Jpeg(jpeg))
        }
        ImageKind::Png | ImageKind::WebP => {
            let parsed = DynImage::from_bytes(Bytes::copy_from_slice(compressed))
                .map_err(|e| CompressionError::Metadata(e.to_string()))?;
            let Some(mut image) = parsed else {
                return Err(CompressionError::Metadata(format!(
                    "encoded {kind} output was not recognized as a metadata container"
                )));
            };
            image.set_exif(bundle.exif.clone());
            image.set_icc_profile(bundle.icc.clone());
            encode(image)
        }
    }
}

fn encode(image: DynImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    image
        .encoder()
        .write_to(&mut out)
        .map_err(|e| CompressionError::Metadata(e.to_string()))?;
    Ok(out)
}

fn extract_xmp(jpeg: &Jpeg) -> Option<Bytes> {
    jpeg.segments()
        .iter()
        .filter(|segment| segment.marker() == markers::APP1)
        .find_map(|segment| {
            let contents = segment.contents();
            contents
                .starts_with(XMP_HEADER)
                .then(|| contents.slice(XMP_HEADER.len()..))
        })
}

fn insert_xmp(jpeg: &mut Jpeg, xmp: Bytes) {
    let mut contents = Vec::with_capacity(XMP_HEADER.len() + xmp.len());
    contents.extend_from_slice(XMP_HEADER);
    contents.extend_from_slice(&xmp);
    let segment = JpegSegment::new_with_contents(markers::APP1, Bytes::from(contents));

    // Place XMP after the leading APP0/APP1 run so JFIF and EXIF stay first.
    let position = jpeg
        .segments()
        .iter()
        .take_while(|s| matches!(s.marker(), markers::APP0 | markers::APP1))
        .count();
    jpeg.segments_mut().insert(position, segment);
}
