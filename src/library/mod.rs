//! Templates and the read-only template library.
//!
//! A library is built once at startup, then shared freely: nothing mutates it
//! afterwards, so concurrent classification and quality passes need no
//! locking. Hot replacement, if ever needed, means swapping the whole library
//! reference, never editing one in place.

use crate::image::{ImageView, OwnedImage};
use crate::util::{WheelMatchError, WheelMatchResult};
use std::path::{Path, PathBuf};

#[cfg(feature = "image-io")]
use crate::trace::{trace_event, trace_span};

/// Highest recognized outcome label.
pub const MAX_LABEL: u8 = 36;

/// Number of labels a fully covered library holds.
pub const LABEL_COUNT: usize = 37;

/// One reference image bound to an outcome label.
pub struct Template {
    label: u8,
    img: OwnedImage,
    source: Option<PathBuf>,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer.
    pub fn new(label: u8, data: Vec<u8>, width: usize, height: usize) -> WheelMatchResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Self::from_image(label, img)
    }

    /// Creates a template from an already-owned grayscale image.
    pub fn from_image(label: u8, img: OwnedImage) -> WheelMatchResult<Self> {
        if label > MAX_LABEL {
            return Err(WheelMatchError::InvalidLabel { label });
        }
        Ok(Self {
            label,
            img,
            source: None,
        })
    }

    fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns the outcome label this template represents.
    pub fn label(&self) -> u8 {
        self.label
    }

    /// Returns a borrowed view of the template pixels.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns the file this template was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// A labeled template file that exists but could not be decoded.
///
/// Recorded during loading and excluded from the usable set; the pass
/// continues with reduced coverage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnreadableTemplate {
    /// Label the file was named for.
    pub label: u8,
    /// Path of the offending file.
    pub path: PathBuf,
    /// Decoder error text.
    pub reason: String,
}

/// Ordered-by-label collection of templates, read-only after construction.
///
/// Partial coverage is legal: missing labels degrade classification, they
/// never crash it.
pub struct TemplateLibrary {
    templates: Vec<Template>,
    unreadable: Vec<UnreadableTemplate>,
}

impl TemplateLibrary {
    /// Builds a library from in-memory templates, sorted ascending by label.
    ///
    /// Fails with `DuplicateLabel` if two templates claim the same label.
    pub fn from_templates(mut templates: Vec<Template>) -> WheelMatchResult<Self> {
        templates.sort_by_key(|t| t.label);
        for pair in templates.windows(2) {
            if pair[0].label == pair[1].label {
                return Err(WheelMatchError::DuplicateLabel {
                    label: pair[0].label,
                });
            }
        }
        Ok(Self {
            templates,
            unreadable: Vec::new(),
        })
    }

    /// Returns the template for `label`, if present.
    pub fn get(&self, label: u8) -> Option<&Template> {
        self.templates
            .binary_search_by_key(&label, |t| t.label)
            .ok()
            .map(|idx| &self.templates[idx])
    }

    /// Returns all templates in ascending label order.
    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    /// Returns `(present, expected)` label counts.
    pub fn coverage(&self) -> (usize, usize) {
        (self.templates.len(), LABEL_COUNT)
    }

    /// Returns expected labels with no usable template, ascending.
    pub fn missing_labels(&self) -> Vec<u8> {
        (0..=MAX_LABEL)
            .filter(|label| self.get(*label).is_none())
            .collect()
    }

    /// Returns template files that existed but failed to decode.
    pub fn unreadable(&self) -> &[UnreadableTemplate] {
        &self.unreadable
    }
}

/// Extensions tried, in order, for each expected label.
#[cfg(feature = "image-io")]
const TEMPLATE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

#[cfg(feature = "image-io")]
impl TemplateLibrary {
    /// Loads a library from a directory of files named `number_<label>.<ext>`.
    ///
    /// One file per expected label 0..=36. A missing file leaves that label
    /// absent; a file that fails to decode is recorded as unreadable and
    /// excluded. Only an inaccessible directory is fatal. Color images are
    /// converted to grayscale.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> WheelMatchResult<Self> {
        let dir = dir.as_ref();
        let _guard = trace_span!("library_load").entered();
        if !dir.is_dir() {
            return Err(WheelMatchError::ImageIo {
                reason: format!("template directory not found: {}", dir.display()),
            });
        }

        let mut templates = Vec::with_capacity(LABEL_COUNT);
        let mut unreadable = Vec::new();
        for label in 0..=MAX_LABEL {
            let Some(path) = template_file(dir, label) else {
                trace_event!("template_missing", label = label);
                continue;
            };
            match image::open(&path) {
                Ok(img) => {
                    let owned = crate::image::io::owned_from_dynamic_image(&img)?;
                    templates.push(Template::from_image(label, owned)?.with_source(path));
                }
                Err(err) => {
                    trace_event!("template_unreadable", label = label);
                    unreadable.push(UnreadableTemplate {
                        label,
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        trace_event!(
            "library_loaded",
            present = templates.len(),
            unreadable = unreadable.len(),
        );
        let mut library = Self::from_templates(templates)?;
        library.unreadable = unreadable;
        Ok(library)
    }
}

#[cfg(feature = "image-io")]
fn template_file(dir: &Path, label: u8) -> Option<PathBuf> {
    TEMPLATE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("number_{label}.{ext}")))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::{Template, TemplateLibrary, LABEL_COUNT, MAX_LABEL};
    use crate::util::WheelMatchError;

    fn tpl(label: u8) -> Template {
        Template::new(label, vec![label, 0, 255, label.wrapping_mul(7)], 2, 2).unwrap()
    }

    #[test]
    fn label_above_range_is_rejected() {
        let err = Template::new(37, vec![0u8; 4], 2, 2).err().unwrap();
        assert_eq!(err, WheelMatchError::InvalidLabel { label: 37 });
    }

    #[test]
    fn library_orders_by_label_and_reports_coverage() {
        let library = TemplateLibrary::from_templates(vec![tpl(9), tpl(0), tpl(36)]).unwrap();
        let labels: Vec<u8> = library.all().iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec![0, 9, 36]);
        assert_eq!(library.coverage(), (3, LABEL_COUNT));
        assert!(library.get(9).is_some());
        assert!(library.get(1).is_none());
        assert_eq!(library.missing_labels().len(), LABEL_COUNT - 3);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = TemplateLibrary::from_templates(vec![tpl(4), tpl(4)])
            .err()
            .unwrap();
        assert_eq!(err, WheelMatchError::DuplicateLabel { label: 4 });
    }

    #[test]
    fn empty_library_is_legal() {
        let library = TemplateLibrary::from_templates(Vec::new()).unwrap();
        assert_eq!(library.coverage(), (0, LABEL_COUNT));
        assert_eq!(library.missing_labels().len(), usize::from(MAX_LABEL) + 1);
    }
}
