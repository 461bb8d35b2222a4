#![cfg(feature = "image-io")]

//! Integration tests for directory-based template loading.

use image::{GrayImage, Luma, Rgb, RgbImage};
use std::fs;
use wheelmatch::{TemplateLibrary, WheelMatchError, LABEL_COUNT};

fn gray(width: u32, height: u32, seed: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let v = x
            .wrapping_mul(2654435761)
            .wrapping_add(y.wrapping_mul(40503))
            .wrapping_add(seed.wrapping_mul(2246822519));
        Luma([((v ^ (v >> 13)) & 0xFF) as u8])
    })
}

#[test]
fn loads_full_library_by_naming_convention() {
    let dir = tempfile::tempdir().unwrap();
    for label in 0u8..=36 {
        let img = gray(12, 12, label as u32);
        img.save(dir.path().join(format!("number_{label}.png")))
            .unwrap();
    }

    let library = TemplateLibrary::load_dir(dir.path()).unwrap();
    assert_eq!(library.coverage(), (LABEL_COUNT, LABEL_COUNT));
    assert!(library.missing_labels().is_empty());
    assert!(library.unreadable().is_empty());

    let tpl = library.get(17).unwrap();
    assert_eq!(tpl.label(), 17);
    assert_eq!((tpl.width(), tpl.height()), (12, 12));
    assert!(tpl.source().unwrap().ends_with("number_17.png"));
}

#[test]
fn missing_files_reduce_coverage_without_error() {
    let dir = tempfile::tempdir().unwrap();
    for label in [0u8, 1, 36] {
        gray(8, 8, label as u32)
            .save(dir.path().join(format!("number_{label}.png")))
            .unwrap();
    }

    let library = TemplateLibrary::load_dir(dir.path()).unwrap();
    assert_eq!(library.coverage(), (3, LABEL_COUNT));
    assert!(library.missing_labels().contains(&2));
    assert!(library.get(2).is_none());
    assert!(library.get(36).is_some());
}

#[test]
fn corrupt_file_is_recorded_as_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    gray(8, 8, 1)
        .save(dir.path().join("number_1.png"))
        .unwrap();
    fs::write(dir.path().join("number_3.png"), b"not a png at all").unwrap();

    let library = TemplateLibrary::load_dir(dir.path()).unwrap();
    assert_eq!(library.coverage(), (1, LABEL_COUNT));
    assert_eq!(library.unreadable().len(), 1);
    assert_eq!(library.unreadable()[0].label, 3);
    assert!(library.missing_labels().contains(&3));
}

#[test]
fn color_templates_are_converted_to_grayscale() {
    let dir = tempfile::tempdir().unwrap();
    let img = RgbImage::from_fn(10, 6, |x, y| Rgb([x as u8 * 20, y as u8 * 40, 128]));
    img.save(dir.path().join("number_0.png")).unwrap();

    let library = TemplateLibrary::load_dir(dir.path()).unwrap();
    let tpl = library.get(0).unwrap();
    assert_eq!((tpl.width(), tpl.height()), (10, 6));
}

#[test]
fn missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("no_such_dir");
    let err = TemplateLibrary::load_dir(&bogus).err().unwrap();
    assert!(matches!(err, WheelMatchError::ImageIo { .. }));
}
