//! Validation of the basic pixel-buffer and template types.

use wheelmatch::{ImageView, OwnedImage, Template, WheelMatchError};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        WheelMatchError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        WheelMatchError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        WheelMatchError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, WheelMatchError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn strided_view_exposes_rows_and_pixels() {
    let data: Vec<u8> = (0u8..12).collect();
    // 3x2 image inside rows of stride 6.
    let view = ImageView::new(&data, 3, 2, 6).unwrap();
    assert_eq!(view.row(0).unwrap(), &[0u8, 1, 2]);
    assert_eq!(view.row(1).unwrap(), &[6u8, 7, 8]);
    assert_eq!(view.get(2, 1).copied(), Some(8));
    assert!(view.get(3, 0).is_none());
    assert!(view.row(2).is_none());
}

#[test]
fn owned_image_requires_exact_buffer_length() {
    let err = OwnedImage::new(vec![0u8; 5], 2, 2).err().unwrap();
    assert_eq!(err, WheelMatchError::InvalidDimensions { width: 2, height: 2 });

    let err = OwnedImage::new(vec![0u8; 3], 2, 2).err().unwrap();
    assert_eq!(err, WheelMatchError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn owned_image_from_strided_view_is_contiguous() {
    let data: Vec<u8> = (0u8..12).collect();
    let view = ImageView::new(&data, 3, 2, 6).unwrap();
    let owned = OwnedImage::from_view(view).unwrap();
    assert_eq!(owned.data(), &[0u8, 1, 2, 6, 7, 8]);
    assert_eq!((owned.width(), owned.height()), (3, 2));
    assert_eq!(owned.view().stride(), 3);
}

#[test]
fn template_keeps_label_and_dimensions() {
    let template = Template::new(36, vec![1u8, 2, 3, 4, 5, 6], 3, 2).unwrap();
    assert_eq!(template.label(), 36);
    assert_eq!((template.width(), template.height()), (3, 2));
    assert_eq!(template.source(), None);
}

#[test]
fn template_rejects_out_of_range_label() {
    let err = Template::new(200, vec![0u8; 4], 2, 2).err().unwrap();
    assert_eq!(err, WheelMatchError::InvalidLabel { label: 200 });
}
