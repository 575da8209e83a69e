use image::{Rgb, RgbImage};

use pixmean_core::error::PixmeanError;
use pixmean_core::raster::{Dimensions, Raster, SampleDepth};
use pixmean_core::stack::accumulator::Accumulator;

fn dims(width: u32, height: u32) -> Dimensions {
    Dimensions::new(width, height)
}

#[test]
fn test_new_accumulator_is_empty() {
    let acc = Accumulator::new(dims(3, 2), SampleDepth::Eight);
    assert_eq!(acc.count(), 0);
    assert_eq!(acc.dimensions(), dims(3, 2));
    for c in 0..3 {
        assert_eq!(acc.sum(c, 2, 1), 0);
    }
}

#[test]
fn test_fold_adds_each_channel_at_its_coordinate() {
    let mut img = RgbImage::new(3, 2);
    img.put_pixel(0, 0, Rgb([1, 2, 3]));
    img.put_pixel(2, 1, Rgb([40, 50, 60]));

    let mut acc = Accumulator::new(dims(3, 2), SampleDepth::Eight);
    acc.fold(&Raster::Rgb8(img.clone())).unwrap();
    acc.fold(&Raster::Rgb8(img)).unwrap();

    assert_eq!(acc.count(), 2);
    assert_eq!(acc.sum(0, 0, 0), 2);
    assert_eq!(acc.sum(1, 0, 0), 4);
    assert_eq!(acc.sum(2, 0, 0), 6);
    assert_eq!(acc.sum(0, 2, 1), 80);
    assert_eq!(acc.sum(1, 2, 1), 100);
    assert_eq!(acc.sum(2, 2, 1), 120);
    assert_eq!(acc.sum(0, 1, 0), 0);
}

#[test]
fn test_fold_rejects_mismatched_dimensions() {
    let mut acc = Accumulator::new(dims(4, 4), SampleDepth::Eight);
    let wrong = Raster::solid(dims(4, 3), SampleDepth::Eight, [9, 9, 9]);

    let err = acc.fold(&wrong).unwrap_err();
    assert!(matches!(
        err,
        PixmeanError::DimensionMismatch {
            expected_width: 4,
            expected_height: 4,
            actual_width: 4,
            actual_height: 3,
        }
    ));
    assert_eq!(acc.count(), 0);
    assert_eq!(acc.sum(0, 0, 0), 0);
}

#[test]
fn test_fold_rescales_eight_bit_into_sixteen_bit_sums() {
    let mut acc = Accumulator::new(dims(1, 1), SampleDepth::Sixteen);
    acc.fold(&Raster::solid(dims(1, 1), SampleDepth::Eight, [255, 1, 0]))
        .unwrap();
    assert_eq!(acc.sum(0, 0, 0), 65535);
    assert_eq!(acc.sum(1, 0, 0), 257);
    assert_eq!(acc.sum(2, 0, 0), 0);
}

#[test]
fn test_fold_rescales_sixteen_bit_into_eight_bit_sums() {
    let mut acc = Accumulator::new(dims(1, 1), SampleDepth::Eight);
    acc.fold(&Raster::solid(dims(1, 1), SampleDepth::Sixteen, [65535, 514, 256]))
        .unwrap();
    assert_eq!(acc.sum(0, 0, 0), 255);
    assert_eq!(acc.sum(1, 0, 0), 2);
    assert_eq!(acc.sum(2, 0, 0), 0);
}

#[test]
fn test_merge_adds_sums_and_counts() {
    let mut a = Accumulator::new(dims(2, 2), SampleDepth::Eight);
    let mut b = Accumulator::new(dims(2, 2), SampleDepth::Eight);
    a.fold(&Raster::solid(dims(2, 2), SampleDepth::Eight, [10, 20, 30]))
        .unwrap();
    b.fold(&Raster::solid(dims(2, 2), SampleDepth::Eight, [1, 2, 3]))
        .unwrap();
    b.fold(&Raster::solid(dims(2, 2), SampleDepth::Eight, [1, 2, 3]))
        .unwrap();

    a.merge(&b).unwrap();
    assert_eq!(a.count(), 3);
    assert_eq!(a.sum(0, 1, 1), 12);
    assert_eq!(a.sum(1, 1, 1), 24);
    assert_eq!(a.sum(2, 1, 1), 36);
    // The merged-in partial is left as it was.
    assert_eq!(b.count(), 2);
}

#[test]
fn test_merge_rejects_other_dimensions_and_depth() {
    let mut a = Accumulator::new(dims(2, 2), SampleDepth::Eight);
    let other_dims = Accumulator::new(dims(2, 1), SampleDepth::Eight);
    let other_depth = Accumulator::new(dims(2, 2), SampleDepth::Sixteen);

    assert!(matches!(
        a.merge(&other_dims),
        Err(PixmeanError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        a.merge(&other_depth),
        Err(PixmeanError::DepthMismatch { .. })
    ));
}

#[test]
fn test_into_raster_floor_divides() {
    let mut acc = Accumulator::new(dims(1, 1), SampleDepth::Eight);
    acc.fold(&Raster::solid(dims(1, 1), SampleDepth::Eight, [100, 1, 255]))
        .unwrap();
    acc.fold(&Raster::solid(dims(1, 1), SampleDepth::Eight, [0, 2, 254]))
        .unwrap();

    let raster = acc.into_raster().unwrap();
    // (100+0)/2 = 50, (1+2)/2 = 1, (255+254)/2 = 254
    assert_eq!(raster.pixel(0, 0), [50, 1, 254]);
    assert_eq!(raster.depth(), SampleDepth::Eight);
}

#[test]
fn test_into_raster_empty_is_error() {
    let acc = Accumulator::new(dims(2, 2), SampleDepth::Eight);
    assert!(matches!(acc.into_raster(), Err(PixmeanError::EmptyResult)));
}

#[test]
fn test_into_raster_sixteen_bit_keeps_full_range() {
    let mut acc = Accumulator::new(dims(2, 1), SampleDepth::Sixteen);
    for _ in 0..3 {
        acc.fold(&Raster::solid(dims(2, 1), SampleDepth::Sixteen, [65535, 1000, 7]))
            .unwrap();
    }
    let raster = acc.into_raster().unwrap();
    assert_eq!(raster.depth(), SampleDepth::Sixteen);
    assert_eq!(raster.pixel(1, 0), [65535, 1000, 7]);
}

#[test]
fn test_into_raster_large_image_matches_per_pixel_mean() {
    // 300x300 crosses the row-parallel threshold.
    let (w, h) = (300, 300);
    let a = RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 10]));
    let b = RgbImage::from_fn(w, h, |x, y| Rgb([(y % 256) as u8, (x % 256) as u8, 21]));

    let mut acc = Accumulator::new(dims(w, h), SampleDepth::Eight);
    acc.fold(&Raster::Rgb8(a.clone())).unwrap();
    acc.fold(&Raster::Rgb8(b.clone())).unwrap();
    let raster = acc.into_raster().unwrap();

    for &(x, y) in &[(0, 0), (17, 299), (299, 5), (150, 150)] {
        let pa = a.get_pixel(x, y).0;
        let pb = b.get_pixel(x, y).0;
        let expected: [u16; 3] =
            std::array::from_fn(|c| (u16::from(pa[c]) + u16::from(pb[c])) / 2);
        assert_eq!(raster.pixel(x, y), expected, "pixel ({x}, {y})");
    }
}
