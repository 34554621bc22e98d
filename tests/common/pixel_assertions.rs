use image::RgbaImage;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Asserts every pixel in `[x0, x1) x [y0, y1)` has exactly `expected`.
pub fn assert_region(img: &RgbaImage, (x0, y0, x1, y1): (u32, u32, u32, u32), expected: [u8; 4]) {
    for y in y0..y1 {
        for x in x0..x1 {
            let got = img.get_pixel(x, y).0;
            assert_eq!(got, expected, "pixel ({}, {})", x, y);
        }
    }
}

/// Asserts the pixel is the fixture's mid-gray, allowing for rounding.
pub fn assert_mid_gray(img: &RgbaImage, x: u32, y: u32) {
    let got = img.get_pixel(x, y).0;
    assert!(
        got[..3].iter().all(|c| c.abs_diff(128) <= 1) && got[3] == 255,
        "pixel ({}, {}) is {:?}",
        x,
        y,
        got
    );
}

/// Asserts two renders are identical pixel for pixel.
pub fn assert_same_render(actual: &RgbaImage, expected: &RgbaImage) {
    assert_eq!(actual.dimensions(), expected.dimensions());
    let differing = actual
        .pixels()
        .zip(expected.pixels())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(differing, 0, "{} pixels differ", differing);
}

/// Asserts two renders match everywhere outside `[x0, x1) x [y0, y1)`.
pub fn assert_same_outside(
    actual: &RgbaImage,
    expected: &RgbaImage,
    (x0, y0, x1, y1): (u32, u32, u32, u32),
) {
    assert_eq!(actual.dimensions(), expected.dimensions());
    let differing: Vec<(u32, u32)> = actual
        .enumerate_pixels()
        .filter(|&(x, y, _)| !(x0..x1).contains(&x) || !(y0..y1).contains(&y))
        .filter(|&(x, y, pixel)| pixel != expected.get_pixel(x, y))
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(
        differing.is_empty(),
        "{} pixels differ outside the mask, first at {:?}",
        differing.len(),
        differing.first()
    );
}
