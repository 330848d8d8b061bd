use blurry_bitmap::{apply, blur, BlurConfig, BlurMode, Parallelism, PixelBuffer};
use rand::{rngs::SmallRng, Rng, SeedableRng};

const MODES: [BlurMode; 2] = [BlurMode::Exact, BlurMode::Fast];

fn noise(width: usize, height: usize, stride: usize, seed: u64) -> PixelBuffer {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut data = vec![0_u8; stride * height];
    rng.fill(&mut data[..]);
    PixelBuffer::new(data, width, height, stride).unwrap()
}

fn vertical_stripes(width: usize, height: usize) -> PixelBuffer {
    let mut buffer = PixelBuffer::with_size(width, height).unwrap();
    for y in 0..height {
        for x in (0..width).step_by(2) {
            buffer.set_pixel(x, y, [255, 255, 255]);
        }
    }
    buffer
}

/// Sum of squared differences between horizontally adjacent channels.
fn roughness(buffer: &PixelBuffer) -> u64 {
    let mut total = 0;
    for y in 0..buffer.height() {
        for x in 1..buffer.width() {
            let left = buffer.pixel(x - 1, y);
            let right = buffer.pixel(x, y);
            for c in 0..3 {
                let diff = i64::from(left[c]) - i64::from(right[c]);
                total += (diff * diff) as u64;
            }
        }
    }
    total
}

#[test]
fn uniform_five_by_five_fast() {
    let mut buffer = PixelBuffer::filled(5, 5, [100, 150, 200]).unwrap();
    blur(&mut buffer, 1, true).unwrap();
    assert_eq!(buffer, PixelBuffer::filled(5, 5, [100, 150, 200]).unwrap());
}

#[test]
fn uniform_image_unchanged_exact() {
    for &(width, height, radius) in &[(5, 5, 1), (31, 17, 4), (8, 40, 7)] {
        let expected = PixelBuffer::filled(width, height, [12, 200, 91]).unwrap();
        let mut buffer = expected.clone();
        apply(&mut buffer, &BlurConfig::new(radius).exact()).unwrap();
        assert_eq!(buffer, expected);
    }
}

#[test]
fn two_rows_exact() {
    let width = 6;
    let mut buffer = PixelBuffer::with_size(width, 2).unwrap();
    for x in 0..width {
        buffer.set_pixel(x, 0, [255, 0, 0]);
        buffer.set_pixel(x, 1, [0, 0, 255]);
    }
    blur(&mut buffer, 1, false).unwrap();

    for x in 0..width {
        let on_edge = x == 0 || x == width - 1;
        let (near, far) = if on_edge { (170, 85) } else { (191, 63) };
        assert_eq!(buffer.pixel(x, 0), [near, 0, far], "column {}", x);
        assert_eq!(buffer.pixel(x, 1), [far, 0, near], "column {}", x);
    }
}

#[test]
fn layout_is_preserved() {
    for &mode in &MODES {
        for &(width, height, radius) in &[(2, 2, 1), (10, 3, 2), (3, 10, 2), (16, 16, 15)] {
            let mut buffer = noise(width, height, width * 3 + 5, 1);
            apply(&mut buffer, &BlurConfig::new(radius).mode(mode)).unwrap();
            assert_eq!(buffer.size(), (width, height));
            assert_eq!(buffer.stride(), width * 3 + 5);
            assert_eq!(buffer.as_bytes().len(), (width * 3 + 5) * height);
        }
    }
}

#[test]
fn padded_stride_matches_packed() {
    for &mode in &MODES {
        let padded_src = noise(13, 9, 13 * 3 + 3, 42);
        let mut packed = PixelBuffer::with_size(13, 9).unwrap();
        for y in 0..9 {
            for x in 0..13 {
                packed.set_pixel(x, y, padded_src.pixel(x, y));
            }
        }

        let mut padded = padded_src;
        let config = BlurConfig::new(3).mode(mode);
        apply(&mut padded, &config).unwrap();
        apply(&mut packed, &config).unwrap();

        for y in 0..9 {
            assert_eq!(padded.row(y), packed.row(y));
            let pad_start = padded.offset_of(13, y, 0);
            assert_eq!(&padded.as_bytes()[pad_start..pad_start + 3], &[0, 0, 0]);
        }
    }
}

#[test]
fn parallel_matches_sequential() {
    for &mode in &MODES {
        let src = noise(37, 29, 37 * 3 + 1, 7);

        let mut sequential = src.clone();
        apply(&mut sequential, &BlurConfig::new(4).mode(mode).sequential()).unwrap();

        for &parallelism in &[
            Parallelism::Threads(2),
            Parallelism::Threads(5),
            Parallelism::Threads(64),
            Parallelism::Auto,
        ] {
            let mut parallel = src.clone();
            let config = BlurConfig::new(4).mode(mode).parallelism(parallelism);
            apply(&mut parallel, &config).unwrap();
            assert_eq!(parallel, sequential, "{:?} {:?}", mode, parallelism);
        }
    }
}

#[test]
fn stripes_get_smoother() {
    for &mode in &MODES {
        for radius in 2..5 {
            let src = vertical_stripes(24, 12);
            let mut blurred = src.clone();
            apply(&mut blurred, &BlurConfig::new(radius).mode(mode)).unwrap();
            assert!(
                roughness(&blurred) < roughness(&src),
                "{:?} radius {}",
                mode,
                radius
            );
        }
    }
}

#[test]
fn invalid_radius_is_rejected() {
    let original = noise(8, 5, 24, 3);
    for &radius in &[0, -4, 5, 8, 9] {
        let mut buffer = original.clone();
        let err = blur(&mut buffer, radius, true).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(buffer, original);
    }
}

#[test]
fn uniform_image_fast_within_one() {
    for &(width, height, radius) in &[(5, 5, 2), (7, 7, 3), (13, 9, 6), (40, 30, 20)] {
        let color = [100, 150, 200];
        let mut buffer = PixelBuffer::filled(width, height, color).unwrap();
        apply(&mut buffer, &BlurConfig::new(radius).fast()).unwrap();
        for y in 0..height {
            for x in 0..width {
                let got = buffer.pixel(x, y);
                for c in 0..3 {
                    assert!(got[c] + 1 >= color[c] && got[c] <= color[c], "({}, {})", x, y);
                }
            }
        }
    }
}
