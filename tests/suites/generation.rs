use crate::common::{config_with, create_test_config};
use image::Rgba;
use rand::SeedableRng;
use rand::rngs::StdRng;
use slidecap::captcha::PieceShape;
use slidecap::captcha::cutter::OUTLINE_WIDTH;
use slidecap::{CaptchaError, SliderCaptchaGenerator};

#[test]
fn test_challenge_invariants_across_seeds() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    for seed in 0..12 {
        let challenge = generator.generate_with(&mut StdRng::seed_from_u64(seed));
        assert_eq!(challenge.background().dimensions(), (350, 200));
        assert_eq!(challenge.piece().dimensions(), (70, 60));
        assert!((116..=260).contains(&challenge.x()), "seed {seed}: x {}", challenge.x());
        assert!((20..=120).contains(&challenge.y()), "seed {seed}: y {}", challenge.y());
        assert!(challenge.tolerance() > 0);
    }
}

#[test]
fn test_piece_alpha_follows_silhouette() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    let challenge = generator.generate_with(&mut StdRng::seed_from_u64(21));
    let shape = PieceShape::new(0, 0, 60, 60);
    for (col, row, pixel) in challenge.piece().enumerate_pixels() {
        let distance = shape.pixel_distance(col, row);
        if distance >= 0.0 {
            assert_eq!(*pixel, Rgba([0, 0, 0, 0]), "outside at ({col}, {row})");
        } else if distance <= -OUTLINE_WIDTH {
            assert_eq!(pixel[3], 255, "interior at ({col}, {row})");
        }
    }
}

#[test]
fn test_compositing_piece_restores_original() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    let challenge = generator.generate_with(&mut StdRng::seed_from_u64(5));
    let original = challenge.original().unwrap();

    let mut restored = challenge.background().clone();
    let (x, y) = (challenge.x(), challenge.y());
    let mut opaque = 0;
    for (col, row, pixel) in challenge.piece().enumerate_pixels() {
        if pixel[3] == 255 {
            let target = restored.get_pixel_mut(x + col, y + row);
            *target = image::Rgb([pixel[0], pixel[1], pixel[2]]);
            opaque += 1;
            assert_eq!(*target, *original.get_pixel(x + col, y + row));
        }
    }
    assert!(opaque > 2500);
}

#[test]
fn test_cutout_dims_but_keeps_colors() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    let challenge = generator.generate_with(&mut StdRng::seed_from_u64(13));
    let original = challenge.original().unwrap();
    let shape = PieceShape::at(challenge.placement(), 60, 60);

    let (x0, y0, x1, y1) = shape.bounds();
    for row in y0..y1 {
        for col in x0..x1 {
            if shape.pixel_distance(col, row) > -OUTLINE_WIDTH {
                continue;
            }
            let before = original.get_pixel(col, row);
            let after = challenge.background().get_pixel(col, row);
            for c in 0..3 {
                assert!(after[c] <= before[c], "({col}, {row}) brightened");
                if before[c] >= 8 {
                    assert!(after[c] > 0, "({col}, {row}) erased");
                }
            }
        }
    }
}

#[test]
fn test_background_outside_cutout_untouched() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    let challenge = generator.generate_with(&mut StdRng::seed_from_u64(17));
    let original = challenge.original().unwrap();
    let (x0, y0, x1, y1) = PieceShape::at(challenge.placement(), 60, 60).bounds();
    for (col, row, pixel) in challenge.background().enumerate_pixels() {
        let near = (x0.saturating_sub(1)..=x1).contains(&col)
            && (y0.saturating_sub(1)..=y1).contains(&row);
        if !near {
            assert_eq!(pixel, original.get_pixel(col, row), "({col}, {row})");
        }
    }
}

#[test]
fn test_custom_canvas_and_tolerance() {
    let config = config_with(|c| {
        c.width = 400;
        c.height = 240;
        c.tolerance = 15;
    });
    let generator = SliderCaptchaGenerator::new(config).unwrap();
    let challenge = generator.generate();
    assert_eq!((challenge.width(), challenge.height()), (400, 240));
    assert_eq!(challenge.tolerance(), 15);
    assert!((133..=310).contains(&challenge.x()));
    assert!((20..=160).contains(&challenge.y()));
}

#[test]
fn test_invalid_canvas_rejected() {
    let config = config_with(|c| c.width = 100);
    assert!(matches!(
        SliderCaptchaGenerator::new(config),
        Err(CaptchaError::CanvasTooSmall { width: 100, .. })
    ));
}

#[test]
fn test_data_uris() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    let challenge = generator.generate();
    for uri in [
        challenge.background_data_uri().unwrap(),
        challenge.piece_data_uri().unwrap(),
    ] {
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
