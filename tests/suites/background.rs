use crate::common::{config_with, temp_path};
use image::{Rgb, RgbImage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use slidecap::captcha::background;
use slidecap::{BuiltinBackground, SliderCaptchaGenerator};

#[test]
fn test_external_background_used_by_generator() {
    let path = temp_path("flat.png");
    RgbImage::from_pixel(64, 48, Rgb([30, 90, 160])).save(&path).unwrap();
    let config = config_with(|c| c.background_path = Some(path.clone()));

    let generator = SliderCaptchaGenerator::new(config).unwrap();
    let challenge = generator.generate_with(&mut StdRng::seed_from_u64(1));
    std::fs::remove_file(&path).ok();

    let original = challenge.original().unwrap();
    assert_eq!(original.dimensions(), (350, 200));
    assert!(original.pixels().all(|p| *p == Rgb([30, 90, 160])));
}

#[test]
fn test_named_builtin_used_by_generator() {
    let config = config_with(|c| c.builtin_background = Some(BuiltinBackground::PinkRomantic));
    let expected = BuiltinBackground::PinkRomantic.load(350, 200).unwrap();
    let generator = SliderCaptchaGenerator::new(config).unwrap();
    let challenge = generator.generate();
    assert_eq!(challenge.original(), Some(&expected));
}

#[test]
fn test_bad_path_cascades_to_named_builtin() {
    let config = config_with(|c| {
        c.background_path = Some(temp_path("missing.png"));
        c.builtin_background = Some(BuiltinBackground::YellowGradient);
    });
    let image = background::resolve(&config, &mut StdRng::seed_from_u64(2));
    assert_eq!(image, BuiltinBackground::YellowGradient.load(350, 200).unwrap());
}

#[test]
fn test_random_builtin_when_unconfigured() {
    let config = config_with(|_| {});
    let image = background::resolve(&config, &mut StdRng::seed_from_u64(4));
    let known = BuiltinBackground::ALL
        .iter()
        .any(|bg| bg.load(350, 200).unwrap() == image);
    assert!(known);
}

#[test]
fn test_synthesized_background_supports_verification() {
    let original = background::synthesize(350, 200, &mut StdRng::seed_from_u64(6));
    let challenge = slidecap::cut_challenge(
        original,
        slidecap::Placement { x: 200, y: 60 },
        60,
        60,
        12,
    );
    assert!(challenge.verify_position(200));
    assert!((challenge.similarity_at(200) - 100.0).abs() < 1e-9);
}
