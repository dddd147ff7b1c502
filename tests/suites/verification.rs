use crate::common::{create_test_config, noise_texture};
use rand::SeedableRng;
use rand::rngs::StdRng;
use slidecap::captcha::Placement;
use slidecap::{Captcha, SliderCaptchaGenerator, SliderChallenge, cut_challenge};
use std::sync::Arc;
use std::thread;

fn scenario() -> SliderChallenge {
    cut_challenge(noise_texture(350, 200), Placement { x: 180, y: 70 }, 60, 60, 15)
}

#[test]
fn test_generic_contract() {
    let challenge = scenario();
    let captcha: &dyn Captcha = &challenge;
    assert_eq!(captcha.answer(), "180");
    assert!(captcha.verify("180"));
    assert!(captcha.verify("165"));
    assert!(!captcha.verify("200"));
    assert!(!captcha.verify("one hundred eighty"));
}

#[test]
fn test_smart_verification_scenario() {
    let challenge = scenario();
    assert!(challenge.verify_position(180));
    assert!(challenge.verify_position(170));
    assert!(!challenge.verify_position(200));
    assert_eq!(challenge.position_difference(170), 10);
    assert!(challenge.verify_position_loose(202));
}

#[test]
fn test_generated_true_position_passes_every_check() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    for seed in 0..6 {
        let challenge = generator.generate_with(&mut StdRng::seed_from_u64(seed));
        let x = i64::from(challenge.x());
        let tolerance = i64::from(challenge.tolerance());
        assert!(challenge.verify_position(x), "seed {seed}");
        assert!(challenge.verify_position_smart(x), "seed {seed}");
        assert!(challenge.verify_position_loose(x), "seed {seed}");
        assert!(challenge.verify(&(x + tolerance).to_string()));
        assert!(challenge.verify(&(x - tolerance).to_string()));
        assert!(!challenge.verify(&(x + tolerance + 1).to_string()));
    }
}

#[test]
fn test_generated_far_offsets_fail() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    for seed in 0..6 {
        let challenge = generator.generate_with(&mut StdRng::seed_from_u64(seed));
        let x = i64::from(challenge.x());
        let far = 3 * i64::from(challenge.tolerance());
        assert!(!challenge.verify_position(x + far), "seed {seed}");
        assert!(!challenge.verify_position(x - far), "seed {seed}");
    }
}

#[test]
fn test_details_report() {
    let challenge = scenario();
    let passing = challenge.verify_details(180);
    assert!(passing.contains("verdict: pass"));
    assert!(passing.contains("best match:           180 px (100.00%)"));

    let failing = challenge.verify_details(140);
    assert!(failing.contains("verdict: fail"));
    assert!(failing.contains("hint:"));
}

#[test]
fn test_challenge_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SliderChallenge>();

    let challenge = Arc::new(scenario());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let challenge = Arc::clone(&challenge);
            thread::spawn(move || {
                let x = 176 + i;
                (challenge.verify_position(x), challenge.verify(&x.to_string()))
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (true, true));
    }
}
