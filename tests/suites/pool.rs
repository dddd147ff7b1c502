use crate::common::create_test_config;
use slidecap::{ChallengePool, SliderCaptchaGenerator};
use std::time::{Duration, Instant};

#[test]
fn test_pool_serves_valid_challenges() {
    let generator = SliderCaptchaGenerator::new(create_test_config()).unwrap();
    let pool = ChallengePool::new(generator, 2);
    pool.start_worker();

    let deadline = Instant::now() + Duration::from_secs(30);
    while pool.len() < 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    assert_eq!(pool.len(), 2);

    let first = pool.take();
    let second = pool.take();
    for challenge in [&first, &second] {
        assert!(challenge.verify_position(i64::from(challenge.x())));
    }
}
