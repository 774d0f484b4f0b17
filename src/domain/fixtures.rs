use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use quickcheck::{Arbitrary, Gen};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct ValidEmailFixture(pub String);

impl Arbitrary for ValidEmailFixture {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));
        let email = SafeEmail().fake_with_rng(&mut rng);

        Self(email)
    }
}

const JUNK: [&str; 6] = ["nope", "x@y", "a b@c.d", "@x.com", "a@b@c.d", ""];

/// A picker selection: valid addresses drawn from a small pool so that
/// repeats are common, interleaved with malformed ones.
#[derive(Debug, Clone)]
pub struct BatchFixture(pub Vec<String>);

impl Arbitrary for BatchFixture {
    fn arbitrary(g: &mut Gen) -> Self {
        let pool: Vec<String> = (0..=usize::arbitrary(g) % 4)
            .map(|_| ValidEmailFixture::arbitrary(g).0)
            .collect();
        let len = usize::arbitrary(g) % (g.size() + 1);
        let values = (0..len)
            .map(|_| match u8::arbitrary(g) % 3 {
                0 => g.choose(&JUNK).unwrap().to_string(),
                _ => g.choose(&pool).unwrap().clone(),
            })
            .collect();

        Self(values)
    }
}
