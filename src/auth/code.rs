use rand::{CryptoRng, Rng};

pub const CODE_LEN: usize = 6;

/// Generate a reset code: CODE_LEN digits drawn uniformly from 0-9.
///
/// Callers pass the rng so tests can seed one; the `CryptoRng` bound keeps
/// predictable generators out of production paths. No uniqueness check
/// against other live codes — collisions are mitigated by the short expiry
/// and single use.
pub fn generate<R: Rng + CryptoRng>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Generate a reset code from the thread-local CSPRNG.
pub fn generate_default() -> String {
    generate(&mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn codes_are_six_ascii_digits() {
        for _ in 0..100 {
            let code = generate_default();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let a = generate(&mut StdRng::seed_from_u64(7));
        let b = generate(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);

        let c = generate(&mut StdRng::seed_from_u64(8));
        assert_ne!(a, c);
    }

    #[test]
    fn every_digit_appears_across_draws() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 10];
        for _ in 0..200 {
            for b in generate(&mut rng).bytes() {
                seen[(b - b'0') as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
