use rand::rngs::StdRng;
use rand::SeedableRng;
use rsa_zk::hash::primality::is_prob_prime;
use rsa_zk::ring::{GaussianInt, HurwitzInt};
use rsa_zk::util::{int, random_bits};
use rsa_zk::{lagrange_four_squares, Config, Error, SquareDecomposer};
use rug::Integer;

#[test]
fn test_four_squares_zero_through_eight() {
  let d = SquareDecomposer::new(Config::default());
  let mut rng = StdRng::seed_from_u64(200);
  for n in 0..=8 {
    let n = int(n);
    let f = d.four_squares(&n, &mut rng).unwrap();
    assert_eq!(f.sum_of_squares(), n);
    let values = f.values();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
  }
}

#[test]
fn test_four_squares_random_inputs() {
  let d = SquareDecomposer::new(Config::default());
  let mut rng = StdRng::seed_from_u64(201);
  for bits in [16u32, 64, 256, 1024] {
    let n = random_bits(&mut rng, bits).unwrap();
    assert_eq!(d.four_squares(&n, &mut rng).unwrap().sum_of_squares(), n);
    assert_eq!(d.four_squares_large(&n, &mut rng).unwrap().sum_of_squares(), n);
  }
}

#[test]
fn test_four_squares_of_large_prime() {
  // 2^521 - 1 is a Mersenne prime (3 mod 4); 2^255 - 19 is prime and 1 mod 4.
  let mersenne = Integer::from(Integer::u_pow_u(2, 521)) - 1u32;
  let curve = Integer::from(Integer::u_pow_u(2, 255)) - 19u32;
  for p in [mersenne, curve] {
    assert!(is_prob_prime(&p, 30));
    assert_eq!(lagrange_four_squares(&p).unwrap().sum_of_squares(), p);
  }
}

#[test]
fn test_decomposers_are_independent() {
  let a = SquareDecomposer::new(Config::default());
  let b = SquareDecomposer::new(Config::default());
  let mut rng = StdRng::seed_from_u64(202);
  let n = (int(1) << 100u32) + 1u32;
  a.four_squares(&n, &mut rng).unwrap();
  assert!(!a.primes().is_empty());
  assert!(b.primes().is_empty());
}

#[test]
fn test_negative_input() {
  assert!(matches!(
    lagrange_four_squares(&int(-10)),
    Err(Error::PreconditionViolation(_))
  ));
}

#[test]
fn test_two_and_three_squares() {
  let d = SquareDecomposer::new(Config::default());
  let mut rng = StdRng::seed_from_u64(203);
  let p = int(1_000_000_009);
  let (a, b) = d.two_squares_prime(&p, &mut rng).unwrap();
  assert_eq!(Integer::from(a.square_ref()) + Integer::from(b.square_ref()), p);

  let n = (int(1) << 512u32) + 13u32;
  let three = d.three_squares_racing(&n, &mut rng).unwrap();
  assert_eq!(three.sum_of_squares(), n);
  assert!(d.three_squares(&int(7), &mut rng).is_err());
}

#[test]
fn test_gaussian_gcd_splits_prime() {
  // 5^2 = -1 mod 13, so gcd(5 + i, 13) is a prime of norm 13.
  let d = GaussianInt::from_ints(5, 1).gcd(&GaussianInt::from_ints(13, 0));
  assert_eq!(d.norm(), 13);
  assert!(d.divides(&GaussianInt::from_ints(13, 0)));
}

#[test]
fn test_hurwitz_gcrd_has_expected_norm() {
  // 3^2 + 2^2 + 1 = 14 = 2 * 7, so gcrd(3 + 2i + j, 7) has norm 7.
  let alpha = HurwitzInt::from_ints(3, 2, 1, 0);
  let gamma = alpha.gcrd(&HurwitzInt::from_ints(7, 0, 0, 0));
  assert_eq!(gamma.norm(), 7);
  let lipschitz = gamma.to_lipschitz();
  let squares: Integer = lipschitz
    .to_ints()
    .unwrap()
    .iter()
    .map(|x| Integer::from(x.square_ref()))
    .sum();
  assert_eq!(squares, 7);
}
