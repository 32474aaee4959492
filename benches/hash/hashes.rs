/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::Rng;
use rsa_zk::hash::{blake2, di_hash, hash_to_prime, sha256};
use rsa_zk::Transcript;

fn bench_blake2() {
  blake2(b"werg", None);
}

fn bench_sha256() {
  sha256(b"werg", None);
}

fn bench_hash_to_prime() {
  let random_bytes = rand::thread_rng().gen::<[u8; 32]>();
  hash_to_prime(&random_bytes);
}

fn bench_di_hash() {
  let random_bytes = rand::thread_rng().gen::<[u8; 32]>();
  di_hash(&random_bytes);
}

fn bench_prime_challenge() {
  let mut t = Transcript::with_entries(["bench", "werg"]);
  let bound = rug::Integer::from(1) << 256u32;
  t.prime_challenge(&bound).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
  c.bench_function("blake2", |b| b.iter(bench_blake2));
  c.bench_function("sha256", |b| b.iter(bench_sha256));
  c.bench_function("hash_to_prime", |b| b.iter(bench_hash_to_prime));
  c.bench_function("di_hash", |b| b.iter(bench_di_hash));
  c.bench_function("prime_challenge", |b| b.iter(bench_prime_challenge));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
