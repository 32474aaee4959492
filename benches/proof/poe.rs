/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rsa_zk::proof::{Poe, ZkPoke};
use rsa_zk::util::{int, random_bits};
use rsa_zk::{Config, PublicParameters};

fn bench_poe_rsa(params: &PublicParameters) {
  let base = params.g();
  let exp = int(20);
  let result = params.exp(base, &exp).unwrap();
  let proof = Poe::prove(params.n(), base, &exp, &result).unwrap();
  Poe::verify(params.n(), base, &exp, &result, &proof);
}

fn criterion_benchmark(c: &mut Criterion) {
  let params = PublicParameters::rsa2048();
  c.bench_function("poe_rsa", |b| b.iter(|| bench_poe_rsa(&params)));

  let config = Config::default();
  let mut rng = StdRng::seed_from_u64(0);
  let x = random_bits(&mut rng, 2048).unwrap();
  let base = int(7);
  let w = params.exp(&base, &x).unwrap();
  c.bench_function("zkpoke_prove", |b| {
    b.iter(|| ZkPoke::prove(&params, &config, &base, &x, &w, &mut rng).unwrap())
  });
  let proof = ZkPoke::prove(&params, &config, &base, &x, &w, &mut rng).unwrap();
  c.bench_function("zkpoke_verify", |b| {
    b.iter(|| ZkPoke::verify(&params, &config, &base, &w, &proof))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
