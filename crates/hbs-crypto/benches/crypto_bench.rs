//! Signature scheme benchmarks.
//!
//! Run with: cargo bench -p hbs-crypto

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hbs_crypto::SignatureScheme;

const MSG: &[u8] = b"benchmark message";

fn bench_scheme(c: &mut Criterion, group_name: &str, label: &str, scheme: &dyn SignatureScheme) {
    let mut group = c.benchmark_group(group_name);
    let kp = scheme.generate_key().unwrap();
    let sig = scheme.sign(MSG, kp.secret_key()).unwrap();

    group.bench_function(format!("{label}/keygen"), |b| {
        b.iter(|| scheme.generate_key().unwrap());
    });
    group.bench_function(format!("{label}/sign"), |b| {
        b.iter(|| scheme.sign(MSG, kp.secret_key()).unwrap());
    });
    group.bench_function(format!("{label}/verify"), |b| {
        b.iter(|| scheme.verify(MSG, kp.public_key(), &sig).unwrap());
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Hash primitive benchmarks
// ---------------------------------------------------------------------------

fn bench_hash(c: &mut Criterion) {
    use hbs_crypto::hash::HashFunction;

    let mut group = c.benchmark_group("hash");
    for (name, hash) in [("sha256", HashFunction::Sha256), ("sha512", HashFunction::Sha512)] {
        let block = vec![0x5au8; hash.output_size()];
        let masks = vec![0xa5u8; 15 * hash.output_size()];
        group.throughput(Throughput::Elements(15));
        group.bench_with_input(BenchmarkId::new("masked_chain_15", name), &hash, |b, h| {
            b.iter(|| h.hash_times_with_mask(&block, 0, 15, &masks).unwrap());
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// One-time signature benchmarks
// ---------------------------------------------------------------------------

fn bench_lamport(c: &mut Criterion) {
    use hbs_crypto::lamport::Lamport;

    for n in [256, 512] {
        bench_scheme(c, "lamport", &format!("lamport-{n}"), &Lamport::new(n).unwrap());
    }
}

fn bench_wots(c: &mut Criterion) {
    use hbs_crypto::wots::{Wots, WotsPlus};

    for w in [2, 4, 8] {
        bench_scheme(c, "wots", &format!("wots-w{w}"), &Wots::new(w, 256).unwrap());
    }
    bench_scheme(c, "wots+", "wots+-w4", &WotsPlus::random(4, 256).unwrap());
}

// ---------------------------------------------------------------------------
// Few-time signature benchmarks
// ---------------------------------------------------------------------------

fn bench_hors(c: &mut Criterion) {
    use hbs_crypto::hors::Hors;

    bench_scheme(c, "hors", "hors-8-32", &Hors::new(8, 32).unwrap());
}

fn bench_horst(c: &mut Criterion) {
    use hbs_crypto::horst::{Horst, HorstParams};

    let params = HorstParams { n: 256, tau: 8, k: 32 };
    bench_scheme(c, "horst", "horst-8-32", &Horst::random(&params).unwrap());
}

// ---------------------------------------------------------------------------
// Hypertree benchmarks
// ---------------------------------------------------------------------------

fn bench_sphincs(c: &mut Criterion) {
    use hbs_crypto::sphincs::Sphincs;

    let scheme = Sphincs::sphincs256().unwrap();
    let kp = scheme.generate_key().unwrap();
    let sig = scheme.sign(MSG, kp.secret_key()).unwrap();

    let mut group = c.benchmark_group("sphincs-256");
    group.sample_size(10);
    group.bench_function("sign", |b| {
        b.iter(|| scheme.sign(MSG, kp.secret_key()).unwrap());
    });
    group.bench_function("verify", |b| {
        b.iter(|| scheme.verify(MSG, kp.public_key(), &sig).unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_hash,
    bench_lamport,
    bench_wots,
    bench_hors,
    bench_horst,
    bench_sphincs,
);
criterion_main!(benches);
