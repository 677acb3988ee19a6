use criterion::{criterion_group, criterion_main, Criterion};
use rand::{RngCore, SeedableRng};
use rand_isaac::IsaacRng;

use oaes::{Cipher, KeySize, Mode};
use oaes_core::{expand_key, AesKey};

fn bench_key_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_schedule");
    for (name, len) in [("aes128", 16usize), ("aes192", 24), ("aes256", 32)] {
        let bytes: Vec<u8> = (0..len as u8).collect();
        let key = AesKey::from_slice(&bytes).expect("valid key length");
        group.bench_function(name, |b| {
            b.iter(|| expand_key(&key));
        });
    }
    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let mut rng = IsaacRng::from_seed([1u8; 32]);
    let mut payload = vec![0u8; 4096];
    rng.fill_bytes(&mut payload);

    let mut group = c.benchmark_group("envelope");
    group.sample_size(50);

    for (name, mode) in [("encrypt_cbc_4k", Mode::Cbc), ("encrypt_ecb_4k", Mode::Ecb)] {
        group.bench_function(name, |b| {
            let mut cipher = Cipher::with_rng(IsaacRng::from_seed([2u8; 32]));
            cipher.generate_key(KeySize::Bits128);
            cipher.set_mode(mode);
            b.iter(|| cipher.encrypt(&payload).expect("keyed context"));
        });
    }

    group.bench_function("decrypt_cbc_4k", |b| {
        let mut cipher = Cipher::with_rng(IsaacRng::from_seed([3u8; 32]));
        cipher.generate_key(KeySize::Bits128);
        let message = cipher.encrypt(&payload).expect("keyed context");
        b.iter(|| cipher.decrypt(&message).expect("well-formed message"));
    });

    group.finish();
}

criterion_group!(benches, bench_key_schedule, bench_envelope);
criterion_main!(benches);
