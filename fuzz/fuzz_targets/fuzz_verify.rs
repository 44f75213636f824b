#![no_main]
use std::sync::OnceLock;

use hbs_crypto::sphincs::{Sphincs, SphincsParams};
use hbs_crypto::{KeyPair, SignatureScheme};
use libfuzzer_sys::fuzz_target;

fn fixture() -> &'static (Sphincs, KeyPair) {
    static FIXTURE: OnceLock<(Sphincs, KeyPair)> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let params = SphincsParams {
            n: 256,
            m: 256,
            h: 4,
            d: 2,
            w: 4,
            tau: 8,
            k: 32,
        };
        let scheme = Sphincs::new(params).unwrap();
        let kp = scheme.generate_key().unwrap();
        (scheme, kp)
    })
}

fuzz_target!(|data: &[u8]| {
    let (scheme, kp) = fixture();
    let len = scheme.signature_len();
    // any length and any content: errors and rejections only, never a panic
    let _ = scheme.verify(b"fuzz", kp.public_key(), data);
    if data.len() >= len {
        let (sig, msg) = data.split_at(len);
        let _ = scheme.verify(msg, kp.public_key(), sig);
    }
});
