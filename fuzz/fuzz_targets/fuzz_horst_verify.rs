#![no_main]
use std::sync::OnceLock;

use hbs_crypto::horst::{Horst, HorstParams};
use hbs_crypto::{KeyPair, SignatureScheme};
use libfuzzer_sys::fuzz_target;

fn fixture() -> &'static (Horst, KeyPair) {
    static FIXTURE: OnceLock<(Horst, KeyPair)> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let params = HorstParams { n: 256, tau: 8, k: 32 };
        let scheme = Horst::random(&params).unwrap();
        let kp = scheme.generate_key().unwrap();
        (scheme, kp)
    })
}

fuzz_target!(|data: &[u8]| {
    let (scheme, kp) = fixture();
    let len = scheme.signature_len();
    if data.len() >= len {
        let (sig, msg) = data.split_at(len);
        let _ = scheme.verify(msg, kp.public_key(), sig);
        let _ = scheme.verify_digest(&msg[..msg.len().min(32)], kp.public_key(), sig);
    } else {
        let _ = scheme.verify(b"fuzz", kp.public_key(), data);
    }
});
