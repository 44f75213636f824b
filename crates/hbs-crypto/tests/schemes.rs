//! Every scheme through the registry and the shared trait.

use hbs_crypto::hors::{Hors, HorsParams};
use hbs_crypto::horst::{Horst, HorstParams};
use hbs_crypto::lamport::LamportParams;
use hbs_crypto::scheme::Scheme;
use hbs_crypto::wots::{WotsParams, WotsPlus};
use hbs_crypto::{CryptoError, SchemeId, SignatureScheme};

fn roundtrip(scheme: &dyn SignatureScheme, label: &str) {
    let kp = scheme.generate_key().unwrap();
    let sig = scheme.sign(b"shared trait", kp.secret_key()).unwrap();
    assert_eq!(sig.len(), scheme.signature_len(), "{label}");
    assert!(scheme.verify(b"shared trait", kp.public_key(), &sig).unwrap(), "{label}");

    let mut bad = sig.clone();
    bad[0] ^= 0x01;
    assert!(!scheme.verify(b"shared trait", kp.public_key(), &bad).unwrap(), "{label}");
    assert!(matches!(
        scheme.verify(b"shared trait", kp.public_key(), &sig[1..]),
        Err(CryptoError::SizeMismatch { .. })
    ));
}

#[test]
fn test_registry_roundtrips() {
    for id in SchemeId::ALL {
        // the full-size hypertree has its own test file
        if id == SchemeId::Sphincs {
            continue;
        }
        let scheme = Scheme::from_id(id).unwrap();
        assert_eq!(scheme.id(), id);
        roundtrip(&scheme, id.as_str());
    }
}

#[test]
fn test_registry_names_are_case_insensitive() {
    let scheme = Scheme::from_name("WOTS+").unwrap();
    assert_eq!(scheme.id(), SchemeId::WotsPlus);
    assert!(matches!(
        Scheme::from_name("merkle"),
        Err(CryptoError::UnknownScheme(name)) if name == "merkle"
    ));
}

#[test]
fn test_params_from_json() {
    let lamport: LamportParams = serde_json::from_str(r#"{"n":512}"#).unwrap();
    roundtrip(&hbs_crypto::lamport::Lamport::from_params(&lamport).unwrap(), "lamport-512");

    let wots: WotsParams = serde_json::from_str(r#"{"n":512,"w":8}"#).unwrap();
    roundtrip(&hbs_crypto::wots::Wots::from_params(&wots).unwrap(), "wots-512-8");

    let masks = vec![0x5au8; wots.chain_len() * 64];
    roundtrip(&WotsPlus::from_params(&wots, b"seed", &masks).unwrap(), "wots+-512-8");

    let hors: HorsParams = serde_json::from_str(r#"{"tau":16,"k":32}"#).unwrap();
    roundtrip(&Hors::from_params(&hors).unwrap(), "hors-16-32");

    let horst: HorstParams = serde_json::from_str(r#"{"n":512,"tau":8,"k":64}"#).unwrap();
    roundtrip(&Horst::random(&horst).unwrap(), "horst-512-8-64");
}

#[test]
fn test_invalid_params_from_json() {
    let wots: WotsParams = serde_json::from_str(r#"{"n":256,"w":3}"#).unwrap();
    assert!(matches!(
        wots.validate(),
        Err(CryptoError::InvalidWinternitzParam(3))
    ));
    let hors: HorsParams = serde_json::from_str(r#"{"tau":7,"k":32}"#).unwrap();
    assert!(matches!(hors.validate(), Err(CryptoError::InvalidTau(7))));
}

#[test]
fn test_schemes_are_shareable_across_threads() {
    let scheme = std::sync::Arc::new(Scheme::from_id(SchemeId::Wots).unwrap());
    let kp = scheme.generate_key().unwrap();
    let sig = scheme.sign(b"threads", kp.secret_key()).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scheme = scheme.clone();
            let pk = kp.public_key().to_vec();
            let sig = sig.clone();
            std::thread::spawn(move || scheme.verify(b"threads", &pk, &sig).unwrap())
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }
}
