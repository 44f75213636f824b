//! Hash-DRBG seeded generator.
//!
//! Follows the NIST SP 800-90A §10.1.1 construction with SHA-256 or SHA-512.
//! The seed may be of any length: it is condensed to the internal state width
//! through `Hash_df`, so two generators built from the same seed always yield
//! the same stream. WOTS+ and HORST derive their secret keys from one.

use hbs_types::CryptoError;
use zeroize::Zeroize;

use crate::hash::HashFunction;
use crate::provider::RandomSource;

/// Maximum number of generate requests before reseed is required.
const RESEED_INTERVAL: u64 = 1 << 48;

/// Seed length in bytes (SP 800-90A Table 2).
fn seed_len(hash: HashFunction) -> usize {
    match hash {
        HashFunction::Sha256 => 55,
        HashFunction::Sha512 => 111,
    }
}

/// Hash-DRBG context.
pub struct HashDrbg {
    /// State value V (seedLen bytes).
    v: Vec<u8>,
    /// Constant C (seedLen bytes).
    c: Vec<u8>,
    seed_len: usize,
    hash: HashFunction,
    /// Number of generate requests since last (re)seed.
    reseed_counter: u64,
}

impl Drop for HashDrbg {
    fn drop(&mut self) {
        self.v.zeroize();
        self.c.zeroize();
    }
}

/// Hash_df: derive `output_len` bytes from `input` using counter-mode hashing
/// (SP 800-90A §10.3.1).
fn hash_df(hash: HashFunction, input: &[&[u8]], output_len: usize) -> Vec<u8> {
    let mut temp = Vec::with_capacity(output_len + hash.output_size());
    let mut counter: u8 = 1;
    let bits = ((output_len as u32) * 8).to_be_bytes();

    while temp.len() < output_len {
        // Hash(counter || no_of_bits_to_return || input_string)
        let ctr = [counter];
        let mut parts: Vec<&[u8]> = Vec::with_capacity(2 + input.len());
        parts.push(&ctr);
        parts.push(&bits);
        parts.extend_from_slice(input);
        temp.extend_from_slice(&hash.hash_parts(&parts));
        counter = counter.wrapping_add(1);
    }

    temp.truncate(output_len);
    temp
}

/// Big-endian modular addition: v = (v + addend) mod 2^(8*len).
fn v_add(v: &mut [u8], addend: &[u8]) {
    let len = v.len();
    let alen = addend.len();
    let mut carry: u16 = 0;
    for i in (0..len).rev() {
        let a = if i >= len - alen {
            addend[i - (len - alen)] as u16
        } else {
            0
        };
        let sum = v[i] as u16 + a + carry;
        v[i] = sum as u8;
        carry = sum >> 8;
    }
}

fn v_add_u64(v: &mut [u8], val: u64) {
    v_add(v, &val.to_be_bytes());
}

impl HashDrbg {
    /// Instantiate from arbitrary-length seed material.
    pub fn new(hash: HashFunction, seed: &[u8]) -> Self {
        let seed_len = seed_len(hash);
        let v = hash_df(hash, &[seed], seed_len);
        let c = hash_df(hash, &[&[0x00], &v], seed_len);
        HashDrbg {
            v,
            c,
            seed_len,
            hash,
            reseed_counter: 1,
        }
    }

    /// Hashgen (SP 800-90A §10.1.1.4).
    fn hashgen(&self, output: &mut [u8]) {
        let mut data = self.v.clone();
        let mut written = 0;
        while written < output.len() {
            let digest = self.hash.hash(&data);
            let take = digest.len().min(output.len() - written);
            output[written..written + take].copy_from_slice(&digest[..take]);
            written += take;
            v_add_u64(&mut data, 1);
        }
        data.zeroize();
    }

    /// Generate pseudorandom bytes into `output`.
    pub fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: Option<&[u8]>,
    ) -> Result<(), CryptoError> {
        if self.reseed_counter > RESEED_INTERVAL {
            return Err(CryptoError::DrbgInvalidState);
        }

        if let Some(data) = additional_input.filter(|d| !d.is_empty()) {
            // V = (V + Hash(0x02 || V || additional_input)) mod 2^seedlen
            let w = self.hash.hash_parts(&[&[0x02], &self.v, data]);
            v_add(&mut self.v, &w);
        }

        self.hashgen(output);

        // V = (V + Hash(0x03 || V) + C + reseed_counter) mod 2^seedlen
        let h = self.hash.hash_parts(&[&[0x03], &self.v]);
        v_add(&mut self.v, &h);
        v_add(&mut self.v, &self.c);
        v_add_u64(&mut self.v, self.reseed_counter);

        self.reseed_counter += 1;
        Ok(())
    }

    pub fn generate_bytes(&mut self, len: usize) -> Result<Vec<u8>, CryptoError> {
        let mut output = vec![0u8; len];
        self.generate(&mut output, None)?;
        Ok(output)
    }

    /// Mix fresh material into the state (SP 800-90A §10.1.1.3).
    pub fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) {
        let adin = additional_input.unwrap_or(&[]);
        self.v = hash_df(self.hash, &[&[0x01], &self.v, entropy, adin], self.seed_len);
        self.c = hash_df(self.hash, &[&[0x00], &self.v], self.seed_len);
        self.reseed_counter = 1;
    }
}

impl RandomSource for HashDrbg {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        self.generate(buf, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_drbg_instantiate() {
        let drbg = HashDrbg::new(HashFunction::Sha256, b"seed");
        assert_eq!(drbg.reseed_counter, 1);
        assert_eq!(drbg.v.len(), 55);
        assert_eq!(drbg.c.len(), 55);

        let drbg = HashDrbg::new(HashFunction::Sha512, b"seed");
        assert_eq!(drbg.v.len(), 111);
    }

    #[test]
    fn test_hash_drbg_deterministic() {
        let seed = b"deterministic test seed for Hash-DRBG";
        let mut a = HashDrbg::new(HashFunction::Sha256, seed);
        let mut b = HashDrbg::new(HashFunction::Sha256, seed);
        assert_eq!(a.generate_bytes(64).unwrap(), b.generate_bytes(64).unwrap());
        // stream advances
        let next = a.generate_bytes(64).unwrap();
        assert_ne!(next, HashDrbg::new(HashFunction::Sha256, seed).generate_bytes(64).unwrap());
    }

    #[test]
    fn test_hash_drbg_seed_separation() {
        let mut a = HashDrbg::new(HashFunction::Sha256, b"seed-a");
        let mut b = HashDrbg::new(HashFunction::Sha256, b"seed-b");
        assert_ne!(a.generate_bytes(32).unwrap(), b.generate_bytes(32).unwrap());

        // arbitrary-length seeds are accepted
        let long = vec![0x5Au8; 1000];
        let mut c = HashDrbg::new(HashFunction::Sha512, &long);
        assert_eq!(c.generate_bytes(200).unwrap().len(), 200);
        let mut e = HashDrbg::new(HashFunction::Sha512, &[]);
        assert_eq!(e.generate_bytes(1).unwrap().len(), 1);
    }

    #[test]
    fn test_hash_drbg_reseed() {
        let mut drbg = HashDrbg::new(HashFunction::Sha256, b"initial seed");
        let _ = drbg.generate_bytes(32).unwrap();
        assert_eq!(drbg.reseed_counter, 2);

        drbg.reseed(b"new entropy", None);
        assert_eq!(drbg.reseed_counter, 1);
    }

    #[test]
    fn test_hash_drbg_additional_input() {
        let seed = b"seed for additional input test";
        let mut a = HashDrbg::new(HashFunction::Sha256, seed);
        let mut b = HashDrbg::new(HashFunction::Sha256, seed);

        let mut out_a = vec![0u8; 64];
        let mut out_b = vec![0u8; 64];
        a.generate(&mut out_a, Some(b"input one")).unwrap();
        b.generate(&mut out_b, Some(b"input two")).unwrap();
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn test_hash_drbg_fill_matches_generate() {
        let mut a = HashDrbg::new(HashFunction::Sha256, b"fill");
        let mut b = HashDrbg::new(HashFunction::Sha256, b"fill");
        let via_trait = a.bytes(70).unwrap();
        assert_eq!(via_trait, b.generate_bytes(70).unwrap());
    }

    #[test]
    fn test_hash_df() {
        let input = b"test input for hash derivation function";
        let out = hash_df(HashFunction::Sha256, &[input], 55);
        assert_eq!(out.len(), 55);
        assert_eq!(out, hash_df(HashFunction::Sha256, &[&input[..10], &input[10..]], 55));
        assert_ne!(out, hash_df(HashFunction::Sha256, &[b"different"], 55));
    }

    #[test]
    fn test_v_add() {
        let mut v = vec![0x00, 0x00, 0x00, 0xFF];
        v_add(&mut v, &[0x00, 0x00, 0x00, 0x01]);
        assert_eq!(v, vec![0x00, 0x00, 0x01, 0x00]);

        let mut v = vec![0xFF, 0xFF, 0xFF, 0xFF];
        v_add(&mut v, &[0x01]);
        assert_eq!(v, vec![0x00, 0x00, 0x00, 0x00]);

        let mut v = vec![0x00; 16];
        v_add_u64(&mut v, 256);
        assert_eq!(v[14], 0x01);
        assert_eq!(v[15], 0x00);
    }
}
