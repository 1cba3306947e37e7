//! Signature algorithm and verification for all paylink APIs.
//!
//! Every request and response carries a `sign` field computed over a
//! declared set of named scalar fields:
//!
//! 1. drop anything outside the message type's signing set
//! 2. sort the field *names* lexicographically (byte order, ascending)
//! 3. join the field *values* in that order with a literal `:`
//! 4. append the shop's API key directly, with no separator
//! 5. SHA-256 the resulting bytes and render lowercase hex
//!
//! ```text
//! sign = hex(sha256("{v1}:{v2}:...:{vn}{api_key}"))
//! ```
//!
//! Verification recomputes the digest and compares in constant time. A
//! mismatch is a normal outcome for the caller to route, never a fault.

/// Name of the signature field on every request and response body.
pub const SIGN_FIELD: &str = "sign";

/// Build the canonical signing string for a set of named fields.
///
/// Fields are sorted by name; only the values appear in the output,
/// `:`-joined, with the API key appended at the end.
pub fn canonical_string<'a, I>(fields: I, api_key: &str) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut fields: Vec<(&str, String)> = fields.into_iter().collect();
    fields.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut out = String::new();
    for (i, (_, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        out.push_str(value);
    }
    out.push_str(api_key);
    out
}

/// Compute the signature for a set of named fields.
///
/// Pure: the same fields and key always produce the same hex digest,
/// regardless of the order the fields are supplied in.
pub fn sign<'a, I>(fields: I, api_key: &str) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let canonical = canonical_string(fields, api_key);
    let digest = ring::digest::digest(&ring::digest::SHA256, canonical.as_bytes());
    hex_lower(digest.as_ref())
}

/// Verify a candidate signature against the expected one.
///
/// Comparison is constant-time. Returns `false` on any mismatch,
/// including wrong length.
pub fn verify<'a, I>(fields: I, api_key: &str, candidate: &str) -> bool
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let expected = sign(fields, api_key);
    ring::constant_time::verify_slices_are_equal(expected.as_bytes(), candidate.as_bytes()).is_ok()
}

/// Message types that declare a signed field set.
///
/// `signed_fields` returns the name/value pairs belonging to the signing
/// set for this message; `sign_with` reduces them with [`sign`].
pub trait SignedFields {
    fn signed_fields(&self) -> Vec<(&'static str, String)>;

    fn sign_with(&self, api_key: &str) -> String {
        sign(self.signed_fields(), api_key)
    }

    fn verify_with(&self, api_key: &str, candidate: &str) -> bool {
        verify(self.signed_fields(), api_key, candidate)
    }
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        // Infallible for String.
        let _ = write!(s, "{b:02x}");
        s
    })
}
