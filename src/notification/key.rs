use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::error::PushError;

// Mirrors `atob`: leftover bits in the last symbol are ignored.
const ATOB: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Decodes a base64url application server key into raw bytes.
///
/// The input is padded with `=` to a multiple of four, `-`/`_` are mapped
/// back to `+`/`/`, and the result is decoded as standard base64.
pub fn url_b64_to_bytes(key: &str) -> Result<Vec<u8>, PushError> {
    let padding = (4 - key.len() % 4) % 4;
    let mut standard = String::with_capacity(key.len() + padding);
    standard.extend(key.chars().map(|c| match c {
        '-' => '+',
        '_' => '/',
        other => other,
    }));
    standard.extend(std::iter::repeat_n('=', padding));

    ATOB.decode(standard.as_bytes())
        .map_err(|e| PushError::Subscription(format!("malformed application server key: {e}")))
}
