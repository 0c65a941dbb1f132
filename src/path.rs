//! # Path codec (C5)
//!
//! Parses and renders the textual derivation path grammar
//! (`m/44'/0'/0'/0/5`), and infers a [`Purpose`] from a BIP-43 path's
//! first component when one is present.

use crate::error::PathError;
use crate::version::Purpose;

/// The hardening bit, `2^31`, added to an index to mark it hardened.
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// Parse a derivation path string into `(starts_at_private_root,
/// indices)`. Accepts `m` (private root) or `M` (public root), slash
/// separated decimal components, each optionally suffixed with `'`,
/// `h`, or `H` to mark it hardened.
pub fn parse_path(path: &str) -> Result<(bool, Vec<u32>), PathError> {
    let mut parts = path.split('/');
    let root = parts.next().ok_or(PathError::BadRoot)?;
    let is_private = match root {
        "m" => true,
        "M" => false,
        _ => return Err(PathError::BadRoot),
    };

    let mut indices = Vec::new();
    for component in parts {
        indices.push(parse_component(component)?);
    }
    Ok((is_private, indices))
}

fn parse_component(component: &str) -> Result<u32, PathError> {
    let (digits, hardened) = if let Some(stripped) = component.strip_suffix('\'') {
        (stripped, true)
    } else if let Some(stripped) = component.strip_suffix(['h', 'H']) {
        (stripped, true)
    } else {
        (component, false)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::BadComponent(component.to_string()));
    }
    let base: u32 = digits
        .parse()
        .map_err(|_| PathError::OutOfRange(component.to_string()))?;
    if base >= HARDENED_BIT {
        return Err(PathError::OutOfRange(component.to_string()));
    }
    Ok(if hardened { base | HARDENED_BIT } else { base })
}

/// Render a path back to its canonical textual form, using `'` for
/// hardened components.
pub fn format_path(is_private: bool, indices: &[u32]) -> String {
    let mut out = String::from(if is_private { "m" } else { "M" });
    for &index in indices {
        out.push('/');
        if index & HARDENED_BIT != 0 {
            out.push_str(&(index & !HARDENED_BIT).to_string());
            out.push('\'');
        } else {
            out.push_str(&index.to_string());
        }
    }
    out
}

/// Infer a [`Purpose`] from a path's first (purpose) component, per
/// BIP-43/44/49/84: `44'` -> legacy, `49'` -> P2SH-P2WPKH, `84'` ->
/// native segwit. Any other (or absent) first component -- e.g. a raw
/// BIP-32 path with no purpose field -- defaults to [`Purpose::Bip32`].
pub fn purpose_from_path(indices: &[u32]) -> Purpose {
    match indices.first().map(|i| i & !HARDENED_BIT) {
        Some(49) => Purpose::Bip49,
        Some(84) => Purpose::Bip84,
        _ => Purpose::Bip32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_private_hardened_path() {
        let (is_private, indices) = parse_path("m/44'/0'/0'/0/5").unwrap();
        assert!(is_private);
        assert_eq!(
            indices,
            vec![44 | HARDENED_BIT, 0 | HARDENED_BIT, 0 | HARDENED_BIT, 0, 5]
        );
    }

    #[test]
    fn accepts_h_suffix_as_hardening() {
        let (_, indices) = parse_path("m/44h/0H/0'/0/1").unwrap();
        assert_eq!(indices[0], 44 | HARDENED_BIT);
        assert_eq!(indices[1], 0 | HARDENED_BIT);
        assert_eq!(indices[2], 0 | HARDENED_BIT);
    }

    #[test]
    fn public_root_is_recognized() {
        let (is_private, indices) = parse_path("M/0/1").unwrap();
        assert!(!is_private);
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn bare_m_is_the_empty_path() {
        let (is_private, indices) = parse_path("m").unwrap();
        assert!(is_private);
        assert!(indices.is_empty());
    }

    #[test]
    fn rejects_bad_root() {
        assert_eq!(parse_path("x/0").unwrap_err(), PathError::BadRoot);
    }

    #[test]
    fn rejects_non_numeric_component() {
        assert_eq!(
            parse_path("m/foo").unwrap_err(),
            PathError::BadComponent("foo".to_string())
        );
    }

    #[test]
    fn rejects_index_too_large() {
        assert_eq!(
            parse_path("m/2147483648").unwrap_err(),
            PathError::OutOfRange("2147483648".to_string())
        );
    }

    #[test]
    fn format_roundtrips_parse() {
        let (is_private, indices) = parse_path("m/49'/0'/0'/1/3").unwrap();
        assert_eq!(format_path(is_private, &indices), "m/49'/0'/0'/1/3");
    }

    #[test]
    fn purpose_inference_matches_bip43_registry() {
        assert_eq!(purpose_from_path(&[44 | HARDENED_BIT]), Purpose::Bip32);
        assert_eq!(purpose_from_path(&[49 | HARDENED_BIT]), Purpose::Bip49);
        assert_eq!(purpose_from_path(&[84 | HARDENED_BIT]), Purpose::Bip84);
        assert_eq!(purpose_from_path(&[]), Purpose::Bip32);
        assert_eq!(purpose_from_path(&[1]), Purpose::Bip32);
    }
}
