use crate::error::TypesError;
use std::fmt;
use std::str::FromStr;

/// 20-byte opaque member identity.
/// Display format: Bech32m with "agora" human-readable prefix.
///
/// Identities are globally unique principals; the ledger never interprets
/// them beyond equality. When derived from a key,
/// `id = blake3(pubkey)[0..20]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MemberId([u8; 20]);

impl MemberId {
    pub const ZERO: Self = Self([0u8; 20]);
    pub const LEN: usize = 20;

    /// Bech32m human-readable prefix
    pub const BECH32_HRP: &'static str = "agora";

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Create from a byte slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, TypesError> {
        if slice.len() != Self::LEN {
            return Err(TypesError::InvalidIdLength(slice.len()));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Derive an identity from 32 bytes of public key material.
    /// Uses blake3, takes the first 20 bytes.
    pub fn from_public_key(pubkey: &[u8; 32]) -> Self {
        let hash = blake3::hash(pubkey);
        let mut id = [0u8; 20];
        id.copy_from_slice(&hash.as_bytes()[..20]);
        Self(id)
    }

    /// Check if this is the zero identity
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    /// Convert to hex string without 0x prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hrp = bech32::Hrp::parse_unchecked(Self::BECH32_HRP);
        match bech32::encode::<bech32::Bech32m>(hrp, &self.0) {
            Ok(encoded) => write!(f, "{}", encoded),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId(0x{})", hex::encode(self.0))
    }
}

impl FromStr for MemberId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Support both Bech32m ("agora1...") and hex ("0x...")
        if s.starts_with("agora1") {
            let (hrp, data) =
                bech32::decode(s).map_err(|e| TypesError::Bech32Error(e.to_string()))?;

            let expected_hrp = bech32::Hrp::parse_unchecked(Self::BECH32_HRP);
            if hrp != expected_hrp {
                return Err(TypesError::InvalidIdFormat(format!(
                    "Invalid HRP: expected '{}', got '{}'",
                    Self::BECH32_HRP,
                    hrp
                )));
            }

            Self::from_slice(&data)
        } else if s.starts_with("0x") || s.starts_with("0X") {
            let bytes = hex::decode(&s[2..])?;
            Self::from_slice(&bytes)
        } else {
            let bytes = hex::decode(s)?;
            Self::from_slice(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice() {
        let id = MemberId::from_slice(&[7u8; 20]).unwrap();
        assert_eq!(id.as_bytes(), &[7u8; 20]);

        assert!(MemberId::from_slice(&[0u8; 19]).is_err());
        assert!(MemberId::from_slice(&[0u8; 21]).is_err());
    }

    #[test]
    fn test_bech32_round_trip() {
        let id = MemberId::from_bytes([42u8; 20]);
        let encoded = id.to_string();
        assert!(encoded.starts_with("agora1"));

        let decoded = MemberId::from_str(&encoded).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn test_hex_round_trip() {
        let id = MemberId::from_bytes([0xab; 20]);
        let hex = format!("0x{}", id.to_hex());
        let decoded = MemberId::from_str(&hex).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn test_from_public_key_is_deterministic() {
        let a = MemberId::from_public_key(&[1u8; 32]);
        let b = MemberId::from_public_key(&[1u8; 32]);
        let c = MemberId::from_public_key(&[2u8; 32]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_zero());
    }

    #[test]
    fn test_zero() {
        assert!(MemberId::ZERO.is_zero());
        assert!(!MemberId::from_bytes([1u8; 20]).is_zero());
    }
}
