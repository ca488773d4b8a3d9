//! Validated transaction signatures.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

/// Length in bytes of a decoded ed25519 transaction signature.
pub const SIGNATURE_BYTES: usize = 64;

/// A base58 transaction signature known to decode to [`SIGNATURE_BYTES`].
///
/// The original string is kept as-is so it can be echoed back to the RPC.
///
/// # Example
///
/// ```rust
/// use clusterpulse_types::TransactionSignature;
///
/// assert!("not-a-signature".parse::<TransactionSignature>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct TransactionSignature(String);

impl TransactionSignature {
    /// The signature as base58 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first ten characters followed by an ellipsis, for compact display.
    pub fn abbreviated(&self) -> String {
        let mut short: String = self.0.chars().take(10).collect();
        short.push('…');
        short
    }
}

impl FromStr for TransactionSignature {
    type Err = ParseSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| ParseSignatureError::NotBase58)?;

        if bytes.len() != SIGNATURE_BYTES {
            return Err(ParseSignatureError::WrongLength(bytes.len()));
        }

        Ok(Self(String::from(s)))
    }
}

impl TryFrom<String> for TransactionSignature {
    type Error = ParseSignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionSignature> for String {
    fn from(signature: TransactionSignature) -> Self {
        signature.0
    }
}

impl fmt::Display for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a string is not a valid transaction signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseSignatureError {
    /// The string contains characters outside the base58 alphabet.
    NotBase58,
    /// The string decodes, but not to a 64-byte signature.
    WrongLength(usize),
}

impl fmt::Display for ParseSignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSignatureError::NotBase58 => f.write_str("signature is not valid base58"),
            ParseSignatureError::WrongLength(len) => write!(
                f,
                "signature decodes to {} bytes, expected {}",
                len, SIGNATURE_BYTES
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseSignatureError {}
