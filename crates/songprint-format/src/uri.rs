//! Base64 data-uri projection of the binary container.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::Result;

/// Prefix of every signature uri.
pub const URI_PREFIX: &str = "data:audio/vnd.shazam.sig;base64,";

/// Wrap container bytes in a data uri with standard padded base64.
pub fn encode_uri(bytes: &[u8]) -> String {
    let mut uri = String::with_capacity(URI_PREFIX.len() + bytes.len().div_ceil(3) * 4);
    uri.push_str(URI_PREFIX);
    STANDARD.encode_string(bytes, &mut uri);
    uri
}

/// Recover container bytes from a data uri or a bare base64 payload.
pub fn decode_uri(uri: &str) -> Result<Vec<u8>> {
    let payload = uri.strip_prefix(URI_PREFIX).unwrap_or(uri);
    Ok(STANDARD.decode(payload.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn test_prefix_and_padding() {
        let uri = encode_uri(&[0x80, 0x25, 0xFE, 0xCA, 0x01]);
        assert_eq!(uri, "data:audio/vnd.shazam.sig;base64,gCX+ygE=");
    }

    #[test]
    fn test_decode_accepts_bare_payload() {
        let bytes = vec![1, 2, 3, 4, 5, 6, 7];
        let uri = encode_uri(&bytes);
        let bare = uri.strip_prefix(URI_PREFIX).unwrap();

        assert_eq!(decode_uri(&uri).unwrap(), bytes);
        assert_eq!(decode_uri(bare).unwrap(), bytes);
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        assert!(matches!(
            decode_uri("data:audio/vnd.shazam.sig;base64,not*base64"),
            Err(FormatError::InvalidUri(_))
        ));
    }
}
