//! UUID and MAC address helpers.

use anyhow::{Context, Result};
use rand::Rng;
use uuid::Uuid;

/// Default OUI prefix for generated MAC addresses (Xensource, Inc.).
pub const DEFAULT_OUI: [u8; 3] = [0x00, 0x16, 0x3e];

/// Generate a random RFC 4122 version-4 UUID in hyphenated form.
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Check whether a string parses as a UUID.
pub fn validate_uuid(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}

/// Re-render a UUID in canonical lowercase hyphenated form.
pub fn normalize_uuid(value: &str) -> Result<String> {
    let uuid = Uuid::parse_str(value).with_context(|| format!("invalid UUID '{}'", value))?;
    Ok(uuid.to_string())
}

/// Generate a random unicast MAC address under the given OUI prefix.
///
/// The first random byte is masked to 7 bits, keeping the generated
/// range clear of reserved suffixes.
pub fn generate_mac(oui: Option<[u8; 3]>) -> String {
    let oui = oui.unwrap_or(DEFAULT_OUI);
    let mut rng = rand::thread_rng();
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        oui[0],
        oui[1],
        oui[2],
        rng.gen_range(0x00..=0x7fu8),
        rng.gen::<u8>(),
        rng.gen::<u8>()
    )
}

/// Check whether a string is a colon-separated MAC address.
pub fn validate_mac(value: &str) -> bool {
    let groups: Vec<&str> = value.trim().split(':').collect();
    groups.len() == 6
        && groups
            .iter()
            .all(|group| group.len() == 2 && group.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Re-render a MAC address in lowercase colon-separated form.
pub fn normalize_mac(value: &str) -> Result<String> {
    let normalized = value.trim().to_ascii_lowercase();
    if !validate_mac(&normalized) {
        anyhow::bail!("invalid MAC address '{}'", value);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_generate() {
        let uuid = generate_uuid();
        assert!(validate_uuid(&uuid));
        assert_eq!(uuid.len(), 36);
        assert_eq!(uuid.matches('-').count(), 4);
    }

    #[test]
    fn test_uuid_normalize() {
        let uuid = normalize_uuid("01234567-abcd-ef01-2345-deadbeaff00d").unwrap();
        assert_eq!(uuid, "01234567-abcd-ef01-2345-deadbeaff00d");
        // uppercase input comes back canonical lowercase
        let uuid = normalize_uuid("01234567-ABCD-EF01-2345-DEADBEAFF00D").unwrap();
        assert_eq!(uuid, "01234567-abcd-ef01-2345-deadbeaff00d");
    }

    #[test]
    fn test_uuid_validate_rejects_garbage() {
        assert!(!validate_uuid("not a uuid"));
        assert!(normalize_uuid("not a uuid").is_err());
    }

    #[test]
    fn test_mac_generate_default_oui() {
        let mac = generate_mac(None);
        assert!(validate_mac(&mac));
        assert_eq!(mac.len(), 17);
        assert_eq!(mac.matches(':').count(), 5);
        assert!(mac.starts_with("00:16:3e"));
    }

    #[test]
    fn test_mac_generate_custom_oui() {
        let mac = generate_mac(Some([0x12, 0x34, 0x56]));
        assert!(validate_mac(&mac));
        assert!(mac.starts_with("12:34:56"));
    }

    #[test]
    fn test_mac_fourth_byte_is_masked() {
        for _ in 0..64 {
            let mac = generate_mac(None);
            let fourth = u8::from_str_radix(&mac[9..11], 16).unwrap();
            assert!(fourth <= 0x7f);
        }
    }

    #[test]
    fn test_mac_validate_rejects_garbage() {
        assert!(!validate_mac("not a mac"));
        assert!(!validate_mac("00:16:3e:aa:bb"));
        assert!(!validate_mac("00:16:3e:aa:bb:cc:dd"));
        assert!(!validate_mac("00:16:3g:aa:bb:cc"));
    }

    #[test]
    fn test_mac_normalize() {
        assert_eq!(
            normalize_mac(" 00:16:3E:AA:BB:CC ").unwrap(),
            "00:16:3e:aa:bb:cc"
        );
        assert!(normalize_mac("bogus").is_err());
    }
}
