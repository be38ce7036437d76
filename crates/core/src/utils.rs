use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HyphenatedUUID(pub u128);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed uuid")]
pub struct InvalidUuid;

impl fmt::Display for HyphenatedUUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hex = format!("{:032x}", self.0);
        hex.insert(8, '-');
        hex.insert(13, '-');
        hex.insert(18, '-');
        hex.insert(23, '-');
        f.write_str(&hex)
    }
}

impl FromStr for HyphenatedUUID {
    type Err = InvalidUuid;

    /// Accepts the canonical 8-4-4-4-12 form or 32 bare hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = match s.len() {
            32 => s.to_string(),
            36 => {
                let hyphens_in_place = s
                    .char_indices()
                    .filter(|&(_, c)| c == '-')
                    .map(|(i, _)| i)
                    .eq([8, 13, 18, 23]);
                if !hyphens_in_place {
                    return Err(InvalidUuid);
                }
                s.replace('-', "")
            }
            _ => return Err(InvalidUuid),
        };
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidUuid);
        }
        u128::from_str_radix(&hex, 16)
            .map(HyphenatedUUID)
            .map_err(|_| InvalidUuid)
    }
}

/// The UUID an offline-mode server assigns to `username`.
pub fn offline_uuid(username: &str) -> u128 {
    u128::from_be_bytes(md5::compute(format!("OfflinePlayer:{}", username)).0)
        // Encode version and varient into uuid
        & (!(0xC << 60) & !(0xF << 76))
        | ((0x8 << 60) | (0x3 << 76))
}
