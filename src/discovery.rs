//! Peer discovery: advertising-data parsing and name matching.

use heapless::String;

use crate::config::DEVICE_NAME_CAPACITY;

/// AD type: shortened local name.
const AD_SHORT_NAME: u8 = 0x08;
/// AD type: complete local name.
const AD_COMPLETE_NAME: u8 = 0x09;

/// Iterator over `(ad_type, value)` structures in advertising data.
/// Stops at the first malformed or zero-length structure.
struct AdStructures<'a> {
    data: &'a [u8],
}

impl<'a> Iterator for AdStructures<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.data.split_first()?;
        let len = len as usize;
        if len == 0 || len > rest.len() {
            self.data = &[];
            return None;
        }
        let (structure, tail) = rest.split_at(len);
        self.data = tail;
        Some((structure[0], &structure[1..]))
    }
}

fn ad_structures(data: &[u8]) -> AdStructures<'_> {
    AdStructures { data }
}

/// Raw bytes of the complete (preferred) or shortened local name.
pub fn local_name(data: &[u8]) -> Option<&[u8]> {
    let mut short = None;
    for (ad_type, value) in ad_structures(data) {
        match ad_type {
            AD_COMPLETE_NAME => return Some(value),
            AD_SHORT_NAME if short.is_none() => short = Some(value),
            _ => {}
        }
    }
    short
}

/// Local name from advertisement data, or `"Unknown"`.
pub fn extract_device_name(data: &[u8]) -> String<DEVICE_NAME_CAPACITY> {
    let mut name = String::new();
    match local_name(data) {
        Some(bytes) => {
            for &b in bytes {
                if name.push(b as char).is_err() {
                    break;
                }
            }
        }
        None => {
            let _ = name.push_str("Unknown");
        }
    }
    name
}

/// Whether the advertiser's local name is exactly `wanted`.
pub fn peer_matches(data: &[u8], wanted: &str) -> bool {
    local_name(data) == Some(wanted.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ACCEPTOR_DEVICE_NAME;

    fn adv(structures: &[(u8, &[u8])]) -> std::vec::Vec<u8> {
        let mut out = std::vec::Vec::new();
        for (ad_type, value) in structures {
            out.push(value.len() as u8 + 1);
            out.push(*ad_type);
            out.extend_from_slice(value);
        }
        out
    }

    #[test]
    fn complete_name_wins_over_short() {
        let data = adv(&[
            (0x01, &[0x06]),
            (AD_SHORT_NAME, b"SPP_ACC"),
            (AD_COMPLETE_NAME, b"SPP_ACCEPTOR"),
        ]);
        assert_eq!(extract_device_name(&data).as_str(), "SPP_ACCEPTOR");
        assert!(peer_matches(&data, ACCEPTOR_DEVICE_NAME));
    }

    #[test]
    fn short_name_used_when_alone() {
        let data = adv(&[(AD_SHORT_NAME, b"SPP_ACC")]);
        assert_eq!(extract_device_name(&data).as_str(), "SPP_ACC");
        assert!(!peer_matches(&data, ACCEPTOR_DEVICE_NAME));
    }

    #[test]
    fn missing_name_is_unknown() {
        let data = adv(&[(0x01, &[0x06]), (0x03, &[0x9E, 0xCA])]);
        assert_eq!(extract_device_name(&data).as_str(), "Unknown");
        assert!(!peer_matches(&data, ACCEPTOR_DEVICE_NAME));
    }

    #[test]
    fn name_is_capped() {
        let long = [b'n'; 40];
        let data = adv(&[(AD_COMPLETE_NAME, &long)]);
        assert_eq!(extract_device_name(&data).len(), DEVICE_NAME_CAPACITY);
    }

    #[test]
    fn truncated_structure_stops_parsing() {
        // Length byte claims more than remains.
        let data = [0x05, AD_COMPLETE_NAME, b'S', b'P'];
        assert_eq!(extract_device_name(&data).as_str(), "Unknown");
        assert_eq!(extract_device_name(&[]).as_str(), "Unknown");
    }

    #[test]
    fn match_is_exact() {
        let data = adv(&[(AD_COMPLETE_NAME, b"SPP_ACCEPTOR2")]);
        assert!(!peer_matches(&data, ACCEPTOR_DEVICE_NAME));
    }
}
