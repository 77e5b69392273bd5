//! Display names and colours for allocation categories.

/// Label of the idle (undeployed) allocation point.
pub const NOT_INVESTED: &str = "Not invested";

/// Label used when a market has no identifier at all.
pub const UNKNOWN_VAULT: &str = "Unknown Vault";

/// Protocol tokens whose brand is not their title-cased token.
const BRANDS: &[(&str, &str)] = &[("extra", "Extra Finance")];

/// Chart palette. Indexed by name hash, so colours repeat past its length.
pub const PALETTE: &[&str] = &[
    "#5dcf46", "#2f80ed", "#f2994a", "#9b51e0", "#eb5757", "#27ae60", "#f2c94c", "#56ccf2",
    "#bb6bd9", "#219653", "#e2b93b", "#2d9cdb", "#ff7a59", "#6fcf97", "#b83280", "#4c51bf",
    "#ed8936", "#38b2ac", "#d53f8c", "#718096",
];

/// Decode an allocation-point identifier into a display name.
///
/// * `protocol_strategy_asset` becomes `"{Brand} {strategy} {asset}"`
/// * `protocol_asset` becomes `"{Brand} {asset}"`
/// * [`NOT_INVESTED`] passes through
/// * anything else gets its first character capitalised
pub fn display_name(h_vault_id: &str) -> String {
    if h_vault_id == NOT_INVESTED {
        return h_vault_id.to_string();
    }

    let parts: Vec<&str> = h_vault_id.split('_').collect();
    match parts.as_slice() {
        [protocol, strategy, asset] => format!("{} {strategy} {asset}", brand(protocol)),
        [protocol, asset] => format!("{} {asset}", brand(protocol)),
        _ => capitalize_first(h_vault_id),
    }
}

/// Name for a market that has no matching allocation point.
pub fn fallback_name(market_id: Option<&str>) -> String {
    match market_id {
        Some(id) => format!("Vault {}...", id.chars().take(6).collect::<String>()),
        None => UNKNOWN_VAULT.to_string(),
    }
}

/// Stable colour for a category name.
///
/// FNV-1a over the UTF-8 bytes, so the mapping does not depend on the
/// process, platform or toolchain.
pub fn color_for(name: &str) -> &'static str {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    let hash = name
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME));

    PALETTE[(hash % PALETTE.len() as u64) as usize]
}

fn brand(protocol: &str) -> String {
    BRANDS
        .iter()
        .find(|(token, _)| token.eq_ignore_ascii_case(protocol))
        .map_or_else(|| title_case(protocol), |(_, brand)| (*brand).to_string())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
