/// Every property key a record may carry, sorted for binary search.
///
/// Root, game-info, move, setup, and the common annotation, markup and
/// timing keys. Anything else is rejected.
const KNOWN_KEYS: &[&str] = &[
    "AB", "AE", "AN", "AP", "AR", "AW", "B", "BL", "BM", "BR", "BT", "C", "CA", "CP", "CR", "DD",
    "DM", "DO", "DT", "EV", "FF", "FG", "GB", "GC", "GM", "GN", "GW", "HA", "HO", "IT", "KM",
    "KO", "LB", "LN", "MA", "MN", "N", "OB", "OH", "OT", "OW", "PB", "PC", "PL", "PM", "PW", "RE",
    "RO", "RU", "SL", "SO", "SQ", "ST", "SZ", "TB", "TE", "TM", "TR", "TW", "UC", "US", "V", "VW",
    "W", "WL", "WR", "WT",
];

pub fn is_known(key: &str) -> bool {
    KNOWN_KEYS.binary_search(&key).is_ok()
}

/// Keys whose values are points to be placed before play starts.
pub fn is_setup(key: &str) -> bool {
    matches!(key, "AB" | "AW")
}

pub fn is_move(key: &str) -> bool {
    matches!(key, "B" | "W")
}
