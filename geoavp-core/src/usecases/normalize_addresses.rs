use lazy_static::lazy_static;
use regex::Regex;

use geoavp_entities::record::Record;

/// The literal token denoting a street intersection ("x y z").
pub const INTERSECTION_MARKER: &str = " y ";

const PROVINCE_SUFFIX: &str = ", santa fe, argentina";
const DEFAULT_CITY_SUFFIX: &str = ", rosario, santa fe, argentina";

/// Plain-token hints for Gran Rosario localities outside the default
/// city. Applied in order, before the street rules.
struct CityRule {
    token: &'static str,
    city: &'static str,
}

const CITY_RULES: &[CityRule] = &[
    CityRule {
        token: "vgg",
        city: "villa gobernador galvez",
    },
    CityRule {
        token: "luis palacios",
        city: "luis palacios",
    },
    CityRule {
        token: "casilda",
        city: "casilda",
    },
    CityRule {
        token: "funes",
        city: "funes",
    },
    CityRule {
        token: "roldan",
        city: "roldan",
    },
    CityRule {
        token: "soldini",
        city: "soldini",
    },
];

/// One canonicalization rule for a well-known avenue/boulevard with
/// common misspellings and abbreviations. Ordered from most to least
/// specific; replacements are lower-case and carry a trailing space
/// that the whitespace collapse cleans up.
struct StreetRule {
    pattern: Regex,
    canonical: &'static str,
}

macro_rules! street_rule {
    ($pattern:literal, $canonical:literal) => {
        StreetRule {
            pattern: Regex::new(concat!("(?i)", $pattern)).expect("valid street rule pattern"),
            canonical: $canonical,
        }
    };
}

lazy_static! {
    static ref STREET_RULES: Vec<StreetRule> = vec![
        street_rule!(r"circun\w*\s?", "avenida de circunvalación 25 de mayo "),
        street_rule!(r"(av\w*\s)?27 de feb\w*\s?", "bulevar 27 de febrero "),
        street_rule!(r"(bulevar\w*\s)?(bv)?(av\w*\s)?oroño\s?", "bulevar nicasio oroño "),
        street_rule!(
            r"(bulevar\w*\s)?(bv)?(av\w*\s)?rond\w*\s?",
            "bulevar general josé rondeau "
        ),
        street_rule!(r"(av\w*\s)?uriburu\s?", "avenida josé uriburu "),
        street_rule!(r"(av\w*\s)?san mart\w*\s?", "avenida josé de san martín "),
        street_rule!(r"(ovidio\s)?lagos\s?", "avenida ovidio lagos "),
        street_rule!(r"(av\w*\s)?pel(l)?egrini\s?", "avenida carlos pellegrini "),
        street_rule!(r"(av\w*\s)?francia\s?", "avenida francia "),
        street_rule!(r"(av\w*\s)?godoy\s?", "avenida presidente perón "),
        street_rule!(r"colectora\s?", "colectora juan pablo ii "),
        street_rule!(r"a(0)?(o)?(\s)?12", "ruta nacional a012 "),
        street_rule!(r"b(\w*)?\s*(y)?\s*ordoñez", "avenida battle y ordoñez "),
    ];
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    /// Canonical lower-case geocoding query.
    pub query: String,
    /// False when a city rule matched and the query already carries a
    /// non-Rosario suffix.
    pub default_city: bool,
}

/// Rewrites a raw address into a canonical query string.
///
/// Idempotent: normalizing an already-normalized address yields the
/// same string, and exactly one city suffix is ever appended.
pub fn normalize_address(raw: &str) -> NormalizedAddress {
    let mut addr = raw.to_lowercase();
    let mut default_city = true;

    for rule in CITY_RULES {
        let suffix = format!(", {}{}", rule.city, PROVINCE_SUFFIX);
        if addr.ends_with(&suffix) {
            // Already carries this city's suffix from a previous run.
            default_city = false;
            continue;
        }
        if addr.contains(rule.token) {
            addr = addr
                .replace('-', "")
                .replace(rule.token, "")
                .trim()
                .to_owned();
            addr.push_str(&suffix);
            default_city = false;
        }
    }

    // Stray reference markers and the "/" intersection shorthand.
    addr = addr.replace("ref ", "");
    addr = addr.replace('/', INTERSECTION_MARKER);

    for rule in STREET_RULES.iter() {
        if addr.contains(rule.canonical.trim_end()) {
            continue;
        }
        addr = rule.pattern.replace_all(&addr, rule.canonical).into_owned();
    }

    addr = WHITESPACE.replace_all(&addr, " ").trim().to_owned();

    if default_city && !addr.ends_with(DEFAULT_CITY_SUFFIX) {
        addr.push_str(DEFAULT_CITY_SUFFIX);
    }

    NormalizedAddress {
        query: addr,
        default_city,
    }
}

/// Sets the normalized query on every record that carries an address.
/// Records without one are left untouched (they bypass geocoding).
pub fn normalize_records(records: &mut [Record]) {
    for record in records.iter_mut().filter(|r| r.has_address()) {
        let raw = record.raw_address.as_deref().unwrap_or_default();
        let normalized = normalize_address(raw);
        log::debug!("Normalized {}: {:?} -> {}", record.id, raw, normalized.query);
        record.query = Some(normalized.query);
    }
}

pub fn contains_intersection(query: &str) -> bool {
    query.contains(INTERSECTION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoavp_entities::record::RecordId;

    #[test]
    fn default_city_suffix() {
        let n = normalize_address("san martin 123");
        assert_eq!(
            n.query,
            "avenida josé de san martín 123, rosario, santa fe, argentina"
        );
        assert!(n.default_city);
    }

    #[test]
    fn city_rule_skips_default_suffix() {
        let n = normalize_address("vgg - belgrano 45");
        assert_eq!(
            n.query,
            "belgrano 45, villa gobernador galvez, santa fe, argentina"
        );
        assert!(!n.default_city);
    }

    #[test]
    fn exactly_one_city_suffix() {
        for raw in [
            "san martin 123",
            "vgg - belgrano 45",
            "casilda - mitre 200",
            "pelegrini 1500",
            "circunvalacion y uriburu",
        ] {
            let query = normalize_address(raw).query;
            let suffixes = query.matches(PROVINCE_SUFFIX).count();
            assert_eq!(suffixes, 1, "{query:?}");
        }
    }

    #[test]
    fn idempotent() {
        for raw in [
            "san martin 123",
            "vgg - belgrano 45",
            "ref godoy 99",
            "oroño / 27 de febrero",
            "bv rondeau 3500",
            "a012 km 12",
            "luis palacios - ruta 34",
        ] {
            let once = normalize_address(raw).query;
            let twice = normalize_address(&once).query;
            assert_eq!(once, twice, "raw = {raw:?}");
        }
    }

    #[test]
    fn slash_becomes_intersection() {
        let n = normalize_address("oroño / 27 de febrero");
        assert_eq!(
            n.query,
            "bulevar nicasio oroño y bulevar 27 de febrero, rosario, santa fe, argentina"
        );
        assert!(contains_intersection(&n.query));
    }

    #[test]
    fn reference_marker_is_dropped() {
        let n = normalize_address("ref francia 4200");
        assert_eq!(n.query, "avenida francia 4200, rosario, santa fe, argentina");
    }

    #[test]
    fn misspellings_are_canonicalized() {
        assert_eq!(
            normalize_address("pelegrini 1500").query,
            "avenida carlos pellegrini 1500, rosario, santa fe, argentina"
        );
        assert_eq!(
            normalize_address("av godoy 2300").query,
            "avenida presidente perón 2300, rosario, santa fe, argentina"
        );
        assert_eq!(
            normalize_address("ao 12 km 5").query,
            "ruta nacional a012 km 5, rosario, santa fe, argentina"
        );
    }

    #[test]
    fn whitespace_is_collapsed() {
        let n = normalize_address("  mendoza   3400 ");
        assert_eq!(n.query, "mendoza 3400, rosario, santa fe, argentina");
    }

    #[test]
    fn records_without_address_are_skipped() {
        let id: RecordId = "2306001".parse().unwrap();
        let mut records = vec![
            Record::new(id.clone(), None),
            Record::new("2306002".parse().unwrap(), Some("san martin 123".into())),
        ];
        normalize_records(&mut records);
        assert!(records[0].query.is_none());
        assert!(records[1]
            .query
            .as_deref()
            .unwrap()
            .starts_with("avenida josé de san martín 123"));
    }
}
