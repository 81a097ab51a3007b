//! Static ECO code → opening name lookup.

/// Opening names for the ECO codes most commonly seen in club play.
/// Used as a fallback when a PGN carries no usable Opening header.
const ECO_OPENINGS: &[(&str, &str)] = &[
    ("A00", "Uncommon Opening"),
    ("A01", "Nimzo-Larsen Attack"),
    ("A10", "English Opening"),
    ("A13", "English Opening: Neo-Catalan"),
    ("A22", "English Opening: Carls-Bremen System"),
    ("A44", "Old Benoni Defense"),
    ("A45", "Trompowsky Attack"),
    ("B01", "Scandinavian Defense"),
    ("B06", "Modern Defense"),
    ("B08", "Pirc Defense"),
    ("B12", "Caro-Kann Defense"),
    ("B15", "Caro-Kann Defense: Forgacs Variation"),
    ("B22", "Sicilian Defense: Alapin Variation"),
    ("B23", "Sicilian Defense: Closed"),
    ("B56", "Sicilian Defense: Accelerated Dragon"),
    ("C28", "Vienna Game"),
    ("C41", "Philidor Defense"),
    ("C55", "Italian Game"),
];

/// Look up the static name for an ECO code.
pub fn lookup(eco: &str) -> Option<&'static str> {
    ECO_OPENINGS
        .iter()
        .find(|(code, _)| *code == eco)
        .map(|(_, name)| *name)
}

/// Resolve a display name for an opening.
///
/// Preference order: the game's own Opening header (unless it is the
/// literal "Unknown Opening" placeholder), then the static ECO table,
/// then a synthesized "ECO {code} unknown" name.
pub fn opening_name(eco: &str, header_opening: Option<&str>) -> String {
    match header_opening {
        Some(name) if !name.is_empty() && name != "Unknown Opening" => name.to_string(),
        _ => lookup(eco)
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("ECO {eco} unknown")),
    }
}
