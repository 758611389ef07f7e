//! NBA conference and division membership by team abbreviation

const DIVISIONS: &[(&str, &str, &[&str])] = &[
    ("Eastern", "Atlantic", &["BOS", "BKN", "NYK", "PHI", "TOR"]),
    ("Eastern", "Central", &["CHI", "CLE", "DET", "IND", "MIL"]),
    ("Eastern", "Southeast", &["ATL", "CHA", "MIA", "ORL", "WAS"]),
    ("Western", "Northwest", &["DEN", "MIN", "OKC", "POR", "UTA"]),
    ("Western", "Pacific", &["GSW", "LAC", "LAL", "PHX", "SAC"]),
    ("Western", "Southwest", &["DAL", "HOU", "MEM", "NOP", "SAS"]),
];

fn lookup(abbreviation: &str) -> Option<(&'static str, &'static str)> {
    let abbr = abbreviation.trim().to_ascii_uppercase();
    DIVISIONS
        .iter()
        .find(|(_, _, teams)| teams.contains(&abbr.as_str()))
        .map(|(conference, division, _)| (*conference, *division))
}

/// "Eastern" or "Western"
pub fn conference_of(abbreviation: &str) -> Option<&'static str> {
    lookup(abbreviation).map(|(c, _)| c)
}

pub fn division_of(abbreviation: &str) -> Option<&'static str> {
    lookup(abbreviation).map(|(_, d)| d)
}

/// Every division name, in display order
pub fn divisions() -> impl Iterator<Item = &'static str> {
    DIVISIONS.iter().map(|(_, d, _)| *d)
}

pub fn team_count() -> usize {
    DIVISIONS.iter().map(|(_, _, teams)| teams.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conference_lookup() {
        assert_eq!(conference_of("CHI"), Some("Eastern"));
        assert_eq!(conference_of("lal"), Some("Western"));
        assert_eq!(conference_of("XYZ"), None);
    }

    #[test]
    fn test_division_lookup() {
        assert_eq!(division_of("CHI"), Some("Central"));
        assert_eq!(division_of("SAS"), Some("Southwest"));
    }

    #[test]
    fn test_thirty_teams() {
        assert_eq!(team_count(), 30);
        assert_eq!(divisions().count(), 6);
    }
}
