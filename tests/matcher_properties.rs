use std::collections::HashSet;

use proptest::prelude::*;
use logwait::PatternTable;

// Small alphabet so that patterns actually occur inside generated lines.
fn word() -> impl Strategy<Value = String> {
    "[abc]{1,3}"
}

fn patterns_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(word(), 1..6).prop_map(|raw| {
        // Keys must be disjoint; keep the first occurrence of each.
        let mut seen = HashSet::new();
        raw.into_iter().filter(|p| seen.insert(p.clone())).collect()
    })
}

proptest! {
    #[test]
    fn match_line_returns_first_matching_pattern_in_declaration_order(
        patterns in patterns_strategy(),
        line in "[abc ]{0,12}",
    ) {
        let mut table = PatternTable::new();
        for (i, p) in patterns.iter().enumerate() {
            table = table.literal(p.clone(), i).unwrap();
        }

        let expected = patterns.iter().position(|p| line.contains(p.as_str()));
        prop_assert_eq!(table.match_line(&line).copied(), expected);
    }

    #[test]
    fn scan_agrees_with_matching_line_by_line(
        patterns in patterns_strategy(),
        lines in proptest::collection::vec("[abc ]{0,8}", 0..10),
    ) {
        let mut table = PatternTable::new();
        for (i, p) in patterns.iter().enumerate() {
            table = table.literal(p.clone(), i).unwrap();
        }

        let expected = lines.iter().find_map(|l| table.match_line(l).copied());
        prop_assert_eq!(table.scan(lines.clone()).copied(), expected);
    }
}
