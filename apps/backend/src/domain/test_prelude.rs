// Proptest configuration shared by the domain property tests.
//
// PROPTEST_CASES overrides the case count (project default 8).

use proptest::prelude::ProptestConfig;

pub fn proptest_config() -> ProptestConfig {
    let base = ProptestConfig::default();
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(8)
        .max(1);

    ProptestConfig {
        failure_persistence: None,
        cases,
        ..base
    }
}
