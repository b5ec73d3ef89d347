//! Import and require target extraction.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::patterns::Patterns;

/// Reference targets of a single file, usually only a handful.
pub type References = SmallVec<[String; 4]>;

/// Collects string targets of static imports, `require` calls and dynamic
/// imports.
///
/// Targets are deduplicated, keeping the first occurrence. Static imports are
/// collected first, then `require` calls, then dynamic imports.
#[must_use]
pub fn extract_reference_targets(patterns: &Patterns, text: &str) -> References {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut targets = References::new();

    for pattern in &patterns.references {
        for caps in pattern.captures_iter(text) {
            let Some(target) = caps.get(1) else {
                continue;
            };
            if seen.insert(target.as_str()) {
                targets.push(target.as_str().to_owned());
            }
        }
    }

    targets
}
