/// Something that can report a default AWS region.
pub trait RegionSource {
    fn configured_region(&self) -> Option<String>;
}

/// Placeholder some shells and wrappers pass through for an unset value.
const UNSET_PLACEHOLDER: &str = "None";

/// Pick the explicit region when usable, otherwise ask `source`.
pub fn resolve_region(explicit: Option<&str>, source: &impl RegionSource) -> Option<String> {
    if let Some(region) = explicit {
        let trimmed = region.trim();
        if !trimmed.is_empty() && trimmed != UNSET_PLACEHOLDER {
            return Some(region.to_string());
        }
    }
    let configured = source
        .configured_region()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    match &configured {
        Some(region) => tracing::debug!(%region, "using configured default region"),
        None => tracing::debug!("no default region configured"),
    }
    configured
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeSource {
        answer: Option<&'static str>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn new(answer: Option<&'static str>) -> Self {
            Self {
                answer,
                calls: Cell::new(0),
            }
        }
    }

    impl RegionSource for FakeSource {
        fn configured_region(&self) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.answer.map(str::to_string)
        }
    }

    #[test]
    fn explicit_region_skips_lookup() {
        let source = FakeSource::new(Some("eu-west-2"));
        assert_eq!(
            resolve_region(Some("us-east-1"), &source).as_deref(),
            Some("us-east-1")
        );
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn falls_back_to_configured_region() {
        let source = FakeSource::new(Some("eu-west-2\n"));
        assert_eq!(resolve_region(None, &source).as_deref(), Some("eu-west-2"));
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn failed_lookup_yields_nothing() {
        let source = FakeSource::new(None);
        assert_eq!(resolve_region(None, &source), None);
    }

    #[test]
    fn empty_and_placeholder_explicit_values_are_ignored() {
        let source = FakeSource::new(Some("ap-south-1"));
        assert_eq!(resolve_region(Some("  "), &source).as_deref(), Some("ap-south-1"));
        assert_eq!(resolve_region(Some("None"), &source).as_deref(), Some("ap-south-1"));
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn blank_configured_region_is_nothing() {
        let source = FakeSource::new(Some("   "));
        assert_eq!(resolve_region(None, &source), None);
    }
}
