use std::collections::BTreeSet;

use serde::Deserialize;

/// Decides which tests also get a baseline run under the system allocator.
///
/// Tests listed in `custom_only` are only meaningful with the custom
/// allocator and are run through the wrapper alone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SubjectPolicy {
    custom_only: BTreeSet<String>,
}

impl Default for SubjectPolicy {
    fn default() -> Self {
        Self::custom_only(["test3", "test4", "test5"])
    }
}

impl SubjectPolicy {
    pub fn custom_only<I, S>(basenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SubjectPolicy {
            custom_only: basenames.into_iter().map(Into::into).collect(),
        }
    }

    /// Every test gets a baseline run.
    pub fn always_baseline() -> Self {
        SubjectPolicy {
            custom_only: BTreeSet::new(),
        }
    }

    pub fn requires_baseline(&self, basename: &str) -> bool {
        !self.custom_only.contains(basename)
    }
}
