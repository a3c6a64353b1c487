//! Ordered catalogue of every known implementation.
//!
//! Families register in a fixed order at a single assembly point (see [`crate::impls::builtin`]),
//! so an unfiltered run always reports implementations in the same order.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::descriptor::Descriptor;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate implementation slug: {0}")]
    DuplicateSlug(String),
}

/// Collects families during assembly; consumed by [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<Descriptor>,
    slugs: HashSet<&'static str>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one family's descriptors in declaration order.
    pub fn register(
        mut self,
        family: impl IntoIterator<Item = Descriptor>,
    ) -> Result<Self, RegistryError> {
        for d in family {
            if !self.slugs.insert(d.slug) {
                return Err(RegistryError::DuplicateSlug(d.slug.to_string()));
            }
            self.descriptors.push(d);
        }
        Ok(self)
    }

    pub fn build(self) -> Registry {
        debug!(implementations = self.descriptors.len(), "registry assembled");
        Registry {
            descriptors: self.descriptors,
        }
    }
}

/// Selection criteria for [`Registry::filter`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub task: Option<String>,
    pub slug: Option<String>,
    pub include_slow: bool,
}

impl Filter {
    pub fn matches(&self, d: &Descriptor) -> bool {
        (self.include_slow || !d.slow)
            && self.task.as_deref().map_or(true, |t| t == d.task)
            && self.slug.as_deref().map_or(true, |s| s == d.slug)
    }
}

/// Immutable once built.
#[derive(Debug)]
pub struct Registry {
    descriptors: Vec<Descriptor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Ordered sub-sequence matching `filter`. An empty result is left to the caller to judge.
    pub fn filter(&self, filter: &Filter) -> Vec<&Descriptor> {
        self.descriptors.iter().filter(|d| filter.matches(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::task;
    use crate::error::TransformError;
    use crate::frame::ArrayImage;

    fn noop(img: ArrayImage) -> Result<ArrayImage, TransformError> {
        Ok(img)
    }

    fn scenario() -> Registry {
        Registry::builder()
            .register([
                Descriptor::array(task::INVERT, "numpy-invert", "vectorized", noop),
                Descriptor::array(task::INVERT, "cv2-bitwise", "library", noop),
            ])
            .unwrap()
            .register([
                Descriptor::array(task::GRAYSCALE, "gray-fast", "vectorized", noop),
                Descriptor::array(task::INVERT, "naive-invert", "loops", noop).slow(),
            ])
            .unwrap()
            .build()
    }

    fn slugs(v: &[&Descriptor]) -> Vec<&'static str> {
        v.iter().map(|d| d.slug).collect()
    }

    #[test]
    fn test_default_filter_excludes_slow_and_keeps_order() {
        let reg = scenario();
        let picked = reg.filter(&Filter {
            task: Some(task::INVERT.to_string()),
            ..Default::default()
        });
        assert_eq!(slugs(&picked), ["numpy-invert", "cv2-bitwise"]);

        let all = reg.filter(&Filter::default());
        assert_eq!(slugs(&all), ["numpy-invert", "cv2-bitwise", "gray-fast"]);
    }

    #[test]
    fn test_three_slug_registry_default_filter() {
        let reg = Registry::builder()
            .register([
                Descriptor::array(task::INVERT, "numpy-invert", "vectorized", noop),
                Descriptor::array(task::INVERT, "cv2-bitwise", "library", noop),
                Descriptor::array(task::INVERT, "naive-invert", "loops", noop).slow(),
            ])
            .unwrap()
            .build();
        let picked = reg.filter(&Filter::default());
        assert_eq!(slugs(&picked), ["numpy-invert", "cv2-bitwise"]);
    }

    #[test]
    fn test_include_slow() {
        let reg = scenario();
        let picked = reg.filter(&Filter {
            include_slow: true,
            ..Default::default()
        });
        assert_eq!(
            slugs(&picked),
            ["numpy-invert", "cv2-bitwise", "gray-fast", "naive-invert"]
        );
    }

    #[test]
    fn test_slug_and_task_filters_commute() {
        let reg = scenario();
        let by_slug = reg.filter(&Filter {
            slug: Some("cv2-bitwise".into()),
            ..Default::default()
        });
        let both = reg.filter(&Filter {
            task: Some(task::INVERT.into()),
            slug: Some("cv2-bitwise".into()),
            ..Default::default()
        });
        assert_eq!(slugs(&by_slug), slugs(&both));

        let mismatched = reg.filter(&Filter {
            task: Some(task::GRAYSCALE.into()),
            slug: Some("cv2-bitwise".into()),
            ..Default::default()
        });
        assert!(mismatched.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let reg = scenario();
        let f = Filter {
            task: Some(task::INVERT.into()),
            ..Default::default()
        };
        let once = reg.filter(&f);
        let twice: Vec<&Descriptor> = once.iter().copied().filter(|d| f.matches(d)).collect();
        assert_eq!(slugs(&once), slugs(&twice));
    }

    #[test]
    fn test_unknown_slug_is_empty_not_error() {
        let reg = scenario();
        let picked = reg.filter(&Filter {
            slug: Some("nonexistent-slug".into()),
            include_slow: true,
            ..Default::default()
        });
        assert!(picked.is_empty());
    }

    #[test]
    fn test_duplicate_slug_rejected_at_assembly() {
        let err = Registry::builder()
            .register([Descriptor::array(task::INVERT, "dup", "a", noop)])
            .unwrap()
            .register([Descriptor::array(task::GRAYSCALE, "dup", "b", noop)])
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateSlug("dup".into()));
    }
}
