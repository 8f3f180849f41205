//! Category filtering over a fixed collection of gallery items.
//!
//! The project grid shows one category at a time. [`FilterSet`] holds the
//! full, ordered collection and answers "which items carry this tag?";
//! [`FilterState`] is the single active tag; [`FilteredGallery`] ties the two
//! to an [`IndexNavigator`] so that switching tabs always restarts navigation
//! at the first visible item.

use crate::navigator::IndexNavigator;

/// Anything that carries exactly one category tag.
pub trait Categorized {
    fn category(&self) -> &str;
}

/// A fixed, ordered collection partitioned by category tag.
#[derive(Debug, Clone)]
pub struct FilterSet<T> {
    items: Vec<T>,
}

impl<T: Categorized> FilterSet<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Items whose category equals `tag`, in source order.
    ///
    /// An empty or unknown tag yields an empty sequence.
    pub fn filter(&self, tag: &str) -> Vec<&T> {
        self.items.iter().filter(|i| i.category() == tag).collect()
    }

    /// Number of items matching `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.items.iter().filter(|i| i.category() == tag).count()
    }

    /// Distinct tags present in the collection, in order of first appearance.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            let tag = item.category();
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        seen
    }
}

/// The single active category tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    active: String,
}

impl FilterState {
    pub fn new(active: impl Into<String>) -> Self {
        Self {
            active: active.into(),
        }
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    /// Returns true when the tag actually changed.
    pub fn set(&mut self, tag: &str) -> bool {
        if self.active == tag {
            return false;
        }
        self.active = tag.to_string();
        true
    }
}

/// A [`FilterSet`] viewed through one active tag, with a navigator over the
/// visible subsequence.
#[derive(Debug)]
pub struct FilteredGallery<'a, T> {
    set: &'a FilterSet<T>,
    state: FilterState,
    navigator: IndexNavigator,
}

impl<'a, T: Categorized> FilteredGallery<'a, T> {
    pub fn new(set: &'a FilterSet<T>, initial: &str) -> Self {
        Self {
            set,
            state: FilterState::new(initial),
            navigator: IndexNavigator::new(set.count(initial)),
        }
    }

    /// Switch the active tag. The navigator is rebound to the new subset and
    /// always restarts at 0, even when the tag is unchanged.
    pub fn select(&mut self, tag: &str) {
        self.state.set(tag);
        self.navigator.rebind(self.set.count(tag));
    }

    pub fn active(&self) -> &str {
        self.state.active()
    }

    pub fn visible(&self) -> Vec<&'a T> {
        self.set.filter(self.state.active())
    }

    /// The item under the navigator, if the active subset is non-empty.
    pub fn current(&self) -> Option<&'a T> {
        self.visible().get(self.navigator.position()).copied()
    }

    pub fn navigator(&self) -> &IndexNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut IndexNavigator {
        &mut self.navigator
    }
}
