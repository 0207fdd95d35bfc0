use std::cell::RefCell;
use std::rc::Rc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{PickerError, Result};

/// What happens when a color is added to a full palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Drop the new color.
    RejectNew,
    /// Drop the first entry and append the new color.
    #[default]
    EvictOldest,
    /// Overwrite the last entry with the new color.
    EvictNewest,
}

/// The maximum number of palette entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteCapacity {
    Unbounded,
    Bounded(usize),
}

impl PaletteCapacity {
    #[inline]
    pub fn is_full(&self, len: usize) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Bounded(max) => len >= *max,
        }
    }
}

impl TryFrom<i32> for PaletteCapacity {
    type Error = PickerError;

    /// `-1` is unbounded, any other negative value is rejected.
    fn try_from(value: i32) -> Result<Self> {
        match value {
            -1 => Ok(Self::Unbounded),
            0.. => Ok(Self::Bounded(value as usize)),
            _ => Err(PickerError::Configuration(format!(
                "palette capacity must be -1 or at least 0, got {value}"
            ))),
        }
    }
}

impl From<PaletteCapacity> for i32 {
    fn from(capacity: PaletteCapacity) -> Self {
        match capacity {
            PaletteCapacity::Unbounded => -1,
            PaletteCapacity::Bounded(max) => i32::try_from(max).unwrap_or(i32::MAX),
        }
    }
}

/// A palette shared by several pickers on the same thread.
///
/// Read when a picker is constructed and overwritten whenever one of the sharing pickers
/// changes its palette.
#[derive(Clone, Debug, Default)]
pub struct SharedPalette(Rc<RefCell<Vec<Color>>>);

impl SharedPalette {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Self(Rc::new(RefCell::new(colors.into_iter().collect())))
    }

    pub fn snapshot(&self) -> Vec<Color> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn replace(&self, colors: &[Color]) {
        let mut shared = self.0.borrow_mut();
        shared.clear();
        shared.extend_from_slice(colors);
    }
}

/// A click on a palette entry, as seen at click time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteClick {
    pub index: usize,
    pub color: Color,
}

/// Bounded, ordered collection of saved colors.
#[derive(Clone, Debug)]
pub struct PaletteStore {
    colors: Vec<Color>,
    capacity: PaletteCapacity,
    policy: OverflowPolicy,
    shared: Option<SharedPalette>,
}

impl PaletteStore {
    pub fn new(capacity: PaletteCapacity, policy: OverflowPolicy) -> Self {
        Self {
            colors: Vec::new(),
            capacity,
            policy,
            shared: None,
        }
    }

    /// Create a store seeded with `colors`, added in order under the overflow policy.
    pub fn with_colors(
        capacity: PaletteCapacity,
        policy: OverflowPolicy,
        colors: impl IntoIterator<Item = Color>,
    ) -> Self {
        let mut this = Self::new(capacity, policy);
        this.add(colors);
        this
    }

    /// Create a store seeded from and writing back to `shared`.
    pub fn with_shared(
        capacity: PaletteCapacity,
        policy: OverflowPolicy,
        shared: SharedPalette,
    ) -> Self {
        let mut this = Self::with_colors(capacity, policy, shared.snapshot());
        this.shared = Some(shared);
        this
    }

    pub fn capacity(&self) -> PaletteCapacity {
        self.capacity
    }

    /// Change the capacity. Entries beyond a smaller capacity are kept, later adds follow
    /// the overflow policy.
    pub fn set_capacity(&mut self, capacity: PaletteCapacity) {
        self.capacity = capacity;
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: OverflowPolicy) {
        self.policy = policy;
    }

    pub fn shared(&self) -> Option<&SharedPalette> {
        self.shared.as_ref()
    }

    /// Append each color in order, returns how many were stored.
    pub fn add(&mut self, colors: impl IntoIterator<Item = Color>) -> usize {
        let stored = colors.into_iter().filter(|color| self.insert(*color)).count();
        if stored > 0 {
            self.sync_shared();
        }
        stored
    }

    /// Append one color, returns false if the overflow policy dropped it.
    pub fn push(&mut self, color: Color) -> bool {
        self.add([color]) == 1
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn colors_snapshot(&self) -> Vec<Color> {
        self.colors.clone()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn clear(&mut self) {
        self.colors.clear();
        self.sync_shared();
    }

    /// The entry at `index`, captured for later handling.
    pub fn item_clicked(&self, index: usize) -> Option<PaletteClick> {
        self.get(index).map(|color| PaletteClick { index, color })
    }

    /// The color of `click` if the entry is still the one that was clicked.
    pub fn resolve(&self, click: PaletteClick) -> Option<Color> {
        match self.get(click.index) {
            Some(color) if color == click.color => Some(color),
            _ => {
                tracing::debug!(index = click.index, "stale palette click");
                None
            }
        }
    }

    fn insert(&mut self, color: Color) -> bool {
        if !self.capacity.is_full(self.colors.len()) {
            self.colors.push(color);
            return true;
        }

        match self.policy {
            OverflowPolicy::RejectNew => false,
            OverflowPolicy::EvictOldest => {
                if self.colors.is_empty() {
                    return false;
                }
                self.colors.remove(0);
                self.colors.push(color);
                true
            }
            OverflowPolicy::EvictNewest => match self.colors.last_mut() {
                Some(last) => {
                    *last = color;
                    true
                }
                None => false,
            },
        }
    }

    fn sync_shared(&self) {
        if let Some(shared) = &self.shared {
            shared.replace(&self.colors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Color = Color::rgb(1, 0, 0);
    const B: Color = Color::rgb(2, 0, 0);
    const C: Color = Color::rgb(3, 0, 0);
    const D: Color = Color::rgb(4, 0, 0);

    fn store(max: i32, policy: OverflowPolicy) -> PaletteStore {
        PaletteStore::new(PaletteCapacity::try_from(max).unwrap(), policy)
    }

    #[test]
    fn test_capacity_from_i32() {
        assert_eq!(PaletteCapacity::try_from(-1), Ok(PaletteCapacity::Unbounded));
        assert_eq!(PaletteCapacity::try_from(0), Ok(PaletteCapacity::Bounded(0)));
        assert_eq!(PaletteCapacity::try_from(30), Ok(PaletteCapacity::Bounded(30)));
        assert!(matches!(
            PaletteCapacity::try_from(-2),
            Err(PickerError::Configuration(_))
        ));
        assert_eq!(i32::from(PaletteCapacity::Unbounded), -1);
        assert_eq!(i32::from(PaletteCapacity::Bounded(7)), 7);
    }

    #[test]
    fn test_evict_oldest() {
        let mut store = store(2, OverflowPolicy::EvictOldest);
        assert_eq!(store.add([A, B]), 2);
        assert_eq!(store.colors(), [A, B]);
        assert!(store.push(C));
        assert_eq!(store.colors(), [B, C]);
        assert!(store.push(D));
        assert_eq!(store.colors(), [C, D]);
    }

    #[test]
    fn test_reject_new() {
        let mut store = store(2, OverflowPolicy::RejectNew);
        assert_eq!(store.add([A, B, C, D]), 2);
        assert_eq!(store.colors(), [A, B]);
    }

    #[test]
    fn test_evict_newest() {
        let mut store = store(2, OverflowPolicy::EvictNewest);
        store.add([A, B, C, D]);
        assert_eq!(store.colors(), [A, D]);
    }

    #[test]
    fn test_unbounded() {
        let mut store = store(-1, OverflowPolicy::RejectNew);
        let colors: Vec<Color> = (0..100).map(|i| Color::rgb(i, i, i)).collect();
        assert_eq!(store.add(colors.clone()), 100);
        assert_eq!(store.colors_snapshot(), colors);
    }

    #[test]
    fn test_seeded_store_follows_policy() {
        let store = PaletteStore::with_colors(
            PaletteCapacity::Bounded(3),
            OverflowPolicy::EvictOldest,
            [A, B, C, D],
        );
        assert_eq!(store.colors(), [B, C, D]);
        assert_eq!(store.get(0), Some(B));
        assert_eq!(store.get(3), None);
        assert!(store.shared().is_none());
    }

    #[test]
    fn test_zero_capacity_drops_everything() {
        for policy in [
            OverflowPolicy::RejectNew,
            OverflowPolicy::EvictOldest,
            OverflowPolicy::EvictNewest,
        ] {
            let mut store = store(0, policy);
            assert!(!store.push(A));
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_shrinking_keeps_entries() {
        let mut store = store(4, OverflowPolicy::EvictOldest);
        store.add([A, B, C, D]);
        store.set_capacity(PaletteCapacity::Bounded(2));
        assert_eq!(store.len(), 4);

        let e = Color::rgb(5, 0, 0);
        store.push(e);
        assert_eq!(store.colors(), [B, C, D, e]);

        store.set_policy(OverflowPolicy::RejectNew);
        assert!(!store.push(A));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_item_clicks() {
        let mut store = store(-1, OverflowPolicy::EvictOldest);
        store.add([A, B]);
        let click = store.item_clicked(1).unwrap();
        assert_eq!(click, PaletteClick { index: 1, color: B });
        assert_eq!(store.item_clicked(2), None);
        assert_eq!(store.resolve(click), Some(B));

        // The store changed between click and handling.
        store.clear();
        assert_eq!(store.resolve(click), None);
        store.add([A, C]);
        assert_eq!(store.resolve(click), None);
    }

    #[test]
    fn test_shared_palette() {
        let shared = SharedPalette::new([A]);
        let mut first = PaletteStore::with_shared(
            PaletteCapacity::Unbounded,
            OverflowPolicy::EvictOldest,
            shared.clone(),
        );
        assert_eq!(first.colors(), [A]);

        first.push(B);
        assert_eq!(shared.snapshot(), vec![A, B]);

        let second = PaletteStore::with_shared(
            PaletteCapacity::Bounded(10),
            OverflowPolicy::EvictOldest,
            shared.clone(),
        );
        assert_eq!(second.colors(), [A, B]);

        // A store without sharing leaves the shared list alone.
        let mut local = store(-1, OverflowPolicy::EvictOldest);
        local.push(C);
        assert_eq!(shared.len(), 2);
    }

    #[test]
    fn test_policy_serde() {
        assert_eq!(
            serde_json::to_string(&OverflowPolicy::EvictOldest).unwrap(),
            r#""evict-oldest""#
        );
        assert_eq!(
            serde_json::from_str::<OverflowPolicy>(r#""reject-new""#).unwrap(),
            OverflowPolicy::RejectNew
        );
    }
}
