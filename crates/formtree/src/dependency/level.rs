//! Incremental topological layering of named items.
//!
//! Items are registered one at a time together with the names they depend on.
//! Each item sits on a level; an item's dependencies always sit on strictly
//! deeper levels. Level 0 holds items nothing depends on (or that were added
//! last without being anyone's dependency).
//!
//! There is no batch sort: every [`Levels::add`] only performs the shifts its
//! own dependencies require, relying on previously placed items already
//! satisfying the invariant. Shifting an item moves its recorded dependencies
//! along with it, so shifts are transitive.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

/// Level assignments produced by a layering operation.
pub type Depths = FxHashMap<String, usize>;

/// A depth bucket: the items currently assigned to one level, with the
/// dependency names recorded for each of them.
#[derive(Debug, Clone, Default)]
pub struct Level {
    number: usize,
    slots: IndexMap<String, Vec<String>>,
}

impl Level {
    fn new(number: usize) -> Self {
        Self {
            number,
            slots: IndexMap::new(),
        }
    }

    /// Depth of this level, 0 being the shallowest.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Whether `name` is assigned to this level.
    pub fn has(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Dependencies recorded for `name` on this level.
    pub fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.slots.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in registration order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &[String])> + '_ {
        self.slots
            .iter()
            .map(|(name, dependencies)| (name.as_str(), dependencies.as_slice()))
    }

    /// Slot names in registration order.
    pub fn names(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.slots.keys().map(String::as_str)
    }
}

/// The chain of levels. Level `n`'s previous level is `n - 1`, its next `n + 1`.
///
/// Levels are created on demand and never removed; removing an item leaves
/// its level in place even when it becomes empty.
#[derive(Debug, Clone)]
pub struct Levels {
    levels: Vec<Level>,
}

impl Default for Levels {
    fn default() -> Self {
        Self::new()
    }
}

impl Levels {
    /// Creates a chain holding only the root level.
    pub fn new() -> Self {
        Self {
            levels: vec![Level::new(0)],
        }
    }

    /// Registers `name` on `level` with the given dependencies.
    ///
    /// Every dependency currently placed on `level` or a shallower one is
    /// shifted to `level + 1`, carrying its own dependencies along. Names that
    /// are not placed, or already placed deeper, are left alone.
    ///
    /// Returns the level of every name placed by this call.
    pub fn add(&mut self, level: usize, name: &str, dependencies: Vec<String>) -> Depths {
        let mut depths = Depths::default();
        let mut path = Vec::new();
        self.place(level, name.to_string(), dependencies, &mut depths, &mut path);
        depths
    }

    /// Moves `name` from `level` to the next level, creating it if needed.
    ///
    /// Returns the updated depths like [`Levels::add`]; nothing happens if
    /// `name` is not on `level`.
    pub fn shift(&mut self, level: usize, name: &str) -> Depths {
        let mut depths = Depths::default();
        let Some(dependencies) = self
            .levels
            .get_mut(level)
            .and_then(|l| l.slots.shift_remove(name))
        else {
            return depths;
        };

        let mut path = Vec::new();
        self.place(level + 1, name.to_string(), dependencies, &mut depths, &mut path);
        depths
    }

    /// Whether `name` is assigned to `level`.
    pub fn has(&self, level: usize, name: &str) -> bool {
        self.levels.get(level).is_some_and(|l| l.has(name))
    }

    /// Clears the dependencies recorded for `name`, keeping its slot.
    pub fn reset(&mut self, level: usize, name: &str) {
        if let Some(dependencies) = self.levels.get_mut(level).and_then(|l| l.slots.get_mut(name)) {
            dependencies.clear();
        }
    }

    /// Deletes the slot of `name` on `level`.
    pub fn remove(&mut self, level: usize, name: &str) {
        if let Some(l) = self.levels.get_mut(level) {
            l.slots.shift_remove(name);
        }
    }

    pub fn get(&self, level: usize) -> Option<&Level> {
        self.levels.get(level)
    }

    /// The shallower neighbour of `level`.
    pub fn prev(&self, level: usize) -> Option<usize> {
        level.checked_sub(1).filter(|prev| *prev < self.levels.len())
    }

    /// The deeper neighbour of `level`, if it has been created.
    pub fn next(&self, level: usize) -> Option<usize> {
        let next = level + 1;
        (next < self.levels.len()).then_some(next)
    }

    /// The deepest level reachable from `level`, or `None` if `level` is the deepest.
    pub fn last_from(&self, level: usize) -> Option<usize> {
        let deepest = self.deepest();
        (level < deepest).then_some(deepest)
    }

    /// Number of the deepest level.
    pub fn deepest(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of levels in the chain.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false: the root level exists from construction.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels from the root to the deepest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Level> + '_ {
        self.levels.iter()
    }

    /// Whether any slot records `name` as one of its dependencies.
    pub fn is_depended_on(&self, name: &str) -> bool {
        self.levels
            .iter()
            .flat_map(|l| l.slots.values())
            .any(|dependencies| dependencies.iter().any(|d| d == name))
    }

    fn ensure(&mut self, level: usize) {
        while self.levels.len() <= level {
            let number = self.levels.len();
            self.levels.push(Level::new(number));
        }
    }

    /// Level of `name`, looking only at `0..=max`.
    fn position_within(&self, name: &str, max: usize) -> Option<usize> {
        self.levels
            .iter()
            .take(max + 1)
            .position(|l| l.has(name))
    }

    fn place(
        &mut self,
        level: usize,
        name: String,
        dependencies: Vec<String>,
        depths: &mut Depths,
        path: &mut Vec<String>,
    ) {
        self.ensure(level);
        trace!(field = %name, level, "placing field");

        self.levels[level].slots.insert(name.clone(), dependencies.clone());
        depths.insert(name.clone(), level);
        path.push(name);

        for dependency in dependencies {
            if path.contains(&dependency) {
                warn!(%dependency, level, "dependency cycle ignored");
                continue;
            }

            let Some(at) = self.position_within(&dependency, level) else {
                continue;
            };

            let carried = self.levels[at]
                .slots
                .shift_remove(&dependency)
                .unwrap_or_default();

            trace!(field = %dependency, from = at, to = level + 1, "shifting dependency");
            self.place(level + 1, dependency, carried, depths, path);
        }

        path.pop();
    }
}
