//! Ordered collection of children backed by the dependency layering.

use std::ops::Index;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::child::Child;
use crate::dependency::level::Levels;
use crate::element::ContainerId;

/// Level bookkeeping shared between duplicates of a collection.
#[derive(Debug, Clone, Default)]
struct Layering {
    levels: Levels,
    /// Level of every known name, including dependencies not added yet.
    depth: FxHashMap<String, usize>,
}

/// The children of a container, iterable in submission or display order.
///
/// Submission order ([`DependencyTree::reverse_iter`]) yields every child
/// after all of its dependencies. Display order
/// ([`DependencyTree::forward_iter`]) is its exact mirror.
///
/// A dependency may name a sibling that is added later, or never: the name is
/// reserved one level below the dependant and skipped by iteration until a
/// child with that name shows up.
#[derive(Debug, Default)]
pub struct DependencyTree {
    children: FxHashMap<String, Child>,
    layering: Rc<Layering>,
}

impl DependencyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a child.
    ///
    /// Adding a name that is already present replaces the child but keeps its
    /// level: dependencies are only taken into account on first insertion.
    pub fn add(&mut self, child: Child) {
        let name = child.name().to_string();

        if let Some(existing) = self.children.get_mut(&name) {
            *existing = child;
            return;
        }

        let target = self.layering.depth.get(&name).copied().unwrap_or(0);
        let dependencies = self.extract_dependencies(&child, target);

        let layering = Rc::make_mut(&mut self.layering);
        let depths = layering.levels.add(target, &name, dependencies);
        layering.depth.extend(depths);

        self.children.insert(name, child);
    }

    /// Collects the dependencies to record for `child` placed on `target`.
    ///
    /// Unknown dependencies are reserved on the level right below `target`
    /// so that adding them later lands them deep enough.
    fn extract_dependencies(&mut self, child: &Child, target: usize) -> Vec<String> {
        let mut dependencies = Vec::with_capacity(child.dependencies().len());

        for dependency in child.dependencies() {
            if dependency == child.name() {
                warn!(field = child.name(), "field depends on itself, ignoring");
                continue;
            }

            if !self.layering.depth.contains_key(dependency) {
                let layering = Rc::make_mut(&mut self.layering);
                let depths = layering.levels.add(target + 1, dependency, Vec::new());
                layering.depth.extend(depths);
            }

            dependencies.push(dependency.clone());
        }

        dependencies
    }

    /// Removes a child. Returns false if no child has that name.
    ///
    /// When another slot still names the removed child as a dependency, its
    /// slot is kept (with its edges cleared) so the level layout stays valid.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.children.remove(name).is_none() {
            return false;
        }

        let layering = Rc::make_mut(&mut self.layering);
        if let Some(&level) = layering.depth.get(name) {
            if layering.levels.is_depended_on(name) {
                layering.levels.reset(level, name);
            } else {
                layering.levels.remove(level, name);
                layering.depth.remove(name);
            }
        }

        true
    }

    pub fn has(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Child> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Child> {
        self.children.get_mut(name)
    }

    /// Level assigned to `name`, including reserved names not added yet.
    pub fn depth_of(&self, name: &str) -> Option<usize> {
        self.layering.depth.get(name).copied()
    }

    pub fn levels(&self) -> &Levels {
        &self.layering.levels
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child names in submission order: deepest level first.
    pub fn reverse_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layering
            .levels
            .iter()
            .rev()
            .flat_map(|level| level.names().rev())
            .filter(|name| self.children.contains_key(*name))
    }

    /// Child names in display order: root level first.
    pub fn forward_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layering
            .levels
            .iter()
            .flat_map(|level| level.names())
            .filter(|name| self.children.contains_key(*name))
    }

    /// Children in submission order: dependencies before their dependants.
    pub fn reverse_iter(&self) -> impl Iterator<Item = &Child> + '_ {
        self.reverse_names().filter_map(|name| self.children.get(name))
    }

    /// Children in display order.
    pub fn forward_iter(&self) -> impl Iterator<Item = &Child> + '_ {
        self.forward_names().filter_map(|name| self.children.get(name))
    }

    /// Mutable access to every child, in no particular order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Child> + '_ {
        self.children.values_mut()
    }

    /// Copies the collection under a new parent container.
    ///
    /// Children are re-parented copies; the level layout is shared until one
    /// side is modified.
    pub fn duplicate(&self, parent: ContainerId) -> DependencyTree {
        let children = self
            .children
            .iter()
            .map(|(name, child)| (name.clone(), child.reparented(parent)))
            .collect();

        DependencyTree {
            children,
            layering: Rc::clone(&self.layering),
        }
    }
}

impl Index<&str> for DependencyTree {
    type Output = Child;

    /// # Panics
    ///
    /// Panics if there is no child with this name.
    fn index(&self, name: &str) -> &Child {
        match self.children.get(name) {
            Some(child) => child,
            None => panic!("no child named {name:?}"),
        }
    }
}

impl<'a> IntoIterator for &'a DependencyTree {
    type Item = &'a Child;
    type IntoIter = Box<dyn Iterator<Item = &'a Child> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.forward_iter())
    }
}
