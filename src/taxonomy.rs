use crate::error::{MiningError, Result};
use crate::item::Item;
use fnv::{FnvHashMap, FnvHashSet};

/// How raw items generalize to ancestor categories. The scanner and the
/// search engine are generic over this, so the same miner runs on a real
/// taxonomy or on flat data.
pub trait Generalization {
    fn parent(&self, item: Item) -> Option<Item>;

    /// Number of distinct items that generalize at least one other item.
    fn generalized_item_count(&self) -> usize;

    /// The ancestor chain of `item`: the item itself, its parent, and so on
    /// up to its root.
    fn ancestors(&self, item: Item) -> Ancestors<Self>
    where
        Self: Sized,
    {
        Ancestors {
            generalization: self,
            next: Some(item),
        }
    }

    /// Level of `item` in its hierarchy. Roots are at level 1.
    fn level(&self, item: Item) -> usize
    where
        Self: Sized,
    {
        self.ancestors(item).count()
    }
}

pub struct Ancestors<'a, G> {
    generalization: &'a G,
    next: Option<Item>,
}

impl<'a, G: Generalization> Iterator for Ancestors<'a, G> {
    type Item = Item;
    fn next(&mut self) -> Option<Item> {
        let item = self.next?;
        self.next = self.generalization.parent(item);
        Some(item)
    }
}

/// Identity generalization: every item is its own root. Mining with this is
/// plain closed high-utility itemset mining on a single level.
#[derive(Clone, Copy, Debug, Default)]
pub struct Flat;

impl Generalization for Flat {
    fn parent(&self, _item: Item) -> Option<Item> {
        None
    }
    fn generalized_item_count(&self) -> usize {
        0
    }
    fn level(&self, _item: Item) -> usize {
        1
    }
}

/// A forest of child -> parent edges with every item's level resolved up
/// front. Construction fails on cycles and on children with two parents,
/// so walking ancestors always terminates.
#[derive(Clone, Debug, Default)]
pub struct Taxonomy {
    child_to_parent: FnvHashMap<Item, Item>,
    levels: FnvHashMap<Item, usize>,
    max_level: usize,
}

impl Taxonomy {
    pub fn build<I>(edges: I) -> Result<Taxonomy>
    where
        I: IntoIterator<Item = (Item, Item)>,
    {
        let mut child_to_parent: FnvHashMap<Item, Item> = FnvHashMap::default();
        for (child, parent) in edges {
            if child == parent {
                return Err(MiningError::TaxonomyCycle { item: child });
            }
            match child_to_parent.get(&child) {
                Some(&first) if first != parent => {
                    return Err(MiningError::ConflictingParent {
                        child,
                        first,
                        second: parent,
                    });
                }
                _ => {
                    child_to_parent.insert(child, parent);
                }
            }
        }
        let mut taxonomy = Taxonomy {
            child_to_parent,
            levels: FnvHashMap::default(),
            max_level: 0,
        };
        taxonomy.resolve_levels()?;
        Ok(taxonomy)
    }

    pub fn from_edges(edges: &[(u32, u32)]) -> Result<Taxonomy> {
        Taxonomy::build(
            edges
                .iter()
                .map(|&(child, parent)| (Item::with_id(child), Item::with_id(parent))),
        )
    }

    fn resolve_levels(&mut self) -> Result<()> {
        let mut items: Vec<Item> = self
            .child_to_parent
            .iter()
            .flat_map(|(&child, &parent)| vec![child, parent])
            .collect();
        items.sort();
        items.dedup();

        for item in items {
            if self.levels.contains_key(&item) {
                continue;
            }
            // Walk up until we hit a root or an item whose level is known.
            let mut path: Vec<Item> = vec![];
            let mut on_path: FnvHashSet<Item> = FnvHashSet::default();
            let mut cursor = Some(item);
            let mut base = 0;
            while let Some(current) = cursor {
                if let Some(&level) = self.levels.get(&current) {
                    base = level;
                    break;
                }
                if !on_path.insert(current) {
                    return Err(MiningError::TaxonomyCycle { item: current });
                }
                path.push(current);
                cursor = self.child_to_parent.get(&current).cloned();
            }
            for (offset, &node) in path.iter().rev().enumerate() {
                let level = base + offset + 1;
                self.max_level = self.max_level.max(level);
                self.levels.insert(node, level);
            }
        }
        Ok(())
    }

    /// Depth of the deepest chain in the taxonomy itself, regardless of
    /// which items occur in the data.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn len(&self) -> usize {
        self.child_to_parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.child_to_parent.is_empty()
    }
}

impl Generalization for Taxonomy {
    fn parent(&self, item: Item) -> Option<Item> {
        self.child_to_parent.get(&item).cloned()
    }

    fn generalized_item_count(&self) -> usize {
        self.child_to_parent
            .values()
            .collect::<FnvHashSet<&Item>>()
            .len()
    }

    fn level(&self, item: Item) -> usize {
        // Items absent from the taxonomy are roots of their own.
        self.levels.get(&item).cloned().unwrap_or(1)
    }
}
