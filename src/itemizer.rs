use crate::item::{Item, LocalItem};
use fnv::FnvHashMap;

/// Renames the promising raw items of one level to dense local ids and
/// back again.
#[derive(Clone, Debug, Default)]
pub struct Itemizer {
    raw_to_local: FnvHashMap<Item, LocalItem>,
    local_to_raw: Vec<Item>,
}

impl Itemizer {
    /// `items` must already be in search order; the first gets local id 1.
    pub fn from_sorted(items: &[Item]) -> Itemizer {
        let mut itemizer = Itemizer {
            raw_to_local: FnvHashMap::default(),
            local_to_raw: Vec::with_capacity(items.len()),
        };
        for &item in items {
            let local = LocalItem::with_id(itemizer.local_to_raw.len() as u32 + 1);
            itemizer.raw_to_local.insert(item, local);
            itemizer.local_to_raw.push(item);
            debug_assert_eq!(itemizer.raw_of(local), item);
        }
        itemizer
    }
    pub fn local_of(&self, item: Item) -> Option<LocalItem> {
        self.raw_to_local.get(&item).cloned()
    }
    pub fn raw_of(&self, local: LocalItem) -> Item {
        self.local_to_raw[local.as_index()]
    }
    pub fn to_raw_vec(&self, locals: &[LocalItem]) -> Vec<Item> {
        locals.iter().map(|&local| self.raw_of(local)).collect()
    }
    pub fn len(&self) -> usize {
        self.local_to_raw.len()
    }
    pub fn is_empty(&self) -> bool {
        self.local_to_raw.is_empty()
    }
    pub fn local_items(&self) -> impl Iterator<Item = LocalItem> {
        (1..=self.local_to_raw.len() as u32).map(LocalItem::with_id)
    }
}
