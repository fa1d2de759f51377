use itertools::Itertools;
use std::fmt;

/// An item id as it appears in the input data or the taxonomy.
#[derive(Copy, Clone, Hash, PartialOrd, PartialEq, Eq, Ord, Debug)]
pub struct Item {
    id: u32,
}

impl Item {
    pub fn with_id(id: u32) -> Item {
        Item { id }
    }
    pub fn id(&self) -> u32 {
        self.id
    }
    pub fn item_vec_to_string(items: &[Item]) -> String {
        items.iter().map(|item| item.id).join(" ")
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Dense per-level renumbering of the promising items of one taxonomy
/// level, starting at 1. Local ids ascend with the items' utility bound, so
/// comparing two local ids compares the items in search order.
#[derive(Copy, Clone, Hash, PartialOrd, PartialEq, Eq, Ord, Debug)]
pub struct LocalItem {
    id: u32,
}

impl LocalItem {
    pub fn with_id(id: u32) -> LocalItem {
        LocalItem { id }
    }
    pub fn as_index(&self) -> usize {
        self.id as usize - 1
    }
}
