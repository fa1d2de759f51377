use crate::utility_map::UtilityMap;

/// An ordered list of utility maps: the preset or postset of a search
/// node. Cloning copies the list of references, never the maps.
#[derive(Clone, Debug, Default)]
pub struct EUList<'a> {
    maps: Vec<&'a UtilityMap>,
    max_support: usize,
}

impl<'a> EUList<'a> {
    pub fn new() -> EUList<'a> {
        EUList {
            maps: vec![],
            max_support: 0,
        }
    }

    pub fn add(&mut self, map: &'a UtilityMap) {
        self.max_support = self.max_support.max(map.support());
        self.maps.push(map);
    }

    pub fn get(&self, index: usize) -> &'a UtilityMap {
        self.maps[index]
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn max_support(&self) -> usize {
        self.max_support
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a UtilityMap> + '_ {
        self.maps.iter().cloned()
    }

    /// The first `len` entries, as a list of their own.
    pub fn prefix(&self, len: usize) -> EUList<'a> {
        let mut prefix = EUList::new();
        for &map in &self.maps[..len] {
            prefix.add(map);
        }
        prefix
    }

    /// True when `tidset` is covered by some member with at least as much
    /// support: that member's branch already produced its closure.
    pub fn subsumes(&self, tidset: &UtilityMap) -> bool {
        let support = tidset.support();
        if self.max_support < support {
            return false;
        }
        self.maps
            .iter()
            .filter(|map| map.support() >= support)
            .any(|map| map.contains_all_tids(tidset))
    }
}

impl<'a> Extend<&'a UtilityMap> for EUList<'a> {
    fn extend<I: IntoIterator<Item = &'a UtilityMap>>(&mut self, iter: I) {
        for map in iter {
            self.add(map);
        }
    }
}
