use crate::error::{MiningError, Result};
use crate::item::Item;
use ordered_float::OrderedFloat;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A closed high-utility itemset found at one taxonomy level. Items are raw
/// ids in the level's search order.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosedItemset {
    pub level: usize,
    pub items: Vec<Item>,
    pub utility: f64,
    pub support: usize,
}

impl ClosedItemset {
    /// A hashable, order-independent identity of this result: level, the
    /// sorted items, utility and support.
    pub fn key(&self) -> (usize, Vec<Item>, OrderedFloat<f64>, usize) {
        let mut items = self.items.clone();
        items.sort();
        (self.level, items, OrderedFloat(self.utility), self.support)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for ClosedItemset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} #SUP: {} #UTIL: {}",
            Item::item_vec_to_string(&self.items),
            self.support,
            self.utility
        )
    }
}

/// Writes one result per line in the `<items> #SUP: <s> #UTIL: <u>` form.
pub struct PatternWriter<W: Write> {
    output: W,
    path: PathBuf,
    written: usize,
}

impl PatternWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<PatternWriter<BufWriter<File>>> {
        let file = File::create(path).map_err(|e| MiningError::io(path, e))?;
        Ok(PatternWriter::new(BufWriter::new(file), path))
    }
}

impl<W: Write> PatternWriter<W> {
    pub fn new(output: W, path: &Path) -> PatternWriter<W> {
        PatternWriter {
            output,
            path: path.to_path_buf(),
            written: 0,
        }
    }

    pub fn write(&mut self, itemset: &ClosedItemset) -> Result<()> {
        writeln!(self.output, "{}", itemset).map_err(|e| MiningError::io(&self.path, e))?;
        self.written += 1;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, itemsets: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ClosedItemset>,
    {
        for itemset in itemsets {
            self.write(itemset)?;
        }
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.output.flush().map_err(|e| MiningError::io(&self.path, e))?;
        Ok(self.output)
    }
}
