// Copyright 2018 Chris Pearce
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{MiningError, Result};
use crate::item::Item;
use crate::taxonomy::Taxonomy;
use crate::transaction::Transaction;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// Blank lines and lines starting with '#' or '@' carry no data.
fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with('@')
}

/// Reads transactions in the `items:TU:utilities` line format, e.g.
/// `1 3 4:9:2 3 4`.
pub struct TransactionReader<R> {
    reader: R,
    path: PathBuf,
    line_number: usize,
}

impl TransactionReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<TransactionReader<BufReader<File>>> {
        let file = File::open(path).map_err(|e| MiningError::io(path, e))?;
        Ok(TransactionReader::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> TransactionReader<R> {
    pub fn new(reader: R, path: &Path) -> TransactionReader<R> {
        TransactionReader {
            reader,
            path: path.to_path_buf(),
            line_number: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<Transaction> {
        let mut fields = line.split(':');
        let (items, utility, utilities) = match (fields.next(), fields.next(), fields.next()) {
            (Some(items), Some(utility), Some(utilities)) => (items, utility, utilities),
            _ => {
                return Err(self.format_error("expected `items:TU:utilities`"));
            }
        };
        let items: Vec<Item> = self
            .parse_list::<u32>(items, "item")?
            .into_iter()
            .map(Item::with_id)
            .collect();
        let utilities = self.parse_list::<f64>(utilities, "utility")?;
        let utility: f64 = utility
            .trim()
            .parse()
            .map_err(|_| self.format_error(format!("invalid transaction utility {:?}", utility)))?;

        if items.len() != utilities.len() {
            return Err(MiningError::LengthMismatch {
                line: self.line_number,
                items: items.len(),
                utilities: utilities.len(),
            });
        }
        let transaction = Transaction::new(items, utilities, utility);
        transaction.validate(self.line_number)?;
        Ok(transaction)
    }

    fn parse_list<T: FromStr>(&self, field: &str, what: &str) -> Result<Vec<T>> {
        field
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<T>()
                    .map_err(|_| self.format_error(format!("invalid {} {:?}", what, token)))
            })
            .collect()
    }

    fn format_error(&self, message: impl Into<String>) -> MiningError {
        MiningError::format(&self.path, self.line_number, message)
    }
}

impl<R: BufRead> Iterator for TransactionReader<R> {
    type Item = Result<Transaction>;
    fn next(&mut self) -> Option<Result<Transaction>> {
        let mut line = String::new();
        loop {
            line.clear();
            let len = match self.reader.read_line(&mut line) {
                Ok(len) => len,
                Err(e) => return Some(Err(MiningError::io(&self.path, e))),
            };
            if len == 0 {
                return None;
            }
            self.line_number += 1;
            let trimmed = line.trim();
            if is_skippable(trimmed) {
                continue;
            }
            return Some(self.parse_line(trimmed));
        }
    }
}

/// Loads at most `max_transactions` transactions (all when `None`). The
/// first malformed line aborts the load.
pub fn read_transactions(path: &Path, max_transactions: Option<usize>) -> Result<Vec<Transaction>> {
    let reader = TransactionReader::open(path)?;
    collect_transactions(reader, max_transactions)
}

pub fn collect_transactions<R: BufRead>(
    reader: TransactionReader<R>,
    max_transactions: Option<usize>,
) -> Result<Vec<Transaction>> {
    reader
        .take(max_transactions.unwrap_or(usize::max_value()))
        .collect()
}

/// Reads `child,parent` edges, one per line, and resolves them into a
/// taxonomy.
pub fn read_taxonomy(path: &Path) -> Result<Taxonomy> {
    let file = File::open(path).map_err(|e| MiningError::io(path, e))?;
    parse_taxonomy(BufReader::new(file), path)
}

pub fn parse_taxonomy<R: BufRead>(reader: R, path: &Path) -> Result<Taxonomy> {
    let mut edges: Vec<(Item, Item)> = vec![];
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| MiningError::io(path, e))?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if is_skippable(trimmed) {
            continue;
        }
        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 2 {
            return Err(MiningError::format(path, line_number, "expected `child,parent`"));
        }
        let parse = |token: &str| {
            token
                .parse::<u32>()
                .map(Item::with_id)
                .map_err(|_| MiningError::format(path, line_number, format!("invalid item {:?}", token)))
        };
        edges.push((parse(fields[0])?, parse(fields[1])?));
    }
    Taxonomy::build(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Generalization;
    use std::io::Cursor;

    fn reader(text: &str) -> TransactionReader<Cursor<&[u8]>> {
        TransactionReader::new(Cursor::new(text.as_bytes()), Path::new("test.txt"))
    }

    #[test]
    fn test_read_transactions() {
        let text = "# comment\n\
                    @CONVERTED_FROM_TEXT\n\
                    1 3 4:9:2 3 4\n\
                    \n\
                    2 5:7.5:3.5 4\n";
        let transactions = collect_transactions(reader(text), None).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(
            transactions[0],
            Transaction::new(
                vec![Item::with_id(1), Item::with_id(3), Item::with_id(4)],
                vec![2.0, 3.0, 4.0],
                9.0
            )
        );
        assert_eq!(transactions[1].utility(), 7.5);
    }

    #[test]
    fn test_max_transactions() {
        let text = "1:1:1\n2:2:2\n3:3:3\n";
        assert_eq!(collect_transactions(reader(text), Some(2)).unwrap().len(), 2);
        assert_eq!(collect_transactions(reader(text), Some(0)).unwrap().len(), 0);
        assert_eq!(collect_transactions(reader(text), None).unwrap().len(), 3);
    }

    #[test]
    fn test_malformed_lines() {
        match collect_transactions(reader("1 2:3\n"), None) {
            Err(MiningError::Format { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected format error, got {:?}", other),
        }
        match collect_transactions(reader("1:1:1\n1 x:3:1 2\n"), None) {
            Err(MiningError::Format { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected format error, got {:?}", other),
        }
        match collect_transactions(reader("1 2:3:3\n"), None) {
            Err(MiningError::LengthMismatch { items, utilities, .. }) => {
                assert_eq!((items, utilities), (2, 1))
            }
            other => panic!("expected length mismatch, got {:?}", other),
        }
        match collect_transactions(reader("1 2:1:3 -2\n"), None) {
            Err(MiningError::NegativeUtility { item, .. }) => assert_eq!(item, Item::with_id(2)),
            other => panic!("expected negative utility, got {:?}", other),
        }
    }

    #[test]
    fn test_transaction_utility_below_items() {
        match collect_transactions(reader("1:3:3\n1 2:1:3 4\n"), None) {
            Err(MiningError::UtilityBelowItems { line, utility, sum }) => {
                assert_eq!((line, utility, sum), (2, 1.0, 7.0))
            }
            other => panic!("expected utility below items, got {:?}", other),
        }
        assert!(collect_transactions(reader("1 2:-1:0 0\n"), None).is_err());
    }

    #[test]
    fn test_parse_taxonomy() {
        let text = "# child,parent\n1,4\n2, 4\n\n4,6\n";
        let taxonomy = parse_taxonomy(Cursor::new(text.as_bytes()), Path::new("tax.txt")).unwrap();
        assert_eq!(taxonomy.len(), 3);
        assert_eq!(taxonomy.parent(Item::with_id(2)), Some(Item::with_id(4)));
        assert_eq!(taxonomy.level(Item::with_id(1)), 3);

        let bad = parse_taxonomy(Cursor::new("1,4\n1;4\n".as_bytes()), Path::new("tax.txt"));
        match bad {
            Err(MiningError::Format { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected format error, got {:?}", other),
        }
        let cyclic = parse_taxonomy(Cursor::new("1,2\n2,1\n".as_bytes()), Path::new("tax.txt"));
        assert!(cyclic.is_err());
    }
}
