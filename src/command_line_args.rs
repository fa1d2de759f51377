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

use std::env;
use std::io;
use std::process;

use argparse::{ArgumentParser, Store, StoreFalse, StoreOption};
use mlc_miner::MinerConfig;

pub struct Arguments {
    pub transactions_path: String,
    pub taxonomy_path: Option<String>,
    pub output_path: Option<String>,
    pub min_utility: f64,
    pub max_transactions: Option<usize>,
    pub use_eucs: bool,
}

impl Arguments {
    pub fn miner_config(&self) -> MinerConfig {
        let config = MinerConfig::new(self.min_utility).with_eucs(self.use_eucs);
        match self.max_transactions {
            Some(max) => config.with_max_transactions(max),
            None => config,
        }
    }
}

pub fn parse_args_or_exit() -> Arguments {
    let mut args: Arguments = Arguments {
        transactions_path: String::new(),
        taxonomy_path: None,
        output_path: None,
        min_utility: 0.0,
        max_transactions: None,
        use_eucs: true,
    };

    {
        let mut parser = ArgumentParser::new();
        parser.set_description("Multi-level closed high-utility itemset miner.");

        parser
            .refer(&mut args.transactions_path)
            .add_option(
                &["--transactions"],
                Store,
                "Input transactions, one per line as `items:TU:utilities`.",
            )
            .metavar("file_path")
            .required();

        parser
            .refer(&mut args.taxonomy_path)
            .add_option(
                &["--taxonomy"],
                StoreOption,
                "Taxonomy as `child,parent` lines. \
                 Without it, items are mined on a single flat level.",
            )
            .metavar("file_path");

        parser
            .refer(&mut args.output_path)
            .add_option(
                &["--output"],
                StoreOption,
                "File path in which to store closed itemsets. \
                 Format: items #SUP: support #UTIL: utility.",
            )
            .metavar("file_path");

        parser
            .refer(&mut args.min_utility)
            .add_option(
                &["--min-utility"],
                Store,
                "Minimum itemset utility threshold, in range [0,∞).",
            )
            .metavar("threshold")
            .required();

        parser
            .refer(&mut args.max_transactions)
            .add_option(
                &["--max-transactions"],
                StoreOption,
                "Only mine the first N transactions of the input.",
            )
            .metavar("count");

        parser.refer(&mut args.use_eucs).add_option(
            &["--no-eucs"],
            StoreFalse,
            "Disable co-occurrence (EUCS) pruning.",
        );

        if env::args().count() == 1 {
            parser.print_help("Usage:", &mut io::stderr()).unwrap();
            process::exit(1);
        }

        match parser.parse_args() {
            Ok(()) => {}
            Err(err) => {
                process::exit(err);
            }
        }
    }

    if !args.min_utility.is_finite() || args.min_utility < 0.0 {
        eprintln!("Minimum utility must be in range [0,∞)");
        process::exit(1);
    }

    args
}
