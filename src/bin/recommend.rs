/**
 * CosReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::env;
use std::error::Error;

use getopts::Options;
use tracing::info;

use cosreco::io;
use cosreco::{EngineConfig, Selection, StrategyKind, User};

fn main() {

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input is a rating matrix with \
        one line per item and one column per user, a zero denotes a missing rating.", "PATH");
    opts.optopt("u", "user", "Id of the user to recommend items for (required), users are \
        numbered from 1 in column order.", "NUMBER");
    opts.optopt("s", "strategy", "Compare 'item's or 'user's (optional, defaults to item).", "NAME");
    opts.optopt("n", "num-items", "Number of items to recommend (optional, defaults to 10).",
        "NUMBER");
    opts.optopt("t", "threshold", "Recommend all items with at least this predicted rating \
        (optional, replaces --num-items).", "RATING");
    opts.optopt("c", "config", "JSON file with similarity thresholds and the number of threads \
        (optional).", "PATH");
    opts.optopt("d", "delimiter", "Column delimiter of the input file (optional, defaults to \
        tab).", "CHAR");
    opts.optopt("o", "outputfile", "Output file name (optional, output will be written to stdout \
        by default).", "PATH");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    let matrix_path = match matches.opt_str("i") {
        Some(path) => path,
        None => return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        ),
    };

    let user_id: u32 = match matches.opt_get("u") {
        Ok(Some(user_id)) => user_id,
        Ok(None) => return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify a user via --user."),
        ),
        Err(failure) => {
            let hint = format!("Problem with option 'u': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let strategy: StrategyKind = match matches.opt_get_default("s", StrategyKind::ItemBased) {
        Ok(strategy) => strategy,
        Err(failure) => {
            let hint = format!("Problem with option 's': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let selection = match (matches.opt_get::<f64>("t"), matches.opt_get_default("n", 10)) {
        (Ok(Some(threshold)), _) => Selection::AboveThreshold(threshold),
        (Ok(None), Ok(n)) => Selection::TopN(n),
        (Err(failure), _) => {
            let hint = format!("Problem with option 't': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
        (_, Err(failure)) => {
            let hint = format!("Problem with option 'n': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let delimiter = match matches.opt_str("d") {
        Some(ref delimiter) if delimiter.len() == 1 => delimiter.as_bytes()[0],
        Some(_) => return print_usage_and_exit(
            &program,
            opts,
            Some("The delimiter must be a single character."),
        ),
        None => b'\t',
    };

    cosreco::logging::init();

    let outcome = compute_recommendations(
        &matrix_path,
        delimiter,
        User::new(user_id),
        strategy,
        selection,
        matches.opt_str("c"),
        matches.opt_str("o"),
    );

    if let Err(error) = outcome {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
}

fn compute_recommendations(
    matrix_path: &str,
    delimiter: u8,
    user: User,
    strategy: StrategyKind,
    selection: Selection,
    config_path: Option<String>,
    output_path: Option<String>,
) -> Result<(), Box<dyn Error>> {

    let config = match config_path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig { num_threads: num_cpus::get(), ..EngineConfig::default() },
    };

    info!(path = matrix_path, "reading rating matrix");
    let preferences = io::read_preference_matrix(matrix_path, delimiter)?;

    info!(
        items = preferences.num_rows(),
        users = preferences.num_cols(),
        ?strategy,
        threads = config.num_threads,
        "computing recommendations for {}", user
    );

    let recommendations = cosreco::recommendations(preferences, &user, strategy, selection, &config)?;

    info!(num_recommendations = recommendations.len(), "writing recommendations");
    io::write_recommendations(&user, &recommendations, output_path)?;

    Ok(())
}
