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
use cosreco::recommend;
use cosreco::similarity::closest_pair;

fn main() {

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input is a rating matrix with \
        one line per item and one column per user, a zero denotes a missing rating.", "PATH");
    opts.optopt("p", "prune", "Drop items with a lower mean rating and users left without \
        ratings before searching (optional).", "RATING");
    opts.optopt("d", "delimiter", "Column delimiter of the input file (optional, defaults to \
        tab).", "CHAR");
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

    let min_item_mean: Option<f64> = match matches.opt_get("p") {
        Ok(min_item_mean) => min_item_mean,
        Err(failure) => {
            let hint = format!("Problem with option 'p': {}", failure.to_string());
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

    if let Err(error) = find_closest(&matrix_path, delimiter, min_item_mean) {
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

fn find_closest(
    matrix_path: &str,
    delimiter: u8,
    min_item_mean: Option<f64>,
) -> Result<(), Box<dyn Error>> {

    info!(path = matrix_path, "reading rating matrix");
    let mut preferences = io::read_preference_matrix(matrix_path, delimiter)?;

    if let Some(min_item_mean) = min_item_mean {
        preferences = recommend::prune(&preferences, min_item_mean)?;
    }

    print!("{}", preferences);

    match closest_pair(preferences.matrix().rows()) {
        Some((item_a, item_b, similarity)) => println!(
            "Closest items: {} and {} (similarity = {:.4})",
            preferences.row_keys()[item_a],
            preferences.row_keys()[item_b],
            similarity,
        ),
        None => println!("Closest items: none"),
    }

    let users = preferences.matrix().transpose();
    match closest_pair(users.rows()) {
        Some((user_a, user_b, similarity)) => println!(
            "Closest users: {} and {} (similarity = {:.4})",
            preferences.col_keys()[user_a],
            preferences.col_keys()[user_b],
            similarity,
        ),
        None => println!("Closest users: none"),
    }

    Ok(())
}
