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

use cosreco::cluster::{self, cluster_label};
use cosreco::io;

fn main() {

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input is a square matrix of \
        pairwise similarities, one row per line.", "PATH");
    opts.optopt("t", "threshold", "Minimum similarity of two clusters to merge them (optional, \
        defaults to 0.85).", "SIMILARITY");
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

    let similarities_path = match matches.opt_str("i") {
        Some(path) => path,
        None => return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        ),
    };

    let threshold: f64 = match matches.opt_get_default("t", 0.85) {
        Ok(threshold) => threshold,
        Err(failure) => {
            let hint = format!("Problem with option 't': {}", failure.to_string());
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

    if let Err(error) = compute_clusters(&similarities_path, delimiter, threshold) {
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

fn compute_clusters(
    similarities_path: &str,
    delimiter: u8,
    threshold: f64,
) -> Result<(), Box<dyn Error>> {

    info!(path = similarities_path, "reading similarity matrix");
    let similarities = io::read_similarity_matrix(similarities_path, delimiter)?;

    print!("{}", similarities);

    let clustering = cluster::agglomerate(&similarities, threshold)?;

    for (step, merge) in clustering.steps.iter().enumerate() {
        println!(
            "Step {}: merging [{}] and [{}] (similarity = {:.4})",
            step,
            cluster_label(&merge.left, "U"),
            cluster_label(&merge.right, "U"),
            merge.similarity,
        );
    }

    println!("Clusters:");
    for members in clustering.clusters.iter() {
        println!("\t{}", cluster_label(members, "U"));
    }

    Ok(())
}
