extern crate clap;

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::process::exit;
use std::time::SystemTime;
use clap::{Arg, App, ArgMatches, SubCommand};
use log::{error, info, LevelFilter};
use simple_error::{SimpleError, bail};

use anajumble::*;

/// Initialize logging to stderr. `--debug` raises the level, RUST_LOG overrides both.
fn init_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

fn output_matches_as_tsv(out: &mut impl Write, result: &JumbleResult) -> io::Result<()> {
    write!(out, "{}", result.input)?;
    for text in result.matches.iter() {
        write!(out, "\t{}", text)?;
    }
    writeln!(out)
}

fn output_matches_as_json(out: &mut impl Write, result: &JumbleResult, seqnr: usize) -> io::Result<()> {
    if seqnr > 1 {
        writeln!(out, ",")?;
    }
    write!(out, "    {}", serde_json::to_string(result)?)
}

fn process(model: &JumbleModel, inputstream: impl Read, batchsize: usize, params: &SearchParameters, json: bool, progress: bool, seqnr: &mut usize) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut progresstime = SystemTime::now();
    for batch in LineBatches::new(BufReader::new(inputstream), batchsize) {
        let batch = batch?;
        let batch: Vec<&str> = batch.iter().map(|s| s.as_str()).collect();
        for (input, matches) in model.find_jumbled_par(&batch, params) {
            *seqnr += 1;
            let result = model.resolve(input, &matches);
            if json {
                output_matches_as_json(&mut out, &result, *seqnr)?;
            } else {
                output_matches_as_tsv(&mut out, &result)?;
            }
        }
        out.flush()?;
        if progress {
            progresstime = show_progress(*seqnr, batch.len(), progresstime);
        }
    }
    Ok(())
}

fn show_progress(seqnr: usize, processed: usize, lasttime: SystemTime) -> SystemTime {
    let now = SystemTime::now();
    if lasttime >= now || processed == 0 {
        info!("@ {}", seqnr);
    } else {
        let elapsed = now.duration_since(lasttime).map(|d| d.as_millis()).unwrap_or(0);
        info!("@ {} - processing speed was {:.0} items per second", seqnr, processing_rate(processed, elapsed));
    }
    now
}

///Items per second, given the number of items processed in the elapsed milliseconds
fn processing_rate(processed: usize, elapsed_millis: u128) -> f64 {
    processed as f64 / (elapsed_millis.max(1) as f64 / 1000.0)
}

fn parse_arg<T: std::str::FromStr>(args: &ArgMatches, name: &str) -> Result<Option<T>, SimpleError> {
    match args.value_of(name) {
        Some(value) => match value.parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(SimpleError::new(format!("Invalid value for --{}: {}", name, value))),
        },
        None => Ok(None)
    }
}

fn search_parameters(args: &ArgMatches) -> Result<SearchParameters, SimpleError> {
    let mut params = SearchParameters::default();
    if let Some(min_length) = parse_arg::<CharCount>(args, "min-length")? {
        params = params.with_min_length(min_length);
    }
    if let Some(max_matches) = parse_arg::<usize>(args, "max-matches")? {
        params = params.with_max_matches(max_matches);
    }
    if let Some(order) = args.value_of("order") {
        params = params.with_order(order.parse::<OutputOrder>()?);
    }
    if args.is_present("single-thread") {
        params = params.with_single_thread();
    }
    Ok(params)
}

pub fn common_arguments<'a,'b>() -> Vec<clap::Arg<'a,'b>> {
    let mut args: Vec<Arg> = Vec::new();
    args.push(Arg::with_name("lexicon")
        .long("lexicon")
        .short("l")
        .help("Lexicon (word list) against which all matches are made. Every whitespace-separated token is an entry, unless --tsv-column is set. This option may be used multiple times for multiple lexicons.")
        .takes_value(true)
        .number_of_values(1)
        .multiple(true)
        .default_value("words_alpha.txt"));
    args.push(Arg::with_name("tsv-column")
        .long("tsv-column")
        .help("Read the lexicons as tab separated files and take the entry from this column (0-indexed)")
        .takes_value(true)
        .required(false));
    args
}

pub fn query_arguments<'a,'b>() -> Vec<clap::Arg<'a,'b>> {
    let mut args: Vec<Arg> = Vec::new();
    args.push(Arg::with_name("min-length")
        .long("min-length")
        .short("m")
        .help("Minimum length (in characters) of the parts of the input to consider")
        .takes_value(true)
        .default_value("1"));
    args.push(Arg::with_name("max-matches")
        .long("max-matches")
        .short("n")
        .help("Number of matches to return per input (set to 0 for unlimited)")
        .takes_value(true)
        .default_value("0"));
    args.push(Arg::with_name("order")
        .long("order")
        .short("o")
        .help("Order of the matches: discovery (in the order the input parts are enumerated), alphabetical, or length (longest first)")
        .takes_value(true)
        .possible_values(&["discovery","alphabetical","alpha","length"])
        .default_value("discovery"));
    args.push(Arg::with_name("json")
        .long("json")
        .short("j")
        .help("Output json instead of tsv")
        .required(false));
    args.push(Arg::with_name("progress")
        .long("progress")
        .help("Show progress")
        .required(false));
    args.push(Arg::with_name("single-thread")
        .long("single-thread")
        .help("Use only a single thread")
        .required(false));
    args.push(Arg::with_name("files")
        .help("Input files, one query per line (defaults to standard input)")
        .takes_value(true)
        .multiple(true)
        .required(false));
    args
}

fn load_model(args: &ArgMatches) -> Result<JumbleModel, Box<dyn std::error::Error>> {
    let mut vocabparams = VocabParams::default();
    if let Some(column) = parse_arg::<u8>(args, "tsv-column")? {
        vocabparams = vocabparams.with_text_column(column);
    }

    let mut model = JumbleModel::new();
    info!("Loading lexicons...");
    if let Some(filenames) = args.values_of("lexicon") {
        for filename in filenames {
            model.read_vocabulary(filename, &vocabparams)
                .map_err(|e| SimpleError::new(format!("Error reading lexicon {}: {}", filename, e)))?;
        }
    }

    info!("Building model...");
    model.build();
    Ok(model)
}

fn run(rootargs: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(args) = rootargs.subcommand_matches("index") {
        let model = load_model(args)?;
        info!("Outputting signature index...");
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for signatures in model.sortedindex.values() {
            for signature in signatures {
                if let Some(node) = model.index.get(signature) {
                    write!(out, "{}", signature)?;
                    for vocab_id in node.instances.iter() {
                        if let Some(value) = model.get_vocab(*vocab_id) {
                            write!(out, "\t{}", value.text)?;
                        }
                    }
                    writeln!(out)?;
                }
            }
        }
    } else if let Some(args) = rootargs.subcommand_matches("query") {
        let params = search_parameters(args)?;
        let model = load_model(args)?;
        let json = args.is_present("json");
        let progress = args.is_present("progress");

        info!("Querying the model...");
        if json {
            println!("[");
        }
        let files: Vec<&str> = match args.values_of("files") {
            Some(files) => files.collect(),
            None => vec!("-"),
        };
        let mut seqnr = 0;
        for filename in files {
            match filename {
                "-" | "STDIN" | "stdin" => {
                    info!("(accepting standard input; enter input to match, one per line)");
                    process(&model, io::stdin(), 1, &params, json, progress, &mut seqnr)?;
                },
                _ => {
                    let f = File::open(filename)
                        .map_err(|e| SimpleError::new(format!("Unable to open file {}: {}", filename, e)))?;
                    process(&model, f, 1000, &params, json, progress, &mut seqnr)?;
                }
            }
        }
        if json {
            if seqnr > 0 {
                println!();
            }
            println!("]");
        }
    } else {
        bail!("No command specified, use query or index");
    }
    Ok(())
}

fn main() {
    let rootargs = App::new("Anajumble")
                    .version(env!("CARGO_PKG_VERSION"))
                    .author("Maarten van Gompel (proycon) <proycon@anaproy.nl>")
                    .about("Jumble solver: finds all words in the lexicon that are anagrams of a contiguous part of the input")
                    .subcommand(
                        SubCommand::with_name("query")
                            .about("Query the model; find all matches in the lexicon for each input word")
                            .args(&common_arguments())
                            .args(&query_arguments())
                    )
                    .subcommand(
                        SubCommand::with_name("index")
                            .about("Compute and output the signature index")
                            .args(&common_arguments())
                    )
                    .arg(Arg::with_name("debug")
                        .long("debug")
                        .short("D")
                        .help("Debug")
                        .required(false))
                    .get_matches();

    init_logger(rootargs.is_present("debug"));

    if let Err(e) = run(&rootargs) {
        error!("{}", e);
        exit(1);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_rate_uses_batch_size() {
        assert_eq!(processing_rate(1000, 500), 2000.0);
        //a partial last batch
        assert_eq!(processing_rate(250, 500), 500.0);
        assert_eq!(processing_rate(1, 0), 1000.0);
    }
}
