use crossterm::style::Stylize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::ExitCode;
use unshuffle_core::{fingerprint, persistence, CorpusFormat, Translator};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("make-dict") if args.len() == 3 => make_dict(&args[1], &args[2]),
        Some("translate") if args.len() == 2 || args.len() == 3 => {
            translate(&args[1], args.get(2).map(String::as_str))
        }
        Some("id") if args.len() == 2 => {
            println!("{}", fingerprint(&args[1]));
            Ok(())
        }
        _ => {
            usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "[ERROR]".red());
            ExitCode::FAILURE
        }
    }
}

fn usage() {
    eprintln!(
        "usage: unshuffle <command>\n\n\
         commands:\n  \
         make-dict <frequency-file> <dict-file>   build a dictionary from a frequency corpus\n  \
         translate <dict-file> [text]             translate text (or stdin) against a dictionary\n  \
         id <word>                                print the fingerprint of a word"
    );
}

/// Builds a fingerprint dictionary from a `rank word frequency` corpus and
/// writes it next to wherever the caller asked for it.
fn make_dict(frequency_file: &str, dict_file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(frequency_file)?);
    let lines = reader.lines().collect::<Result<Vec<String>, _>>()?;
    let (built, stats) = CorpusFormat::Frequency.build(&lines)?;
    persistence::save_dict(&built, Path::new(dict_file))?;

    println!(
        "{} entries written to {} ({} lines checked, {} ignored, {} duplicates)",
        built.len(),
        dict_file,
        stats.lines,
        stats.ignored,
        stats.duplicates
    );
    Ok(())
}

/// Translates the given text, or stdin when no text argument is present.
fn translate(dict_file: &str, text: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let dict = persistence::load_with_cache(Path::new(dict_file))?;

    let shuffled = match text {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let translation = Translator::new(&dict).translate(&shuffled);
    if translation.text.is_empty() {
        println!("Text not found");
        return Ok(());
    }
    println!("{}", translation.text);

    let stats = &translation.stats;
    let summary = format!(
        "Stats: {} words translated ({}%), {} words unknown",
        stats.tokens_translated,
        stats.percent_translated(),
        stats.tokens_not_translated
    );
    eprintln!("{}", summary.dark_grey());
    Ok(())
}
