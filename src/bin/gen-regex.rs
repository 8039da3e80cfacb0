use std::process::ExitCode;

use dfa_synth::prelude::*;

use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("gen-regex")
    .about("reads words from stdin, one per line, and builds the minimal automaton and a regular expression accepting exactly these words")
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(["info", "debug", "trace"])
        .default_missing_value("info")
    )
    .arg(
        Arg::new("alphabet")
        .short('a')
        .long("alphabet")
        .help("the symbols words may consist of")
        .default_value("ab")
    )
    .arg(
        Arg::new("dot")
        .long("dot")
        .value_name("FILE")
        .help("write a DOT description of the automaton to FILE")
    )
    .arg(
        Arg::new("png")
        .long("png")
        .value_name("FILE")
        .help("render the automaton with graphviz into FILE")
    )
    .arg(
        Arg::new("no-regex")
        .long("no-regex")
        .action(ArgAction::SetTrue)
        .help("skip the synthesis of a regular expression")
    )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let alphabet = CharAlphabet::from(
        matches
            .get_one::<String>("alphabet")
            .map(String::as_str)
            .unwrap_or("ab"),
    );
    debug!("using alphabet {alphabet}");

    debug!("reading words from stdin");
    let words = read_words(std::io::stdin().lock())?;

    let start = std::time::Instant::now();
    let dfa = union_of_words(&alphabet, &words)?;
    info!(
        "building the automaton took {}µs",
        start.elapsed().as_micros()
    );

    println!("{}", dfa.stats());
    println!("{dfa}");

    if let Some(path) = matches.get_one::<String>("dot") {
        std::fs::write(path, dfa.dot_representation())?;
        info!("wrote DOT description to {path}");
    }

    if let Some(path) = matches.get_one::<String>("png") {
        render(&dfa, path)?;
    }

    if !matches.get_flag("no-regex") {
        let start = std::time::Instant::now();
        let regex = dfa.to_regex()?;
        info!(
            "synthesizing the regex took {}µs",
            start.elapsed().as_micros()
        );
        println!("regex: {regex}");
    }

    println!("\n\nValidation: ");
    println!("{}", words.len());
    for word in &words {
        println!("{}", dfa.accepts(word)?);
    }

    Ok(())
}

#[cfg(feature = "graphviz")]
fn render(dfa: &Dfa, path: &str) -> Result<(), std::io::Error> {
    let mut graph = DotGraph::new("DFA");
    dfa.plot(&mut graph)?;
    graph.render_to_file_name(path)?;
    info!("rendered automaton to {path}");
    Ok(())
}

#[cfg(not(feature = "graphviz"))]
fn render(_dfa: &Dfa, _path: &str) -> Result<(), std::io::Error> {
    Err(std::io::Error::other(
        "rendering requires the graphviz feature",
    ))
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
