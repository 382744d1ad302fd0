//! tap2junit - Convert TAP test output on stdin into JUnit XML on stdout

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;
use tap2junit::commands::ConvertCommand;
use tap2junit::config::{Overrides, Settings};
use tap2junit::error::Result;
use tap2junit::ui::CliUI;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tap2junit")]
#[command(about = "Convert TAP test output on stdin into JUnit XML on stdout", long_about = None)]
struct Cli {
    /// Name of the test run, used as the JUnit suite name
    #[arg(long = "test_name", env = "TAP2JUNIT_TEST_NAME")]
    test_name: Option<String>,

    /// Attribute duration annotations to the test that follows them
    #[arg(
        long = "reorder_duration",
        env = "TAP2JUNIT_REORDER_DURATION",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    reorder_duration: Option<bool>,

    /// Attribute every annotation to the test that follows it
    #[arg(
        long = "reorder_all",
        env = "TAP2JUNIT_REORDER_ALL",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    reorder_all: Option<bool>,

    /// Write a single <testsuite> element instead of <testsuites>
    #[arg(
        long = "single_suite",
        env = "TAP2JUNIT_SINGLE_SUITE",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    single_suite: Option<bool>,

    /// Read settings from an INI file ([DEFAULT] section)
    #[arg(long, env = "TAP2JUNIT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => Settings::load_from_file(path)?,
            None => Settings::default(),
        };
        Ok(file.merge(Overrides {
            test_name: self.test_name.clone(),
            reorder_duration: self.reorder_duration,
            reorder_all: self.reorder_all,
            single_suite: self.single_suite,
        }))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn run(cli: &Cli) -> Result<i32> {
    let cmd = ConvertCommand::new(cli.settings()?);
    let mut ui = CliUI::new();
    cmd.execute(io::stdin().lock(), &mut ui)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
