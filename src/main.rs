use clap::Parser;
use cql_db::cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
