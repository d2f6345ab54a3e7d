#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use cmd::{assemble, batch, check};
use human_panic::setup_panic;
use itertools::Itertools;
use lazy_static::lazy_static;
use log::info;

use crate::logging::init_logging;
use crate::opts::{sequence_folders, OutputWriter};
use crate::progress_bar::RowProgressBar;

mod cli;
mod cmd;
mod logging;
mod opts;
mod progress_bar;
mod report;

lazy_static! {
    pub(crate) static ref PROGRESS_BAR: RowProgressBar = RowProgressBar::new();
}

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();

    if !cli.no_progress {
        PROGRESS_BAR.show();
    }

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Assemble {
            recipe,
            folders,
            output,
            name,
            width,
            overlap,
        } => {
            let folders = sequence_folders(folders)?;
            info!("Sequence folders: {}", folders.iter().map(|x| x.display()).join(", "));
            let params = overlap.evaluator_params()?;
            let output = OutputWriter::from_path(output)?;

            assemble::assemble(recipe, folders, params, output.into_write(), name, *width)
                .context("Failed to assemble given recipe")?;
        }
        Commands::Batch {
            input,
            folders,
            output,
            name_column,
            recipe_column,
            has_header,
            skip_errors,
            mask,
            report,
            threads,
            width,
            overlap,
        } => {
            let folders = sequence_folders(folders)?;
            info!("Sequence folders: {}", folders.iter().map(|x| x.display()).join(", "));
            let params = overlap.evaluator_params()?;
            let reader = input.as_reader()?;
            let output = OutputWriter::from_path(output)?;

            let options = batch::BatchOptions {
                name_column: *name_column as usize - 1,
                recipe_column: *recipe_column as usize - 1,
                has_header: *has_header,
                skip_errors: *skip_errors,
                mask: *mask,
                threads: *threads,
                width: *width,
            };
            batch::batch(
                reader.into_read(),
                output.into_write(),
                folders,
                params,
                &options,
                report.as_deref(),
            )
            .context("Failed to assemble given table")?;
        }
        Commands::Check { recipe } => {
            check::check(recipe, std::io::stdout()).context("Failed to check given recipe")?;
        }
    }

    PROGRESS_BAR.finish();
    Ok(())
}
