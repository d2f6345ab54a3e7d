use std::io::Write;

use anyhow::Context;
use ecsass::parser::parse;
use log::info;

/// Parses the recipe without resolving any files and prints its canonical
/// form.
pub fn check<W: Write>(recipe: &str, mut writer: W) -> anyhow::Result<()> {
    let expr = parse(recipe).context("The recipe is invalid")?;
    info!("The recipe is valid");

    writeln!(writer, "{}", expr)?;
    writer.flush()?;

    Ok(())
}
