// ABOUTME: Binary entry point for the view-interpolate CLI
// ABOUTME: Loads configuration from arguments and dispatches the chosen command

use anyhow::Result;
use view_interpolate::cli::App;

fn main() -> Result<()> {
    let (mut app, args) = App::from_args()?;

    app.run(args)?;

    Ok(())
}
