use anyhow::{Context, Result};
use districtscope::{Command, Outcome, Session};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let mut config = super::load_config(cli)?;
    if let Some(district_type) = args.district_type {
        config.initial_district_type = districtscope::DistrictTypeKey(district_type);
    }
    let out_path = super::output_path(&args.output);

    let mut session = Session::open(&config, &out_path).context("opening session")?;
    let focused = match &args.focus {
        Some(id) => session.handle(Command::FocusDistrict(id.clone()))
            .with_context(|| format!("focusing district {id}"))?,
        None => Outcome::Unchanged,
    };
    // A focus that changed the view has already been written by the renderer.
    if focused != Outcome::Updated {
        session.handle(Command::Render).context("rendering view")?;
    }

    println!("[render] {} -> {}", session.explorer().district_type(), out_path.display());
    Ok(())
}
