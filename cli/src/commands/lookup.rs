use std::sync::Arc;

use anyhow::{Context, Result};
use districtscope::{GeocodingClient, ReqwestClient};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::LookupArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let api_key = config.geocode.api_key.as_deref()
        .context("an API key is required (--api-key or DISTRICTSCOPE_API_KEY)")?;

    let http = Arc::new(ReqwestClient::new(config.geocode.timeout_secs)?);
    let client = GeocodingClient::new(http, &config.geocode.geocode_url, &config.geocode.civic_url)?;

    let location = client.resolve_coordinates(&args.address, api_key)
        .with_context(|| format!("geocoding {:?}", args.address))?;
    let display = location.to_display()?;
    let district = client.resolve_district(&args.address, args.district_type, api_key)
        .with_context(|| format!("looking up {} district", args.district_type))?;

    println!("lat/lon:  {:.6}, {:.6}", location.lat, location.lon);
    println!("mercator: {:.1}, {:.1}", display.x, display.y);
    println!("{}: {district}", args.district_type);
    Ok(())
}
