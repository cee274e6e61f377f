use anyhow::Result;
use accessatlas::{AccessSelection, Session};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::AccessMapArgs) -> Result<()> {
    let out_path = &args.output.clone().unwrap_or("./access_map.geojson".into());
    let mut session = Session::open(&cli.data_dir)?;

    let selection = AccessSelection {
        area: args.area.clone(),
        mode: super::parse_mode(&args.mode)?,
        opportunity: args.opportunity.clone(),
        cutoff: args.cutoff.clone(),
        shared_bins: !args.own_intervals,
    };
    let Some(map) = super::ready("access-map", session.access_map(&selection)?) else { return Ok(()) };

    println!("[access-map] {} ({}): {} cells, class boundaries {:?}",
        map.choropleth.title, map.column, map.cells(), map.bins.boundaries());

    println!("[access-map] writing map to {}", out_path.display());
    map.choropleth.write_geojson(out_path)?;
    if let Some(svg) = &args.svg {
        println!("[access-map] rendering map to {}", svg.display());
        map.choropleth.write_svg(svg)?;
    }

    Ok(())
}
