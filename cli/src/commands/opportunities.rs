use anyhow::Result;
use accessatlas::{OpportunitySelection, Session};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::OpportunitiesArgs) -> Result<()> {
    let out_path = &args.output.clone().unwrap_or("./opportunities.csv".into());
    let mut session = Session::open(&cli.data_dir)?;

    let selection = OpportunitySelection { types: args.types.clone(), area: args.area.clone() };
    let Some(summary) = super::ready("opportunities", session.opportunities(&selection)?) else { return Ok(()) };

    println!("[opportunities] {}", summary.title());
    for count in &summary.counts {
        println!("[opportunities] {}: {}", count.opportunity_type, count.count);
    }

    println!("[opportunities] writing counts to {}", out_path.display());
    summary.write_csv(out_path)?;
    if let Some(path) = &args.geojson {
        summary.points.write_geojson(path)?;
    }
    if let Some(path) = &args.svg {
        summary.points.write_svg(path)?;
    }

    Ok(())
}
