use anyhow::Result;
use accessatlas::{DegeneratePolicy, PalmaScale, PalmaSelection, Session};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::PalmaArgs) -> Result<()> {
    let out_path = &args.output.clone().unwrap_or("./palma_ranking.csv".into());
    let mut session = Session::open(&cli.data_dir)?;

    let selection = PalmaSelection {
        mode: super::parse_mode(&args.mode)?,
        opportunity: args.opportunity.clone(),
        cutoff: args.cutoff.clone(),
    };
    let policy = if args.drop_degenerate { DegeneratePolicy::Drop } else { DegeneratePolicy::Flag };
    let scale = if args.narrow_scale { PalmaScale::Narrow } else { PalmaScale::Wide };
    let Some(view) = super::ready("palma", session.palma(&selection, policy, scale)?) else { return Ok(()) };

    let presentation = &view.presentation;
    println!("[palma] {}: {} ranked, {} flagged", view.choropleth.title, presentation.ranked.len(), presentation.flagged.len());
    for row in presentation.ranked.iter().take(5) {
        println!("[palma] {:>3}. {} {:.2}", row.rank, row.municipality, row.ratio);
    }

    println!("[palma] writing ranking to {}", out_path.display());
    view.write_ranking_csv(out_path)?;
    if let Some(path) = &args.flagged {
        view.write_flagged_csv(path)?;
    }
    if let Some(path) = &args.geojson {
        view.choropleth.write_geojson(path)?;
    }
    if let Some(path) = &args.svg {
        println!("[palma] rendering map to {}", path.display());
        view.choropleth.write_svg(path)?;
    }

    Ok(())
}
