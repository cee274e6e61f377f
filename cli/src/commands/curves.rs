use anyhow::Result;
use accessatlas::{access::MAX_AXIS_MINUTES, CurveComparison, CurveSelection, Session};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::CurvesArgs) -> Result<()> {
    let out_path = &args.output.clone().unwrap_or("./curves.csv".into());
    let mut session = Session::open(&cli.data_dir)?;
    let max_minutes = args.max_minutes.min(MAX_AXIS_MINUTES);

    let outcome = if args.compare.is_empty() {
        let selection = CurveSelection {
            max_minutes,
            ..CurveSelection::new(args.municipalities.clone())
        };
        session.cumulative_curves(&selection)?
    } else {
        session.compare_curves(&CurveComparison {
            first: args.municipalities.clone(),
            second: args.compare.clone(),
            max_minutes: Some(max_minutes),
        })?
    };
    let Some(curves) = super::ready("curves", outcome) else { return Ok(()) };

    println!("[curves] {}", curves.title);
    for group in curves.groups() {
        for mode in &session.config().vocabulary.modes {
            if let Some(share) = curves.share(group, *mode, max_minutes) {
                println!("[curves] {} / {}: {:.1}% within {} min", group, mode, share * 100.0, max_minutes);
            }
        }
    }

    println!("[curves] writing curves to {}", out_path.display());
    curves.write_csv(out_path)?;

    Ok(())
}
