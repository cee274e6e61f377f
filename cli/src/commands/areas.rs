use anyhow::Result;
use accessatlas::Session;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::AreasArgs) -> Result<()> {
    let mut session = Session::open(&cli.data_dir)?;

    let options = if args.curves {
        session.curve_municipalities()?
    } else if args.opportunity_types {
        session.opportunity_types()?
    } else {
        session.area_options()?
    };
    for option in options {
        println!("{}", option);
    }

    Ok(())
}
