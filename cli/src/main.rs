use tracing_subscriber::EnvFilter;

mod cli;
mod os;

use os::StdOs;

fn main() -> anyhow::Result<()> {
    let args = cli::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let generator = mkgen::Generator::new(StdOs, args.config()?);

    if args.dry_run {
        print!("{}", generator.render()?);
        return Ok(());
    }

    let path = generator.generate()?;
    println!("Generated {path}");

    Ok(())
}
