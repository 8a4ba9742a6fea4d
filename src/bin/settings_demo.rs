use catalog::settings::*;

fn main() -> anyhow::Result<()> {
    // $ cargo run --bin settings_demo -- --settings=settings/release.toml
    let cli = Cli::parse();
    let project_settings = parse_settings(cli.settings.as_deref())?;
    println!("Loaded settings: {:#?}", project_settings);

    // Attempt to load from an invalid path (expected to fail)
    let is_err = parse_settings(Some("")).is_err();
    println!("Error on invalid path: {:?}", is_err);

    Ok(())
}
