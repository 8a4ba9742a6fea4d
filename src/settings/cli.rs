use super::Parser;

#[derive(Parser, Debug)]
#[command(about = "Product catalog HTTP service")]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
