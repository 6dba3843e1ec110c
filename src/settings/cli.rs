use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "quillpost", about = "Blog publishing API")]
pub struct Cli {
    /// Settings file, without or with the .toml extension.
    #[arg(long)]
    pub settings: Option<String>,
}
