//! CLI argument parsing with clap.

use clap::Parser;

/// Gemini/Imagen image generation node, run from the command line.
#[derive(Parser, Debug)]
#[command(name = "simple-gemini", version, about)]
pub struct Cli {
    /// Text prompt describing the desired image.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// API key (falls back to `[keys] gemini` in the config file).
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Model name or short alias.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Input image for multimodal models; repeat to pass several, in order.
    #[arg(short, long = "image")]
    pub images: Vec<String>,

    /// Proxy for HTTP and HTTPS traffic (e.g., `http://127.0.0.1:7890`).
    #[arg(long)]
    pub proxy_url: Option<String>,

    /// Aspect ratio: 1:1, 16:9, 9:16, 4:3, 3:4.
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Number of images to request (text-to-image models only).
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Output format: png, jpeg, webp.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Print the node descriptor as JSON and exit.
    #[arg(long)]
    pub describe: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither prompt nor prompt-file is provided,
    /// or if the file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a prompt string or use -p/--prompt-file",
            ))
        }
    }
}
