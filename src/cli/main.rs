use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use img2prompt::common::init_logger_exe;
use img2prompt::image2prompt::{DEFAULT_API_URL, DEFAULT_MODEL_NAME, DEFAULT_PROMPT};
use img2prompt::tensor::load_image_tensor;
use img2prompt::{ClientSettings, ImageToPromptNode};

#[derive(Parser)]
#[command(version, about = "A CLI tool to turn an image into a text prompt", long_about = None)]
struct Cli {
    #[arg(long, help = "input image (png, jpeg, webp, bmp, etc)")]
    image: PathBuf,
    #[arg(long, help = "chat-completion endpoint", default_value = DEFAULT_API_URL)]
    api_url: String,
    #[arg(long, help = "bearer token for the endpoint", default_value = "")]
    api_key: String,
    #[arg(long, help = "vision model name", default_value = DEFAULT_MODEL_NAME)]
    model_name: String,
    #[arg(long, help = "image detail level: high, low or auto", default_value = "high")]
    detail_level: String,
    #[arg(long, help = "instruction sent along with the image", default_value = DEFAULT_PROMPT)]
    prompt: String,
    #[arg(long, help = "request timeout in seconds", default_value_t = 30)]
    timeout: u64,
    #[arg(long, help = "skip TLS certificate verification")]
    insecure: bool,
}

fn main() -> Result<()> {
    init_logger_exe();
    let cli = Cli::parse();

    let tensor = load_image_tensor(&cli.image)?;
    log::info!("Loaded {} as tensor {:?}", cli.image.display(), tensor.shape());

    let settings = ClientSettings::new(Duration::from_secs(cli.timeout), !cli.insecure);
    let node = ImageToPromptNode::with_settings(settings);

    let (text,) = node.image_to_prompt(
        &tensor,
        &cli.api_url,
        &cli.api_key,
        &cli.model_name,
        cli.detail_level.as_str(),
        &cli.prompt,
    );
    println!("{}", text);

    Ok(())
}
