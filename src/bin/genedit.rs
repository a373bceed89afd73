//! CLI for GenEdit - AI image editing.

use clap::{Args, Parser, Subcommand, ValueEnum};
use genedit::config::redact;
use genedit::{
    AspectRatio, ChatEditProvider, ChatEditProviderBuilder, EditRequest, EditorConfig,
    GeneratedContent, ImageEditor, ImageFormat, ImageInput, MaskInput, ProgressCallback,
    SimulatedVideoProvider, VideoGenerationRequest, VideoProvider,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "genedit")]
#[command(about = "Edit images through a multimodal chat-completion API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit an image with a text instruction
    Edit(EditArgs),

    /// Simulate a video from a prompt (returns a still image)
    Video(VideoArgs),

    /// Show the resolved configuration
    Config,
}

#[derive(Args)]
struct EditArgs {
    /// The edit instruction
    instruction: String,

    /// Image to edit
    #[arg(short, long)]
    input: PathBuf,

    /// Mask restricting the edit (PNG)
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Secondary reference image
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct VideoArgs {
    /// The text prompt describing the video
    prompt: String,

    /// Optional source image
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Aspect ratio hint
    #[arg(long, value_enum)]
    aspect_ratio: Option<AspectRatioArg>,

    /// Where to save the generated still image
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AspectRatioArg {
    #[value(name = "1:1")]
    Square,
    #[value(name = "16:9")]
    Landscape,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "4:3")]
    Standard,
    #[value(name = "3:4")]
    StandardPortrait,
    #[value(name = "21:9")]
    Ultrawide,
}

impl From<AspectRatioArg> for AspectRatio {
    fn from(arg: AspectRatioArg) -> Self {
        match arg {
            AspectRatioArg::Square => AspectRatio::Square,
            AspectRatioArg::Landscape => AspectRatio::Landscape,
            AspectRatioArg::Portrait => AspectRatio::Portrait,
            AspectRatioArg::Standard => AspectRatio::Standard,
            AspectRatioArg::StandardPortrait => AspectRatio::StandardPortrait,
            AspectRatioArg::Ultrawide => AspectRatio::Ultrawide,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    // Missing key or base URL aborts here, before any request.
    let config = EditorConfig::from_env()?;

    match cli.command {
        Commands::Edit(args) => {
            let provider = ChatEditProviderBuilder::from_config(&config).build()?;
            edit_image(&provider, args, cli.json).await?;
        }
        Commands::Video(args) => {
            let provider = ChatEditProviderBuilder::from_config(&config).build()?;
            let video = SimulatedVideoProvider::new(provider).with_locale(config.locale);
            generate_video(&video, args, cli.json).await?;
        }
        Commands::Config => {
            show_config(&config, cli.json)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_image(path: &Path) -> anyhow::Result<ImageInput> {
    let data = std::fs::read(path)?;
    let detected = ImageFormat::from_magic_bytes(&data);
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension);
    match (detected, by_extension) {
        (None, None) => anyhow::bail!("unrecognized image format: {}", path.display()),
        (_, Some(ext_format)) => Ok(ImageInput::from_bytes_or(&data, ext_format)),
        (Some(_), None) => Ok(ImageInput::from_bytes(&data)),
    }
}

async fn edit_image(
    provider: &ChatEditProvider,
    args: EditArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    let mut request = EditRequest::new(read_image(&args.input)?, &args.instruction);
    if let Some(ref mask) = args.mask {
        request = request.with_mask(MaskInput::from_bytes(&std::fs::read(mask)?));
    }
    if let Some(ref reference) = args.reference {
        request = request.with_secondary_image(read_image(reference)?);
    }

    let content = provider.edit(&request).await?;
    let size = save_content(&content, &args.output).await?;
    report(&content, Some(&args.output), size, json_output)
}

async fn generate_video(
    provider: &SimulatedVideoProvider<ChatEditProvider>,
    args: VideoArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    let mut request = VideoGenerationRequest::new(&args.prompt);
    if let Some(ref input) = args.input {
        request = request.with_image(read_image(input)?);
    }
    if let Some(ar) = args.aspect_ratio {
        request = request.with_aspect_ratio(ar.into());
    }

    let on_progress: ProgressCallback = Arc::new(move |pct: u8| {
        if !json_output {
            eprintln!("progress: {pct}%");
        }
    });
    let content = provider.generate(&request, Some(&on_progress)).await?;

    let size = match args.output {
        Some(ref path) => Some(save_content(&content, path).await?),
        None => None,
    };
    report(&content, args.output.as_ref(), size.flatten(), json_output)
}

/// Writes the image to `path`, downloading it first when it is a remote URL.
async fn save_content(content: &GeneratedContent, path: &Path) -> anyhow::Result<Option<usize>> {
    if let Some((_, data)) = content.decode_inline_image()? {
        std::fs::write(path, &data)?;
        return Ok(Some(data.len()));
    }

    let Some(url) = content.image_url.as_deref() else {
        return Ok(None);
    };
    let response = reqwest::get(url).await?;
    if !response.status().is_success() {
        anyhow::bail!("failed to download image ({}): {url}", response.status());
    }
    let data = response.bytes().await?;
    std::fs::write(path, &data)?;
    Ok(Some(data.len()))
}

fn report(
    content: &GeneratedContent,
    output: Option<&PathBuf>,
    size: Option<usize>,
    json_output: bool,
) -> anyhow::Result<()> {
    if json_output {
        let result = serde_json::json!({
            "success": true,
            "output": output.map(|p| p.display().to_string()),
            "size_bytes": size,
            "image_url": content.image_url.as_deref().map(summarize_url),
            "text": content.text,
            "video_url": content.video_url,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if let Some(path) = output {
            println!(
                "Saved image: {} ({} bytes)",
                path.display(),
                size.unwrap_or_default()
            );
        }
        if let Some(ref text) = content.text {
            println!("{text}");
        }
    }

    Ok(())
}

fn summarize_url(url: &str) -> String {
    let chars = url.chars().count();
    if url.starts_with("data:") && chars > 64 {
        let head: String = url.chars().take(48).collect();
        format!("{head}... ({chars} chars)")
    } else {
        url.to_string()
    }
}

fn show_config(config: &EditorConfig, json_output: bool) -> anyhow::Result<()> {
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| genedit::image::providers::DEFAULT_MODEL.to_string());

    if json_output {
        let result = serde_json::json!({
            "api_key": redact(&config.api_key),
            "base_url": config.base_url,
            "model": model,
            "locale": config.locale,
            "alt_api_key": config.alt_api_key.as_deref().map(redact),
            "watermark": {
                "enabled": config.watermark.enabled,
                "text": config.watermark.text,
            },
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("API key:    {}", redact(&config.api_key));
        println!("Base URL:   {}", config.base_url);
        println!("Model:      {model}");
        println!("Locale:     {}", config.locale);
        if let Some(ref alt) = config.alt_api_key {
            println!("Alt key:    {}", redact(alt));
        }
        let watermark = if config.watermark.enabled { "on" } else { "off" };
        println!("Watermark:  {watermark}");
        if let Some(ref text) = config.watermark.text {
            println!("  text:     {text}");
        }
    }

    Ok(())
}
