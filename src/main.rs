use clap::{Parser, Subcommand};
use rsketch::logger;
use rsketch::{
    AspectRatio, Config, FileStore, GeminiClient, KeyValueStore, LineWeight, Saturation,
    SketchError, SketchHistory, SketchImage, SketchRequest, SketchSession, SketchStyle,
    StyleParams,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Turn text into a hand-drawn visual-note sketch
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a sketch and add it to the history
    Generate {
        /// Text to visualize; read from stdin when omitted
        text: Option<String>,

        /// Title used verbatim as the sketch's focal subject
        #[arg(short, long, default_value = "")]
        title: String,

        /// One of 9:16, 16:9, 1:1, 4:3, 9:21
        #[arg(short, long, default_value = "9:16")]
        aspect_ratio: AspectRatio,

        /// colored-pencil, pencil or charcoal
        #[arg(short, long, default_value = "colored-pencil")]
        style: SketchStyle,

        /// thin, regular or bold (pencil and charcoal)
        #[arg(long, default_value = "regular")]
        line_weight: LineWeight,

        /// low, medium or high (colored-pencil)
        #[arg(long, default_value = "medium")]
        saturation: Saturation,

        /// Where to write the image; defaults to sketch.<ext>
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List past generations, most recent first
    History,
    /// Save the image of a past generation and print its inputs
    Show {
        id: i64,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove every history entry
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_file_loaded = dotenv::dotenv().is_ok();
    let args = Args::parse();
    let config = Config::from_env();
    let mut logger_config = config.logger_config();
    if args.verbose {
        logger_config = logger_config.with_level(logger::LogLevel::Debug);
    }
    if let Err(e) = logger::init_with_config(logger_config) {
        eprintln!("{}", e);
    }
    if env_file_loaded {
        log::debug!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }
    logger::log_config_info(&config);

    match run(args.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: Config) -> rsketch::Result<()> {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.history_dir));

    match command {
        Command::Generate {
            text,
            title,
            aspect_ratio,
            style,
            line_weight,
            saturation,
            output,
        } => {
            // fatal before anything else happens
            config.validate()?;
            let client = GeminiClient::new(&config.gemini)?;

            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            let request = SketchRequest::new(text)
                .with_title(title)
                .with_aspect_ratio(aspect_ratio)
                .with_style(style)
                .with_style_params(
                    StyleParams::empty()
                        .with_line_weight(line_weight)
                        .with_saturation(saturation),
                );

            let history = SketchHistory::load(store).await;
            let mut session = SketchSession::new(client.sketch_generator(), history);
            let entry = session.generate(&request).await?;

            let image = SketchImage::parse_data_uri(&entry.image_url)?;
            let path = output.unwrap_or_else(|| PathBuf::from(image.suggested_file_name()));
            image.save_to(&path).await?;
            println!("{}\t{}", entry.id, path.display());
        }
        Command::History => {
            let history = SketchHistory::load(store).await;
            if history.is_empty() {
                println!("No sketches yet.");
            }
            for entry in history.entries() {
                println!(
                    "{}\t{}\t[{}]",
                    entry.id,
                    entry.display_label(),
                    entry.badges().join(", ")
                );
            }
        }
        Command::Show { id, output } => {
            let history = SketchHistory::load(store).await;
            let entry = history.get(id).ok_or_else(|| {
                SketchError::InvalidInput(format!("no history entry with id {}", id))
            })?;
            let image = SketchImage::parse_data_uri(&entry.image_url)?;
            let path = output.unwrap_or_else(|| PathBuf::from(image.suggested_file_name()));
            image.save_to(&path).await?;
            println!("{}", serde_json::to_string_pretty(&entry.to_request())?);
        }
        Command::Clear => {
            let mut history = SketchHistory::load(store).await;
            history.clear().await?;
            println!("History cleared.");
        }
    }
    Ok(())
}

fn read_stdin() -> rsketch::Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| SketchError::InvalidInput(format!("failed to read text from stdin: {}", e)))?;
    Ok(text)
}

fn report(error: &SketchError) {
    let classified = error.classify();
    eprintln!("❌ {}", classified.title);
    eprintln!("   {}", classified.user_message);
    if let Some(detail) = classified.visible_detail() {
        eprintln!("   {}", detail);
    }
    log::debug!("Full error: {:?}", error);
}
