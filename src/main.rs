use clap::{Parser, Subcommand};
use fimage::output::{self, ImageSummary};
use fimage::{ImageIo, config, parse_file_type};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fimage")]
#[command(about = "Read and write GIF, JPEG and PNG images by file path")]
#[command(long_about = "\
Read and write GIF, JPEG and PNG images by file path

The format is inferred from the file extension (gif, jpeg, jpg, png).
When reading, the decoder is chosen from the file content, so a PNG
saved with a .jpg name still opens.")]
#[command(version)]
struct Cli {
    /// Codec config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print each read/write step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the file type token parsed from a path
    Type { path: String },
    /// Decode an image and print its type, size and color model
    Info {
        path: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read an image and write it in the format of the output extension
    Convert { input: PathBuf, output: PathBuf },
    /// Print a stock config with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Type { path } => {
            println!("{}", parse_file_type(&path));
        }
        Command::Info { path, json } => {
            let summary = with_io(cli.config.as_deref(), cli.verbose, |io| {
                let image = io.read(&path)?;
                let file_type = parse_file_type(&path.to_string_lossy());
                Ok(ImageSummary::new(&path, &file_type, &image))
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_summary(&summary);
            }
        }
        Command::Convert { input, output } => {
            with_io(cli.config.as_deref(), cli.verbose, |io| {
                let image = io.read(&input)?;
                io.write(&image, &output)?;
                Ok(())
            })?;
            println!("{} → {}", input.display(), output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Build an `ImageIo` from the CLI flags and run `f` with it.
///
/// With `--verbose`, traces are forwarded over a channel to a printer thread
/// that writes them to stderr as they arrive.
fn with_io<T>(
    config_path: Option<&Path>,
    verbose: bool,
    f: impl FnOnce(&ImageIo) -> Result<T, Box<dyn std::error::Error>>,
) -> Result<T, Box<dyn std::error::Error>> {
    let codec_config = match config_path {
        Some(path) => config::load_config_strict(path)?,
        None => config::CodecConfig::default(),
    };
    let io = ImageIo::new().with_config(codec_config);

    if !verbose {
        return f(&io);
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for trace in rx {
            eprintln!("{}", output::format_trace(&trace));
        }
    });
    let io = io.with_sink(tx);
    let result = f(&io);
    // Dropping the sender ends the printer loop.
    drop(io);
    printer.join().ok();
    result
}
