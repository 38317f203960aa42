//! voicecast main entry point
//!
//! Loads a script (file, `--text`, or stdin), reads it aloud with one
//! voice per character, then saves the recording next to it.

use clap::Parser;
use log::{debug, error, info, warn};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use voicecast::audio::{output_file_name, OutputFormat};
use voicecast::cast::VoiceMode;
use voicecast::script::{parse_script, ScriptSource};
use voicecast::speech::{create_synth, Backend};
use voicecast::state::config::{Config, Overrides, PITCH_RANGE, RATE_RANGE};
use voicecast::state::Session;
use voicecast::{Result, VoicecastError};

/// Read dialogue scripts aloud with a distinct voice per character
#[derive(Parser)]
#[command(name = "voicecast")]
#[command(version)]
#[command(about = "Read dialogue scripts aloud with a distinct voice per character", long_about = None)]
struct Cli {
    /// Script file ("Name: line" or narration, one per line)
    file: Option<PathBuf>,

    /// Script text to read instead of a file
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// Speech rate in words per minute
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(RATE_RANGE.0 as i64..=RATE_RANGE.1 as i64))]
    rate: Option<u16>,

    /// Voice pitch (100 = normal)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(PITCH_RANGE.0 as i64..=PITCH_RANGE.1 as i64))]
    pitch: Option<u16>,

    /// Voice selection: dynamic, male or female
    #[arg(short = 'm', long)]
    voice_mode: Option<VoiceMode>,

    /// Saved audio format: wav or mp3
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Where to save the recording (default: named after the script)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Speech engine: auto, native or espeak
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Don't play the script aloud
    #[arg(long)]
    no_play: bool,

    /// Don't save a recording
    #[arg(long)]
    no_save: bool,

    /// Remember this run's rate, pitch, voice mode, backend and format
    #[arg(long)]
    save_settings: bool,

    /// List the engine's voices and exit
    #[arg(long)]
    list_voices: bool,

    /// Write debug logs to voicecast.log
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        match e {
            VoicecastError::EmptyInput => eprintln!("Error: {}", e),
            _ => {
                error!("Fatal error: {}", e);
                eprintln!("voicecast: {}", e);
            }
        }
        process::exit(1);
    }
}

fn init_logging(debug_mode: bool) {
    if debug_mode {
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("voicecast.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open voicecast.log for debug logging: {}", e);
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .init();
            }
        }

        info!(
            "voicecast version {} starting (debug mode, logging to voicecast.log)",
            voicecast::VERSION
        );
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Warn)
            .init();
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    debug!("Config loaded from {:?}", config.path());

    let mut settings = config.settings();
    settings.apply_overrides(&Overrides {
        rate: cli.rate,
        pitch: cli.pitch,
        voice_mode: cli.voice_mode,
        backend: cli.backend,
        format: cli.format,
    });

    if cli.save_settings {
        config.store(&settings);
        config.save()?;
        info!("Settings saved to {:?}", config.path());
    }

    if cli.list_voices {
        let session = Session::new(create_synth(settings.backend)?, settings)?;
        for (i, voice) in session.voices().iter().enumerate() {
            println!("{:3}  {}", i, voice);
        }
        return Ok(());
    }

    let source = match (cli.file, cli.text) {
        (Some(path), _) => ScriptSource::from_file(path)?,
        (None, Some(text)) => ScriptSource::from_text(text),
        (None, None) => {
            if io::stdin().is_terminal() {
                eprintln!("Paste the script, then press Ctrl+D:");
            }
            ScriptSource::from_reader(io::stdin().lock())?
        }
    };

    let script = parse_script(source.text()?);

    let synth = create_synth(settings.backend)?;
    let mut session = Session::new(synth, settings)?;

    if !cli.no_play {
        let spoken = session.perform_each(&script, |line| {
            println!("Converting {}'s line to speech: {}", line.speaker, line.text)
        });
        if let Err(e) = spoken {
            silence(&mut session);
            return Err(e);
        }
    }

    for (speaker, voice) in session.cast().iter() {
        info!("{} -> {}", speaker, voice);
    }

    if !cli.no_save {
        let output = match cli.output {
            Some(path) => path,
            None => session
                .settings()
                .output_dir
                .join(output_file_name(&source, session.settings().format)),
        };
        let saved = match session.render(&script, &output) {
            Ok(saved) => saved,
            Err(e) => {
                silence(&mut session);
                return Err(e);
            }
        };
        println!("Audio saved as '{}'.", saved.display());
    }

    Ok(())
}

/// Cut off any speech still queued after a failure
fn silence(session: &mut Session) {
    if let Err(e) = session.stop() {
        warn!("Failed to stop speech: {}", e);
    }
}
