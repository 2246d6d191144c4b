use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use moodwave::{AudioAnalysis, AudioAnalyzer as _, FrameRenderer as _, MoodLabel, StrategyKind};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

#[derive(Parser, Debug)]
#[command(name = "moodwave", version)]
struct Cli {
    /// Log at DEBUG instead of INFO.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 visualization of an audio window (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame of one strategy as a PNG.
    Frame(FrameArgs),
    /// Print tempo, beats and window length of an audio file as JSON.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct WindowArgs {
    /// Window start in seconds.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Window end in seconds (defaults to the end of the file).
    #[arg(long)]
    end: Option<f64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Source audio file.
    #[arg(long)]
    audio: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Output frame rate.
    #[arg(long, default_value_t = 24)]
    fps: u32,

    #[command(flatten)]
    window: WindowArgs,

    /// Mood label; unknown names fall back to neutral.
    #[arg(long, conflicts_with = "lyrics")]
    mood: Option<String>,

    /// Lyrics file classified with the built-in keyword lexicon.
    #[arg(long)]
    lyrics: Option<PathBuf>,

    /// Seed for strategy selection and particles.
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Source audio file to analyse.
    #[arg(long, conflicts_with = "analysis", required_unless_present = "analysis")]
    audio: Option<PathBuf>,

    /// Pre-computed analysis JSON.
    #[arg(long)]
    analysis: Option<PathBuf>,

    /// Timestamp in seconds.
    #[arg(long)]
    t: f64,

    /// Strategy to draw with.
    #[arg(long)]
    strategy: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Mood label; unknown names fall back to neutral.
    #[arg(long, default_value = "neutral")]
    mood: String,

    /// Seed for particle spawning.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Source audio file.
    #[arg(long)]
    audio: PathBuf,

    #[command(flatten)]
    window: WindowArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Analyze(args) => cmd_analyze(args),
    }
}

fn analyze(audio: &Path, window: &WindowArgs) -> anyhow::Result<AudioAnalysis> {
    let mut analyzer = moodwave::FfmpegAnalyzer::default();
    Ok(analyzer.analyze(audio, window.start, window.end)?)
}

fn read_analysis_json(path: &Path) -> anyhow::Result<AudioAnalysis> {
    let f = File::open(path).with_context(|| format!("open analysis '{}'", path.display()))?;
    let analysis: AudioAnalysis =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse analysis JSON")?;
    Ok(analysis)
}

fn resolve_mood(mood: Option<&str>, lyrics: Option<&Path>) -> anyhow::Result<MoodLabel> {
    if let Some(m) = mood {
        return Ok(MoodLabel::parse_lossy(m));
    }
    let text = match lyrics {
        Some(p) => Some(
            std::fs::read_to_string(p)
                .with_context(|| format!("read lyrics '{}'", p.display()))?,
        ),
        None => None,
    };
    let mut classifier = moodwave::LexiconMoodClassifier::default();
    Ok(moodwave::mood_for_lyrics(&mut classifier, text.as_deref())?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let analysis = analyze(&args.audio, &args.window)?;
    let mood = resolve_mood(args.mood.as_deref(), args.lyrics.as_deref())?;

    let mut director = moodwave::VisualizationDirector::new(moodwave::DirectorOpts {
        seed: args.seed,
        overwrite: !args.no_overwrite,
    });
    let out = director.render_video(&args.audio, &analysis, mood, args.fps, &args.out)?;
    println!("{}", out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let analysis = match (&args.analysis, &args.audio) {
        (Some(json), _) => read_analysis_json(json)?,
        (None, Some(audio)) => analyze(audio, &WindowArgs {
            start: 0.0,
            end: None,
        })?,
        (None, None) => anyhow::bail!("one of --audio or --analysis is required"),
    };
    let kind: StrategyKind = args.strategy.parse()?;
    let mood = MoodLabel::parse_lossy(&args.mood);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut renderer = moodwave::renderer_for(kind, &analysis, mood, &mut rng)?;
    let frame = renderer.render(args.t)?;
    frame.save_png(&args.out)?;

    tracing::info!(
        strategy = %kind,
        mood = %mood,
        t = args.t,
        out = %args.out.display(),
        "frame written"
    );
    Ok(())
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let analysis = analyze(&args.audio, &args.window)?;
    let summary = serde_json::json!({
        "tempo_bpm": analysis.tempo_bpm,
        "beat_times": analysis.beat_times,
        "duration_secs": analysis.duration_secs(),
        "sample_rate": analysis.sample_rate,
        "offset_secs": analysis.offset_secs,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
