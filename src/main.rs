use std::io::{BufWriter, Stdout, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show as ShowCursor},
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use fireshow::color::Rgb;
use fireshow::config::{Mode, ShowConfig};
use fireshow::display::Surface;
use fireshow::sim::Show;
use fireshow::term::TermDisplay;

/// Terminal fireworks show with rockets, layered explosion styles, and
/// celebration text overlays.
#[derive(Parser)]
#[command(name = "fireshow", version, about)]
struct Args {
    /// Explosion style fired at rocket apex
    #[arg(value_enum)]
    mode: Option<Mode>,

    /// TOML config file; flags override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed the simulation for a reproducible show
    #[arg(long)]
    seed: Option<u64>,

    /// Phrase spelled out by the cartoon letters
    #[arg(long)]
    phrase: Option<String>,

    /// Disable automatic rocket launches
    #[arg(long)]
    no_auto: bool,

    /// Background color as RRGGBB hex (e.g. 1a1b26)
    #[arg(long, value_name = "RRGGBB")]
    bg_color: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ShowConfig::load(path)?,
        None => ShowConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(phrase) = args.phrase {
        config.phrase = phrase;
    }
    if args.no_auto {
        config.auto_launch = false;
    }
    if let Some(hex) = &args.bg_color {
        config.backdrop = Rgb::from_hex(hex)
            .with_context(|| format!("invalid hex color {hex:?}, expected RRGGBB"))?;
    }

    run(config, args.seed)
}

fn run(config: ShowConfig, seed: Option<u64>) -> anyhow::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = show_loop(&mut stdout, config, seed);

    execute!(stdout, ShowCursor, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

fn show_loop(
    stdout: &mut BufWriter<Stdout>,
    config: ShowConfig,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size()?;
    let backdrop = config.backdrop;
    let mut canvas = TermDisplay::new(cols, rows, backdrop);
    let mut show = match seed {
        Some(seed) => Show::with_rng(
            config,
            canvas.width(),
            canvas.height(),
            fastrand::Rng::with_seed(seed),
        ),
        None => Show::new(config, canvas.width(), canvas.height()),
    };

    let mut last_frame = Instant::now();
    let mut pending = 0.0f32; // simulation ticks not yet stepped

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char(' ') | KeyCode::Enter => show.launch(None),
                    KeyCode::Char('a') => show.toggle_auto(),
                    KeyCode::Char('1') => show.set_mode(Mode::Real),
                    KeyCode::Char('2') => show.set_mode(Mode::Cartoon),
                    KeyCode::Char('3') => show.set_mode(Mode::Premium),
                    KeyCode::Char('4') => show.set_mode(Mode::Mixed),
                    _ => {}
                },
                Event::Resize(cols, rows) => {
                    canvas = TermDisplay::new(cols, rows, backdrop);
                    show.resize(canvas.width(), canvas.height());
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        pending += frame_time * 60.0 * show.config().time_scale;
        if pending > show.config().max_step {
            pending = show.config().max_step;
        }
        while pending >= 1.0 {
            show.step(1.0, &mut canvas);
            pending -= 1.0;
        }

        canvas.render(stdout)?;
    }

    Ok(())
}
