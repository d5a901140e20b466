// yeargrid-render: render year-progress images from the command line.
//
// Usage:
//   yeargrid-render wallpaper --font <face.ttf> [-o wallpaper.png] [options]
//   yeargrid-render grid [-o grid.png] [options]
//   yeargrid-render widget [-o widget.png] [options]
//   yeargrid-render info [--date YYYY-MM-DD] [--time HH:MM:SS]
//   yeargrid-render compare <a.png> <b.png> [-d diff.png]

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use log::info;
use yeargrid::{
    compute_calendar_info, render_dot_grid, render_wallpaper, TrueTypeFont, WallpaperSettings,
    WallpaperTarget, WidgetSnapshot, YearSummary,
};
use yeargrid_render::{
    compare_images, diff_image, load_png, load_settings, resolve_timestamp, save_png,
};

#[derive(Debug, Parser)]
#[command(name = "yeargrid-render", version, about = "Render year-progress dot grids")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Full wallpaper: black background, dots, and summary text.
    Wallpaper {
        #[command(flatten)]
        render: RenderArgs,
        #[command(flatten)]
        canvas: CanvasArgs,
        /// TrueType/OpenType font for the summary text.
        #[arg(long)]
        font: PathBuf,
        #[arg(short, long, default_value = "wallpaper.png")]
        output: PathBuf,
    },
    /// Dots only, on a transparent canvas.
    Grid {
        #[command(flatten)]
        render: RenderArgs,
        #[command(flatten)]
        canvas: CanvasArgs,
        #[arg(short, long, default_value = "grid.png")]
        output: PathBuf,
    },
    /// 1024x1024 widget image; the widget's text is printed to stdout.
    Widget {
        #[command(flatten)]
        render: RenderArgs,
        #[arg(short, long, default_value = "widget.png")]
        output: PathBuf,
    },
    /// Print calendar position and summary text.
    Info {
        #[command(flatten)]
        when: WhenArgs,
    },
    /// Compare two PNG images pixel by pixel; exits 1 if they differ.
    Compare {
        a: PathBuf,
        b: PathBuf,
        /// Write a visual diff image here.
        #[arg(short, long)]
        diff: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct WhenArgs {
    /// Render for this local date instead of today.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Time of day for --date (default 00:00:00).
    #[arg(long, requires = "date")]
    time: Option<NaiveTime>,
}

#[derive(Debug, Args)]
struct CanvasArgs {
    #[arg(long, default_value_t = 1080)]
    width: u32,
    #[arg(long, default_value_t = 2400)]
    height: u32,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    when: WhenArgs,
    /// JSON preferences file.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Primary color, #RRGGBB or #AARRGGBB.
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    dot_scale: Option<f32>,
    #[arg(long)]
    spacing_scale: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    vertical_offset: Option<f32>,
    #[arg(long)]
    grid_scale: Option<f32>,
    #[arg(long)]
    columns: Option<i64>,
}

impl RenderArgs {
    fn settings(&self) -> Result<WallpaperSettings> {
        let mut s = load_settings(self.settings.as_deref())?;
        if let Some(c) = &self.color {
            s.color = c.clone();
        }
        if let Some(v) = self.dot_scale {
            s.dot_scale = v;
        }
        if let Some(v) = self.spacing_scale {
            s.spacing_scale = v;
        }
        if let Some(v) = self.vertical_offset {
            s.vertical_offset = v;
        }
        if let Some(v) = self.grid_scale {
            s.grid_scale = v;
        }
        if let Some(v) = self.columns {
            s.grid_columns = v;
        }
        Ok(s)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e:#}");
        process::exit(2);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Wallpaper {
            render,
            canvas,
            font,
            output,
        } => cmd_wallpaper(&render, &canvas, &font, &output),
        Command::Grid {
            render,
            canvas,
            output,
        } => cmd_grid(&render, &canvas, &output),
        Command::Widget { render, output } => cmd_widget(&render, &output),
        Command::Info { when } => cmd_info(&when),
        Command::Compare { a, b, diff } => cmd_compare(&a, &b, diff.as_deref()),
    }
}

fn cmd_wallpaper(args: &RenderArgs, canvas: &CanvasArgs, font: &Path, output: &Path) -> Result<()> {
    let settings = args.settings()?;
    let config = settings.render_config(canvas.width, canvas.height)?;
    let face = TrueTypeFont::from_file(font)?;
    let now = resolve_timestamp(args.when.date, args.when.time)?;
    let img = render_wallpaper(&now, &config, &face)?;
    save_png(output, img)?;
    report_target(settings.target);
    Ok(())
}

fn cmd_grid(args: &RenderArgs, canvas: &CanvasArgs, output: &Path) -> Result<()> {
    let config = args.settings()?.render_config(canvas.width, canvas.height)?;
    let now = resolve_timestamp(args.when.date, args.when.time)?;
    let img = render_dot_grid(&compute_calendar_info(&now), &config)?;
    save_png(output, img)
}

fn cmd_widget(args: &RenderArgs, output: &Path) -> Result<()> {
    let config = args.settings()?.render_config(
        yeargrid::widget::WIDGET_SIZE,
        yeargrid::widget::WIDGET_SIZE,
    )?;
    let now = resolve_timestamp(args.when.date, args.when.time)?;
    let snap = WidgetSnapshot::new(&compute_calendar_info(&now), &config)?;
    println!("days_remaining: {}", snap.days_remaining_text);
    println!("percentage:     {} ({})", snap.percent_text, snap.percent_color);
    println!("days_lived:     {}", snap.days_lived_text);
    save_png(output, snap.image)
}

fn cmd_info(when: &WhenArgs) -> Result<()> {
    let now = resolve_timestamp(when.date, when.time)?;
    let cal = compute_calendar_info(&now);
    let summary = YearSummary::from_calendar(&cal);
    println!("timestamp:      {}", now.format("%Y-%m-%d %H:%M:%S %:z"));
    println!(
        "year:           {} ({} days{})",
        cal.year(),
        cal.total_days(),
        if cal.is_leap() { ", leap" } else { "" }
    );
    println!("day of year:    {}", cal.current_day());
    println!("days remaining: {}", summary.remaining_text());
    println!("days lived:     {}", summary.days_lived);
    println!("progress:       {}", summary.percent_text());
    Ok(())
}

fn cmd_compare(a: &Path, b: &Path, diff: Option<&Path>) -> Result<()> {
    let img_a = load_png(a)?;
    let img_b = load_png(b)?;
    let result = compare_images(&img_a, &img_b)?;
    println!("{result}");

    if let Some(path) = diff {
        diff_image(&img_a, &img_b)?
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote diff {}", path.display());
    }
    if !result.identical() {
        process::exit(1);
    }
    Ok(())
}

fn report_target(target: WallpaperTarget) {
    info!(
        "intended for: {}{}",
        if target.includes_home() { "home " } else { "" },
        if target.includes_lock() { "lock" } else { "" }
    );
}
