//! Writes the ui crate's `index.html` from `index.template.html`, and
//! `uikit.js` and `uikit.less` into the generated assets directory. Run it
//! before `trunk build`, which reads `index.html`.
//!
//! Usage: cargo run -p prerender -- --uikit-dir ui/node_modules/uikit

use anyhow::{Context, Result};
use clap::Parser;
use payloads::{APIClient, responses::User};
use prerender::{
    icon_names, icons_script, inline_bot_script, less_imports,
    placeholder_bot, render_app, render_index, style_sheet, used_styles,
};
use std::path::{Path, PathBuf};
use test_helpers::telemetry;
use tracing::info;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "prerender",
    about = "Render the dashboard shell and prune the UIkit bundle",
    version
)]
struct CliArgs {
    /// The ui crate; `index.template.html` is filled in as `index.html` and
    /// `src/` is scanned.
    #[arg(long = "ui-dir", value_name = "path", default_value = "ui")]
    ui_dir: PathBuf,
    /// A checkout of UIkit's sources.
    #[arg(
        long = "uikit-dir",
        value_name = "path",
        default_value = "ui/node_modules/uikit"
    )]
    uikit_dir: PathBuf,
    /// Where `uikit.js` and `uikit.less` go. Not trunk's `dist`, which trunk
    /// empties on every build.
    #[arg(
        long = "out-dir",
        value_name = "path",
        default_value = "ui/generated"
    )]
    out_dir: PathBuf,
    /// Bake in the bot served by this API instead of the placeholders.
    #[arg(long = "bot-from", value_name = "url")]
    bot_from: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber)?;

    let args = CliArgs::parse();
    if let Err(e) = run(args).await {
        telemetry::log_error(e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: CliArgs) -> Result<()> {
    tokio::fs::create_dir_all(&args.out_dir)
        .await
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let sources = read_glob(&args.ui_dir.join("src/**/*.rs")).await?;
    info!("📄 Scanned {} ui sources", sources.len());

    write_index(&args).await?;
    write_icons(&args, &sources).await?;
    write_styles(&args, &sources).await?;

    info!("✅ Wrote assets to {}", args.out_dir.display());
    Ok(())
}

async fn read_glob(pattern: &Path) -> Result<Vec<String>> {
    let pattern = pattern.to_str().context("glob pattern is not utf-8")?;
    let mut contents = Vec::new();
    for path in glob::glob(pattern)? {
        let path = path?;
        contents.push(read(&path).await?);
    }
    Ok(contents)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

async fn write(path: PathBuf, contents: String) -> Result<()> {
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!("   {}", path.display());
    Ok(())
}

async fn bot(args: &CliArgs) -> Result<User> {
    let Some(url) = &args.bot_from else {
        return Ok(placeholder_bot());
    };
    let bot = APIClient::new(url.as_str())
        .bot_user()
        .await
        .with_context(|| format!("fetching the bot from {url}"))?;
    info!("🤖 Using bot {}", bot.tag());
    Ok(bot)
}

async fn write_index(args: &CliArgs) -> Result<()> {
    let template = read(&args.ui_dir.join("index.template.html")).await?;
    let bot = bot(args).await?;
    let head = inline_bot_script(&bot)?;
    let body = render_app("/".into(), bot).await;
    let html = render_index(&template, &head, &body)?;
    write(args.ui_dir.join("index.html"), html).await
}

async fn write_icons(args: &CliArgs, sources: &[String]) -> Result<()> {
    let mut icons = Vec::new();
    for name in sources.iter().flat_map(|source| icon_names(source)) {
        if icons.iter().any(|(known, _)| known == &name) {
            continue;
        }
        let svg_path = args
            .uikit_dir
            .join("src/images/icons")
            .join(format!("{name}.svg"));
        let svg = read(&svg_path).await?;
        icons.push((name, svg));
    }
    write(args.out_dir.join("uikit.js"), icons_script(&icons)).await
}

async fn write_styles(args: &CliArgs, sources: &[String]) -> Result<()> {
    let less = args.uikit_dir.join("src/less");
    let components =
        less_imports(&read(&less.join("components/_import.less")).await?);
    let themes = less_imports(&read(&less.join("theme/_import.less")).await?);

    let mut candidates = components.clone();
    candidates.extend(themes.iter().cloned());
    let used = used_styles(sources, &candidates)?;
    write(
        args.out_dir.join("uikit.less"),
        style_sheet(&components, &themes, &used),
    )
    .await
}
