use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use media_renamer_core::{
    app_paths, build_inspector, default_output_dir, load_config, run_batch, save_config,
    AdjustmentFlags, AppConfig, BatchOptions, BatchResult, InspectorBackend, TimeAdjustment,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "media-renamer-cli")]
#[command(about = "写真・動画を撮影日時とハッシュに基づくファイル名へ一括移動します")]
struct Cli {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    /// 既定値の設定ファイルを書き出す
    Init {
        /// 既存の設定ファイルを上書きする
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Debug, Args)]
struct RenameArgs {
    /// 元ファイルのあるフォルダ
    #[arg(short = 'i', long, default_value = ".")]
    directory_input: PathBuf,
    /// 移動先フォルダ (省略時は <入力フォルダ>/links)
    #[arg(short = 'o', long)]
    directory_output: Option<PathBuf>,
    /// 撮影日時に補正量を加算する
    #[arg(short = 'a', long, default_value_t = false)]
    add: bool,
    /// 撮影日時から補正量を減算する
    #[arg(short = 's', long, visible_alias = "substract", default_value_t = false)]
    subtract: bool,
    #[arg(short = 'd', long, value_name = "N")]
    day: Option<i64>,
    #[arg(short = 'H', long, value_name = "N")]
    hour: Option<i64>,
    #[arg(short = 'm', long, value_name = "N")]
    minute: Option<i64>,
    #[arg(short = 'S', long, value_name = "N")]
    second: Option<i64>,
    /// 並列ワーカー数 (省略時は設定ファイルの値)
    #[arg(short = 'j', long)]
    workers: Option<usize>,
    #[arg(long, value_enum)]
    backend: Option<Backend>,
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Identify,
    Exif,
}

impl From<Backend> for InspectorBackend {
    fn from(value: Backend) -> Self {
        match value {
            Backend::Identify => InspectorBackend::Identify,
            Backend::Exif => InspectorBackend::Exif,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init { force } => cmd_config_init(force),
        },
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp_secs()
        .init();
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let config = load_config()?;

    let adjustment = TimeAdjustment::from_flags(&AdjustmentFlags {
        add: args.add,
        subtract: args.subtract,
        days: args.day,
        hours: args.hour,
        minutes: args.minute,
        seconds: args.second,
    })?;

    let output_dir = args
        .directory_output
        .unwrap_or_else(|| default_output_dir(&args.directory_input));
    let options = BatchOptions {
        input_dir: args.directory_input,
        output_dir,
        extensions: config.extensions.clone(),
        workers: args.workers.unwrap_or(config.workers),
        adjustment,
        dry_run: args.dry_run,
    };

    let backend = args.backend.map(Into::into).unwrap_or(config.backend);
    let inspector = build_inspector(backend, &config.identify_program);
    let result = run_batch(&options, inspector.as_ref())?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Table => {
            print_table(&result);
        }
    }

    if options.dry_run {
        eprintln!("dry-runモード: 実ファイルは変更していません。");
    }

    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_init(force: bool) -> Result<()> {
    let paths = app_paths()?;
    if paths.config_path.exists() && !force {
        println!(
            "設定ファイルは既に存在します (上書きするには --force): {}",
            paths.config_path.display()
        );
        return Ok(());
    }

    save_config(&AppConfig::default())?;
    println!("設定フォルダ: {}", paths.config_dir.display());
    println!("設定ファイルを書き出しました: {}", paths.config_path.display());
    Ok(())
}

fn print_table(result: &BatchResult) {
    println!("元ファイル -> 新ファイル (結果)");
    for record in &result.records {
        let target = record
            .target
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        match &record.message {
            Some(message) => println!(
                "{} -> {} ({:?}: {})",
                record.path.display(),
                target,
                record.outcome,
                message
            ),
            None => println!("{} -> {} ({:?})", record.path.display(), target, record.outcome),
        }
    }

    println!(
        "\n集計: scanned={} eligible={} ignored={} renamed={} duplicates={} unchanged={} planned={} unresolved={} failed={}",
        result.scan.scanned_files,
        result.scan.eligible_files,
        result.scan.ignored_files,
        result.renamed,
        result.duplicates,
        result.unchanged,
        result.planned,
        result.skipped_unresolved,
        result.failed
    );
}
