use anyhow::{Context, Result};
use clap::Parser;
use colored::control as color_control;
use sphere::cli::commands::field::{FieldCommand, FieldCommandHandler};
use sphere::cli::commands::init::{InitCommand, InitCommandHandler};
use sphere::cli::commands::object::{ObjectCommand, ObjectCommandHandler};
use sphere::cli::commands::record::{RecordCommand, RecordCommandHandler};
use sphere::cli::commands::render_output;
use sphere::cli::commands::setup::{SetupCommand, SetupCommandHandler};
use sphere::cli::{Cli, Commands};
use sphere::core::config::Dialect;
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    sqlx::any::install_default_drivers();

    // CLIをパースして実行
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 非同期ランタイムを作成して実行
    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to create Tokio runtime")
        .unwrap_or_else(|e| {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        });

    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// トレーシングを初期化する
///
/// RUST_LOG が設定されていればそれに従い、未設定なら warn（--verbose 指定時は debug）を使用します。
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;

    // --config フラグの処理（絶対パスに変換）
    let config_path: Option<PathBuf> = cli.config.map(|p| {
        if p.is_absolute() {
            p
        } else {
            project_path.join(p)
        }
    });

    match cli.command {
        Commands::Init {
            dialect,
            database,
            force,
        } => {
            let dialect: Dialect = dialect.parse()?;
            let handler = InitCommandHandler::new();
            let command = InitCommand {
                project_path,
                config_path,
                dialect,
                force,
                database_name: database,
            };
            render_output(&handler.execute(&command)?, &cli.format)
        }

        Commands::Setup => {
            let handler = SetupCommandHandler::new();
            let command = SetupCommand {
                project_path,
                config_path,
                env: cli.env,
            };
            render_output(&handler.execute(&command).await?, &cli.format)
        }

        Commands::Object(action) => {
            let handler = ObjectCommandHandler::new();
            let command = ObjectCommand {
                project_path,
                config_path,
                env: cli.env,
                action,
            };
            render_output(&handler.execute(&command).await?, &cli.format)
        }

        Commands::Field(action) => {
            let handler = FieldCommandHandler::new();
            let command = FieldCommand {
                project_path,
                config_path,
                env: cli.env,
                action,
            };
            render_output(&handler.execute(&command).await?, &cli.format)
        }

        Commands::Record(action) => {
            let handler = RecordCommandHandler::new();
            let command = RecordCommand {
                project_path,
                config_path,
                env: cli.env,
                action,
            };
            render_output(&handler.execute(&command).await?, &cli.format)
        }
    }
}
