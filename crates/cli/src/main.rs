//! # interop-decl CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 声明文档校验（支持多文件批量）
//! - 两份声明文档的差异比较
//! - TypeScript 声明文件渲染与 golden 文件比对

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_diff, run_info, run_render, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig::from_verbosity(
        cli.verbose,
        cli.quiet,
        cli.log_format.into(),
    ))?;

    info!(version = env!("CARGO_PKG_VERSION"), "interop-decl starting");

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Diff(args) => run_diff(args),
        Commands::Render(args) => run_render(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
