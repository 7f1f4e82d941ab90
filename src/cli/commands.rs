//! Subcommand dispatch.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::args::{Cli, Commands, ConfigSubcommands, StatusSubcommands};
use super::files::{detect_language, read_context_files, read_file, read_input};
use super::output::Printer;
use crate::config::ServerConfig;
use crate::core::error::{AppError, Result};
use crate::server::{McpServer, resources};
use crate::tools::gemini::{
    BugAnalysisRequest, CodeExplanationRequest, CodeReviewRequest, FeaturePlanRequest,
};
use crate::tools::{
    AnalyzeBugTool, ExplainCodeTool, GeminiToolResponse, ProofreadFeaturePlanTool, ReviewCodeTool,
    ToolContext, TypedTool,
};

const fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn language_for(explicit: Option<String>, file: Option<&Path>) -> Option<String> {
    explicit.or_else(|| file.and_then(detect_language).map(str::to_string))
}

fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.model.clone(), cli.sandbox, cli.debug, cli.timeout)?;
    Ok(config)
}

fn config_command(command: ConfigSubcommands, path: Option<&Path>) -> Result<ExitCode> {
    match command {
        ConfigSubcommands::Init => {
            let path = ServerConfig::init_default(path)?;
            println!("✓ Created config file at {}", path.display());
        }
        ConfigSubcommands::Where => {
            let path = path
                .map(Path::to_path_buf)
                .or_else(ServerConfig::get_config_path)
                .ok_or_else(|| AppError::Config("Could not determine config path".to_string()))?;
            println!("{}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn status_command(
    command: StatusSubcommands,
    ctx: &ToolContext,
    printer: Printer,
) -> Result<ExitCode> {
    match command {
        StatusSubcommands::Check => {
            let status = resources::status(ctx).await;
            printer.emit(&status, || Printer::render_status(&status))?;
            Ok(exit_code(!status.cli_available))
        }
        StatusSubcommands::Config => {
            let snapshot = resources::config_snapshot(ctx)?;
            let pretty = serde_json::to_string_pretty(&snapshot)?;
            printer.emit(&snapshot, || format!("{pretty}\n"))?;
            Ok(ExitCode::SUCCESS)
        }
        StatusSubcommands::Templates => {
            let templates = resources::templates(ctx);
            printer.emit(&templates, || Printer::render_templates(&templates))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_text(
    printer: Printer,
    output: Option<&Path>,
    title: &str,
    response: &GeminiToolResponse,
) -> Result<ExitCode> {
    printer.deliver(output, response, || printer.render_text(title, response))?;
    Ok(exit_code(response.is_failure()))
}

async fn review(
    ctx: &ToolContext,
    printer: Printer,
    file: Option<PathBuf>,
    language: Option<String>,
    focus: String,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let code = read_input(file.as_deref(), ctx.config.max_file_size_bytes()).await?;
    let request = CodeReviewRequest {
        code,
        language: language_for(language, file.as_deref()),
        focus: Some(focus),
    };

    let response = ReviewCodeTool.execute_typed(ctx, request).await;
    printer.deliver(output.as_deref(), &response, || printer.render_review(&response))?;
    Ok(exit_code(response.is_failure()))
}

async fn tool_command(command: Commands, ctx: &ToolContext, printer: Printer) -> Result<ExitCode> {
    let max_bytes = ctx.config.max_file_size_bytes();

    match command {
        Commands::Review {
            file,
            language,
            focus,
            output,
        } => review(ctx, printer, file, language, focus, output).await,

        Commands::Feature {
            file,
            context,
            focus_areas,
            output,
        } => {
            let request = FeaturePlanRequest {
                feature_plan: read_input(file.as_deref(), max_bytes).await?,
                context,
                focus_areas,
            };
            let response = ProofreadFeaturePlanTool.execute_typed(ctx, request).await;
            print_text(printer, output.as_deref(), "Feature plan review", &response)
        }

        Commands::Bug {
            description,
            code_files,
            error_log,
            environment,
            steps,
            language,
            output,
        } => {
            let code_context = if code_files.is_empty() {
                None
            } else {
                Some(read_context_files(
                    &code_files,
                    ctx.config.max_context_files,
                    max_bytes,
                )?)
            };
            let error_logs = error_log
                .as_deref()
                .map(|path| read_file(path, max_bytes))
                .transpose()?;
            let language = language_for(language, code_files.first().map(PathBuf::as_path));

            let request = BugAnalysisRequest {
                bug_description: description,
                code_context,
                error_logs,
                environment,
                reproduction_steps: steps,
                language,
            };
            let response = AnalyzeBugTool.execute_typed(ctx, request).await;
            print_text(printer, output.as_deref(), "Bug analysis", &response)
        }

        Commands::Explain {
            file,
            level,
            questions,
            language,
            output,
        } => {
            let request = CodeExplanationRequest {
                code: read_input(file.as_deref(), max_bytes).await?,
                language: language_for(language, file.as_deref()),
                detail_level: level,
                questions,
            };
            let response = ExplainCodeTool.execute_typed(ctx, request).await;
            print_text(printer, output.as_deref(), "Code explanation", &response)
        }

        Commands::Serve | Commands::Status { .. } | Commands::Config { .. } => {
            Err(AppError::InvalidInput("not a tool command".to_string()))
        }
    }
}

/// Runs the parsed command line. Tool failures still print their envelope
/// and yield a failing exit code.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    if let Some(Commands::Config { command }) = &cli.command {
        return config_command(*command, cli.config.as_deref());
    }

    let printer = Printer::new(cli.json, cli.show_prompts);
    let config = load_config(&cli)?;
    let ctx = ToolContext::from_config(config)?;
    tracing::debug!(?ctx, "Loaded tool context");

    match cli.command {
        None | Some(Commands::Serve) => {
            McpServer::new(ctx).serve_stdio().await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Status { command }) => status_command(command, &ctx, printer).await,
        Some(command) => tool_command(command, &ctx, printer).await,
    }
}
