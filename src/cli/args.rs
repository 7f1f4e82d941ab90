//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gemini-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the per-user config location)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Gemini model to use (e.g., gemini-2.5-pro, gemini-2.5-flash)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Run the Gemini CLI in sandbox mode
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// Seconds to wait for a Gemini CLI call
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Pass --debug to the Gemini CLI
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write JSON logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Also print the prompt sent to Gemini
    #[arg(long, global = true)]
    pub show_prompts: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,

    /// Review code with Gemini
    Review {
        /// File to review (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Programming language (detected from the file extension when omitted)
        #[arg(short, long)]
        language: Option<String>,

        /// Review focus: general, security, performance, style or bugs
        #[arg(long, default_value = "general")]
        focus: String,

        /// Save the result to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Proofread a feature plan
    Feature {
        /// Plan document (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Project context
        #[arg(long)]
        context: Option<String>,

        /// Comma-separated review areas
        #[arg(long)]
        focus_areas: Option<String>,

        /// Save the result to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze a bug
    Bug {
        /// Description of the bug
        #[arg(short, long)]
        description: String,

        /// Source file for context (repeatable)
        #[arg(long = "code-file")]
        code_files: Vec<PathBuf>,

        /// File with error messages or logs
        #[arg(long)]
        error_log: Option<PathBuf>,

        /// Environment details
        #[arg(long)]
        environment: Option<String>,

        /// Steps to reproduce
        #[arg(long)]
        steps: Option<String>,

        /// Programming language
        #[arg(short, long)]
        language: Option<String>,

        /// Save the result to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Explain code
    Explain {
        /// File to explain (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Detail level: basic, intermediate or advanced
        #[arg(long)]
        level: Option<String>,

        /// Specific questions to answer
        #[arg(short, long)]
        questions: Option<String>,

        /// Programming language (detected from the file extension when omitted)
        #[arg(short, long)]
        language: Option<String>,

        /// Save the result to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect the server and the Gemini CLI
    Status {
        #[command(subcommand)]
        command: StatusSubcommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigSubcommands,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum StatusSubcommands {
    /// Check that the Gemini CLI is installed and authenticated
    Check,
    /// Print the effective configuration
    Config,
    /// List prompt templates
    Templates,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigSubcommands {
    /// Initialize a new config file
    Init,
    /// Print config file location
    Where,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["gemini-mcp"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gemini-mcp",
            "review",
            "--file",
            "main.rs",
            "--model",
            "gemini-2.5-flash",
            "--timeout",
            "30",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(cli.timeout, Some(30));
        assert!(cli.json);
        match cli.command {
            Some(Commands::Review { file, focus, .. }) => {
                assert_eq!(file, Some(PathBuf::from("main.rs")));
                assert_eq!(focus, "general");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_repeated_code_files() {
        let cli = Cli::try_parse_from([
            "gemini-mcp",
            "bug",
            "-d",
            "crash on start",
            "--code-file",
            "a.rs",
            "--code-file",
            "b.rs",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Bug { code_files, .. }) => assert_eq!(code_files.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_output_and_debug_flags() {
        let cli = Cli::try_parse_from([
            "gemini-mcp",
            "explain",
            "-o",
            "explanation.txt",
            "--debug",
        ])
        .unwrap();

        assert!(cli.debug);
        match cli.command {
            Some(Commands::Explain { output, .. }) => {
                assert_eq!(output, Some(PathBuf::from("explanation.txt")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bug_requires_description() {
        assert!(Cli::try_parse_from(["gemini-mcp", "bug"]).is_err());
    }
}
