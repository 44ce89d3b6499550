use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::controller::UploadController;
use crate::core::{ConfigManager, ResumeService, ServiceClient};
use crate::logging::init_logging;
use crate::render::{render_page, render_text};
use crate::types::UploadFile;
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "resume-upload")]
#[command(about = "Upload a résumé and request interview questions or an experience analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the extraction service
    #[arg(long, global = true)]
    pub service_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload one file and print the resulting page
    Run {
        file: PathBuf,
        #[command(flatten)]
        options: RunOptions,
        /// Write the page here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the upload page to browsers
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Text,
}

/// What a one-shot session does after the upload
#[derive(clap::Args, Clone, Debug)]
pub struct RunOptions {
    /// Also generate interview questions
    #[arg(long)]
    pub questions: bool,
    /// Also analyze experience
    #[arg(long)]
    pub analyze: bool,
    /// Render the extracted text in normal flow instead of preformatted
    #[arg(long)]
    pub flow: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            questions: false,
            analyze: false,
            flow: false,
            format: OutputFormat::Text,
        }
    }
}

/// Upload `file`, run the requested actions and return the rendered page.
///
/// Actions only run once the upload produced an identifier; a failed upload
/// still renders its status message.
pub async fn run_session<S: ResumeService>(
    controller: &mut UploadController<S>,
    file: UploadFile,
    options: &RunOptions,
) -> Result<String> {
    if let Err(e) = controller.submit_resume(file).await {
        warn!("{}", e);
    }

    if controller.session().current_filename().is_some() {
        if options.questions {
            controller.generate_questions().await?;
        }
        if options.analyze {
            controller.analyze_experience().await?;
        }
    }

    if options.flow {
        controller.toggle_text_view();
    }

    Ok(match options.format {
        OutputFormat::Html => render_page(controller.session()),
        OutputFormat::Text => render_text(controller.page()),
    })
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = ConfigManager::load(cli.config.as_deref())?.with_service_url(cli.service_url);
    init_logging(&config)?;
    info!("Loaded configuration for environment: {}", config.environment);

    let service = ServiceClient::new(&config.service_url, config.request_timeout())?;

    match cli.command {
        Command::Run {
            file,
            options,
            output,
        } => {
            let upload = UploadFile::from_path(&file).await?;
            let mut controller = UploadController::new(service);
            let rendered = run_session(&mut controller, upload, &options).await?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, rendered)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Page written to {}", path.display());
                }
                None => print!("{}", rendered),
            }
        }
        Command::Serve { port } => {
            start_web_server(config.with_port(port), service).await?;
        }
    }

    Ok(())
}
