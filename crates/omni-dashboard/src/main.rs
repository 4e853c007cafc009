use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

use omni_bridge::link::AppScreen;
use omni_core::filter::FilterType;
use omni_dashboard::config::ConfigUpdate;
use omni_dashboard::state::MetricFilter;

mod commands;
mod repl;

#[derive(Parser)]
#[command(name = "omni")]
#[command(about = "Patient-reported outcomes dashboard with the Omni assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard
    Show {
        /// Question filter: All, Social, Future, Coping or Discrepant
        #[arg(short, long, default_value = "All")]
        filter: FilterType,
        /// List the filter menu options
        #[arg(long)]
        menu: bool,
        /// Expand the score cards' comparison analysis
        #[arg(short, long)]
        expand: bool,
        /// Show each score card's explanation
        #[arg(long)]
        explain: bool,
        /// Comparison bars to show: all, child, parent or diff
        #[arg(short, long, default_value = "all")]
        metrics: MetricFilter,
        /// Open the comparison popup for a discrepant response
        #[arg(short, long)]
        discrepancy: Option<String>,
    },
    /// Print one question card
    Question {
        id: String,
        /// Show the response comparison
        #[arg(short, long)]
        expand: bool,
        /// Peek at the parent's answer on the collapsed card
        #[arg(short, long)]
        peek: bool,
    },
    /// Print the child/parent comparison for a discrepant response
    Discrepancy { id: String },
    /// Chat with the Omni assistant
    Chat {
        /// Send one message and exit instead of starting the interactive session
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Show the settings, or change and save them
    Config {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        model_id: Option<String>,
        /// Sampling temperature, 0 to 1
        #[arg(long)]
        temperature: Option<f32>,
        /// Directory for the chat transcript
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Inspect or clear the stored chat transcript
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Build a link into the companion iOS app
    Link {
        #[arg(short, long, default_value = "dashboard")]
        screen: AppScreen,
        #[arg(long)]
        survey_id: Option<String>,
        #[arg(long)]
        patient_id: Option<String>,
        #[arg(long)]
        action: Option<String>,
        /// Extra query parameter as key=value; may be repeated
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Browser user agent; prints the smart link for that browser
        #[arg(long)]
        user_agent: Option<String>,
        #[arg(long, default_value_t = 0)]
        touch_points: u32,
        /// Link used when the browser is not on iOS
        #[arg(long)]
        web_fallback: Option<String>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Print the stored transcript
    Show,
    /// Delete the stored transcript
    Clear,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            filter,
            menu,
            expand,
            explain,
            metrics,
            discrepancy,
        } => commands::show(commands::ShowOptions {
            filter,
            menu,
            expand,
            explain,
            metrics,
            discrepancy,
        })?,
        Commands::Question { id, expand, peek } => commands::question(&id, expand, peek)?,
        Commands::Discrepancy { id } => commands::discrepancy(&id)?,
        Commands::Chat { message } => repl::run(message).await?,
        Commands::Config {
            region,
            model_id,
            temperature,
            data_dir,
        } => commands::config(ConfigUpdate {
            region,
            model_id,
            temperature,
            data_dir,
        })?,
        Commands::History { action } => match action {
            HistoryAction::Show => commands::history_show()?,
            HistoryAction::Clear => commands::history_clear()?,
        },
        Commands::Link {
            screen,
            survey_id,
            patient_id,
            action,
            params,
            user_agent,
            touch_points,
            web_fallback,
        } => {
            let config = omni_bridge::link::AppLinkConfig {
                survey_id,
                patient_id,
                screen,
                action,
                params,
            };
            commands::link(&config, user_agent.as_deref(), touch_points, web_fallback.as_deref());
        }
    }

    Ok(())
}
