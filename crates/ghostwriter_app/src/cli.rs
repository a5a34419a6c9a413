use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ghostwriter_core::{Action, ArticleForm, ListKind};

#[derive(Debug, Parser)]
#[command(
    name = "ghostwriter",
    version,
    about = "Terminal dashboard for the Ghostwriter content pipeline",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: ./ghostwriter.ron, optional)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a list and keep it in sync with the backend
    Watch(WatchArgs),
    /// Show pipeline metrics
    Metrics {
        /// Number of refreshes to show before exiting (0 = until interrupted)
        #[arg(long, default_value_t = 1)]
        refreshes: u64,
    },
    /// Show one content document
    Show { id: String },
    /// Start, stop, enable or disable a crawler
    Crawler {
        #[arg(value_enum)]
        verb: CrawlerVerb,
        id: String,
    },
    /// Queue a content document for reprocessing
    Reprocess { id: String },
    /// Request article generation parameters
    Generate(GenerateArgs),
    /// Print the effective configuration as RON
    Config,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[arg(value_enum)]
    pub list: ListArg,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long)]
    pub page_size: Option<u32>,

    /// Filter as key=value; repeatable. An empty value clears the key.
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Number of refreshes to show before exiting (0 = until interrupted).
    /// Lists without polling always exit after the first result.
    #[arg(long, default_value_t = 1)]
    pub refreshes: u64,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub outline: String,
    #[arg(long)]
    pub audience: String,
    #[arg(long)]
    pub style: String,
    /// 1 to 5
    #[arg(long, default_value_t = 3)]
    pub imagination: u8,
    /// 1 to 5
    #[arg(long, default_value_t = 3)]
    pub research: u8,
    /// Start date, YYYY-MM-DD
    #[arg(long)]
    pub from: String,
    /// End date, YYYY-MM-DD
    #[arg(long)]
    pub to: String,
}

impl GenerateArgs {
    pub fn into_form(self) -> ArticleForm {
        ArticleForm {
            outline: self.outline,
            audience: self.audience,
            writing_style: self.style,
            imagination_level: self.imagination,
            research_level: self.research,
            start_date: self.from,
            end_date: self.to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListArg {
    Content,
    Logs,
    Crawlers,
    Pipeline,
}

impl From<ListArg> for ListKind {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Content => ListKind::Content,
            ListArg::Logs => ListKind::Logs,
            ListArg::Crawlers => ListKind::Crawlers,
            ListArg::Pipeline => ListKind::Pipeline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CrawlerVerb {
    Start,
    Stop,
    Enable,
    Disable,
}

impl From<CrawlerVerb> for Action {
    fn from(verb: CrawlerVerb) -> Self {
        match verb {
            CrawlerVerb::Start => Action::Start,
            CrawlerVerb::Stop => Action::Stop,
            CrawlerVerb::Enable => Action::ToggleEnabled(true),
            CrawlerVerb::Disable => Action::ToggleEnabled(false),
        }
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter key is empty in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
