use crate::config::toml_config::TomlConfig;
use crate::config::ClientConfig;
use crate::endpoints::activity::ActivityQuery;
use crate::endpoints::comments::CommentQuery;
use crate::endpoints::groups::GroupQuery;
use crate::endpoints::reviews::ReviewQuery;
use crate::utils::error::{Result, SwarmError};
use crate::SwarmClient;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

pub const PASSWORD_ENV: &str = "SWARM_PASSWORD";

#[derive(Debug, Clone, Parser)]
#[command(name = "swarm")]
#[command(about = "Query a Helix Swarm server from the command line")]
pub struct CliConfig {
    /// TOML file with a [swarm] section; flags override its values
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Base URL including the API version, e.g. https://swarm/api/v9
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    /// Password or ticket; falls back to $SWARM_PASSWORD
    #[arg(long)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show server and API versions
    Version,
    Reviews {
        #[command(subcommand)]
        command: ReviewsCommand,
    },
    Comments {
        #[command(subcommand)]
        command: CommentsCommand,
    },
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
    Groups {
        #[command(subcommand)]
        command: GroupsCommand,
    },
    Activity {
        #[command(subcommand)]
        command: ActivityCommand,
    },
    Changes {
        #[command(subcommand)]
        command: ChangesCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReviewsCommand {
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        state: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        project: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        author: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    Get {
        id: u64,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    Transitions {
        id: u64,
        #[arg(long)]
        up_voters: Option<String>,
    },
    Dashboard {
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CommentsCommand {
    List {
        /// e.g. reviews/1234
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProjectsCommand {
    List {
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    Get {
        id: String,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum GroupsCommand {
    List {
        #[arg(long)]
        keywords: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Get {
        id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ActivityCommand {
    List {
        #[arg(long)]
        stream: Option<String>,
        #[arg(long)]
        change: Option<u64>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ChangesCommand {
    AffectsProjects { change: u64 },
}

impl CliConfig {
    /// Loads the TOML file when given, then applies flag overrides.
    pub fn resolve(&self) -> Result<(ClientConfig, Option<TomlConfig>)> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };

        let mut config = match &file {
            Some(file) => file.swarm.clone(),
            None => ClientConfig::new(
                self.url.clone().ok_or_else(|| missing("url"))?,
                self.user.clone().ok_or_else(|| missing("user"))?,
                String::new(),
            ),
        };

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        } else if config.password.is_empty() {
            config.password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
        if self.insecure {
            config.verify_tls = Some(false);
        }

        Ok((config, file))
    }

    pub async fn run(&self, swarm: &SwarmClient) -> Result<Value> {
        match &self.command {
            Command::Version => swarm.version().await,
            Command::Reviews { command } => match command {
                ReviewsCommand::List {
                    limit,
                    state,
                    project,
                    author,
                    fields,
                } => {
                    let query = ReviewQuery {
                        limit: *limit,
                        states: state.clone(),
                        projects: project.clone(),
                        authors: author.clone(),
                        fields: fields.clone(),
                        ..Default::default()
                    };
                    swarm.reviews().list(&query).await
                }
                ReviewsCommand::Get { id, fields } => {
                    swarm.reviews().get(*id, &as_strs(fields)).await
                }
                ReviewsCommand::Transitions { id, up_voters } => {
                    swarm.reviews().transitions(*id, up_voters.as_deref()).await
                }
                ReviewsCommand::Dashboard { fields } => {
                    swarm.reviews().dashboard(&as_strs(fields)).await
                }
            },
            Command::Comments { command } => match command {
                CommentsCommand::List { topic, limit } => {
                    let query = CommentQuery {
                        topic: topic.clone(),
                        limit: *limit,
                        ..Default::default()
                    };
                    swarm.comments().list(&query).await
                }
            },
            Command::Projects { command } => match command {
                ProjectsCommand::List { fields } => {
                    swarm.projects().list(&as_strs(fields), None).await
                }
                ProjectsCommand::Get { id, fields } => {
                    swarm.projects().get(id, &as_strs(fields)).await
                }
            },
            Command::Groups { command } => match command {
                GroupsCommand::List { keywords, limit } => {
                    let query = GroupQuery {
                        keywords: keywords.clone(),
                        limit: *limit,
                        ..Default::default()
                    };
                    swarm.groups().list(&query).await
                }
                GroupsCommand::Get { id } => swarm.groups().get(id, &[]).await,
            },
            Command::Activity { command } => match command {
                ActivityCommand::List {
                    stream,
                    change,
                    limit,
                } => {
                    let query = ActivityQuery {
                        stream: stream.clone(),
                        change: *change,
                        limit: *limit,
                        ..Default::default()
                    };
                    swarm.activity().list(&query).await
                }
            },
            Command::Changes { command } => match command {
                ChangesCommand::AffectsProjects { change } => {
                    swarm.changes().affects_projects(*change).await
                }
            },
        }
    }
}

fn missing(field: &str) -> SwarmError {
    SwarmError::Config {
        field: field.to_string(),
        message: format!("--{} is required when no --config file is given", field),
    }
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}
