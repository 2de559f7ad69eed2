use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

use go2::models::analytics::Period;
use go2::{
    CampaignLinkQuery, CampaignQuery, CampaignStatus, ClientOptions, CreateCampaignParams,
    CreateIntegrationParams, CreateLinkParams, GenerateQrParams, Go2Client, IntegrationConfig,
    LinkQuery, QrFormat, Recipient, UpdateCampaignParams, UpdateIntegrationParams,
    UpdateLinkParams,
};

#[derive(Parser)]
#[command(name = "go2")]
#[command(about = "Command-line client for the Go2 link platform", long_about = None)]
struct Cli {
    /// Override GO2_ENDPOINT
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Connect over plain HTTP
    #[arg(long, global = true)]
    insecure: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage smart links
    #[command(subcommand)]
    Links(LinkCommand),
    /// Click analytics for a link
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
    /// Manage custom domains
    #[command(subcommand)]
    Domains(DomainCommand),
    /// Generate a QR code for a link
    Qr(QrArgs),
    /// Manage notification integrations
    #[command(subcommand)]
    Integrations(IntegrationCommand),
    /// Manage recipient campaigns
    #[command(subcommand)]
    Campaigns(CampaignCommand),
}

#[derive(Subcommand)]
enum LinkCommand {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
    },
    Get {
        id: String,
    },
    Create {
        slug: String,
        title: String,
        #[arg(long)]
        web_url: Option<String>,
        #[arg(long)]
        ios_url: Option<String>,
        #[arg(long)]
        android_url: Option<String>,
        #[arg(long)]
        fallback_url: Option<String>,
    },
    /// Change only the fields given
    Update {
        id: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        web_url: Option<String>,
        #[arg(long)]
        ios_url: Option<String>,
        #[arg(long)]
        android_url: Option<String>,
        #[arg(long)]
        fallback_url: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: String,
    },
    /// Check whether a slug is still free
    CheckSlug {
        slug: String,
    },
}

#[derive(Subcommand)]
enum AnalyticsCommand {
    Stats(AnalyticsArgs),
    Timeseries(AnalyticsArgs),
    Platforms(AnalyticsArgs),
    Countries {
        #[command(flatten)]
        args: AnalyticsArgs,
        #[arg(long)]
        limit: Option<u32>,
    },
    Referrers {
        #[command(flatten)]
        args: AnalyticsArgs,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Args)]
struct AnalyticsArgs {
    link_id: String,
    /// 7d, 30d or 90d
    #[arg(long, default_value = "7d")]
    period: Period,
}

#[derive(Subcommand)]
enum DomainCommand {
    List,
    Get { id: String },
    Create { domain: String },
    Verify { id: String },
    Delete { id: String },
}

#[derive(Args)]
struct QrArgs {
    link_id: String,
    #[arg(long)]
    size: Option<u32>,
    /// png or svg
    #[arg(long)]
    format: Option<QrFormat>,
    #[arg(long)]
    foreground: Option<String>,
    #[arg(long)]
    background: Option<String>,
    #[arg(long)]
    logo_url: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum IntegrationKind {
    Slack,
    Discord,
    Telegram,
    Segment,
    Zapier,
}

#[derive(Args)]
struct IntegrationSettings {
    /// Slack, Discord and Zapier
    #[arg(long)]
    webhook_url: Option<String>,
    /// Slack only
    #[arg(long)]
    channel: Option<String>,
    #[arg(long)]
    bot_token: Option<String>,
    #[arg(long)]
    chat_id: Option<String>,
    #[arg(long)]
    write_key: Option<String>,
}

impl IntegrationSettings {
    fn is_empty(&self) -> bool {
        self.webhook_url.is_none()
            && self.channel.is_none()
            && self.bot_token.is_none()
            && self.chat_id.is_none()
            && self.write_key.is_none()
    }

    fn into_config(self, kind: IntegrationKind) -> Result<IntegrationConfig> {
        let config = match kind {
            IntegrationKind::Slack => IntegrationConfig::Slack {
                webhook_url: self.webhook_url.context("slack needs --webhook-url")?,
                channel: self.channel,
            },
            IntegrationKind::Discord => IntegrationConfig::Discord {
                webhook_url: self.webhook_url.context("discord needs --webhook-url")?,
            },
            IntegrationKind::Telegram => IntegrationConfig::Telegram {
                bot_token: self.bot_token.context("telegram needs --bot-token")?,
                chat_id: self.chat_id.context("telegram needs --chat-id")?,
            },
            IntegrationKind::Segment => IntegrationConfig::Segment {
                write_key: self.write_key.context("segment needs --write-key")?,
            },
            IntegrationKind::Zapier => IntegrationConfig::Zapier {
                webhook_url: self.webhook_url.context("zapier needs --webhook-url")?,
            },
        };
        Ok(config)
    }
}

#[derive(Subcommand)]
enum IntegrationCommand {
    List,
    Get {
        id: String,
    },
    Create {
        kind: IntegrationKind,
        name: String,
        #[command(flatten)]
        settings: IntegrationSettings,
        /// Event to subscribe to, e.g. link.clicked; repeatable
        #[arg(long = "event")]
        events: Vec<String>,
    },
    /// Change only the fields given; new settings need --kind
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<IntegrationKind>,
        #[command(flatten)]
        settings: IntegrationSettings,
        /// Replaces the subscribed events; repeatable
        #[arg(long = "event")]
        events: Vec<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Send a test notification
    Test {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Show the available integration types and events
    Types,
}

#[derive(Subcommand)]
enum CampaignCommand {
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        status: Option<CampaignStatus>,
        #[arg(long)]
        search: Option<String>,
    },
    Get {
        id: String,
    },
    Create {
        name: String,
        destination_url: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        pass_recipient_id: bool,
        #[arg(long)]
        recipient_param_name: Option<String>,
        /// RFC 3339 expiry, e.g. 2025-12-31T23:59:59Z
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
    },
    /// Change only the fields given
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        destination_url: Option<String>,
        #[arg(long)]
        pass_recipient_id: Option<bool>,
        #[arg(long)]
        recipient_param_name: Option<String>,
        #[arg(long)]
        status: Option<CampaignStatus>,
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
    },
    Delete {
        id: String,
    },
    /// Create one link per recipient id
    GenerateLinks {
        campaign_id: String,
        #[arg(required = true)]
        recipients: Vec<String>,
    },
    Links {
        campaign_id: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        clicked_only: bool,
        #[arg(long)]
        search: Option<String>,
    },
    Stats {
        campaign_id: String,
    },
    Export {
        campaign_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut options = ClientOptions::from_env()?;
    if let Some(endpoint) = cli.endpoint {
        options = options.with_endpoint(endpoint);
    }
    if cli.insecure {
        options = options.insecure(true);
    }

    let client = Go2Client::new(options).context("Failed to create Go2 client")?;
    let result = run(&client, cli.command).await;
    client.close();
    result
}

async fn run(client: &Go2Client, command: Commands) -> Result<()> {
    match command {
        Commands::Links(command) => run_links(client, command).await,
        Commands::Analytics(command) => run_analytics(client, command).await,
        Commands::Domains(command) => run_domains(client, command).await,
        Commands::Qr(args) => {
            let params = GenerateQrParams {
                size: args.size,
                format: args.format,
                foreground_color: args.foreground,
                background_color: args.background,
                logo_url: args.logo_url,
                ..GenerateQrParams::new(args.link_id)
            };
            print_json(&client.qr().generate(&params).await?)
        }
        Commands::Integrations(command) => run_integrations(client, command).await,
        Commands::Campaigns(command) => run_campaigns(client, command).await,
    }
}

async fn run_links(client: &Go2Client, command: LinkCommand) -> Result<()> {
    let links = client.links();
    match command {
        LinkCommand::List { page, per_page } => {
            print_json(&links.list(&LinkQuery { page, per_page }).await?)
        }
        LinkCommand::Get { id } => print_json(&links.get(&id).await?),
        LinkCommand::Create {
            slug,
            title,
            web_url,
            ios_url,
            android_url,
            fallback_url,
        } => {
            let params = CreateLinkParams {
                slug,
                title,
                web_url,
                ios_url,
                android_url,
                fallback_url,
                ..Default::default()
            };
            print_json(&links.create(&params).await?)
        }
        LinkCommand::Update {
            id,
            slug,
            title,
            web_url,
            ios_url,
            android_url,
            fallback_url,
            active,
        } => {
            let params = UpdateLinkParams {
                slug,
                title,
                ios_url,
                android_url,
                web_url,
                fallback_url,
                is_active: active,
            };
            print_json(&links.update(&id, &params).await?)
        }
        LinkCommand::Delete { id } => print_deleted(&id, links.delete(&id).await?),
        LinkCommand::CheckSlug { slug } => print_json(&links.check_slug(&slug).await?),
    }
}

async fn run_analytics(client: &Go2Client, command: AnalyticsCommand) -> Result<()> {
    let analytics = client.analytics();
    match command {
        AnalyticsCommand::Stats(args) => {
            print_json(&analytics.get_stats(&args.link_id, args.period).await?)
        }
        AnalyticsCommand::Timeseries(args) => {
            print_json(&analytics.get_timeseries(&args.link_id, args.period).await?)
        }
        AnalyticsCommand::Platforms(args) => {
            print_json(&analytics.get_platforms(&args.link_id, args.period).await?)
        }
        AnalyticsCommand::Countries { args, limit } => print_json(
            &analytics
                .get_countries(&args.link_id, args.period, limit)
                .await?,
        ),
        AnalyticsCommand::Referrers { args, limit } => print_json(
            &analytics
                .get_referrers(&args.link_id, args.period, limit)
                .await?,
        ),
    }
}

async fn run_domains(client: &Go2Client, command: DomainCommand) -> Result<()> {
    let domains = client.domains();
    match command {
        DomainCommand::List => print_json(&domains.list().await?),
        DomainCommand::Get { id } => print_json(&domains.get(&id).await?),
        DomainCommand::Create { domain } => print_json(&domains.create(&domain).await?),
        DomainCommand::Verify { id } => print_json(&domains.verify(&id).await?),
        DomainCommand::Delete { id } => print_deleted(&id, domains.delete(&id).await?),
    }
}

async fn run_integrations(client: &Go2Client, command: IntegrationCommand) -> Result<()> {
    let integrations = client.integrations();
    match command {
        IntegrationCommand::List => print_json(&integrations.list().await?),
        IntegrationCommand::Get { id } => print_json(&integrations.get(&id).await?),
        IntegrationCommand::Create {
            kind,
            name,
            settings,
            events,
        } => {
            let params = CreateIntegrationParams {
                name,
                config: settings.into_config(kind)?,
                events,
            };
            print_json(&integrations.create(&params).await?)
        }
        IntegrationCommand::Update {
            id,
            name,
            kind,
            settings,
            events,
            active,
        } => {
            let config = match kind {
                Some(kind) => Some(settings.into_config(kind)?),
                None if !settings.is_empty() => bail!("--kind is required to change settings"),
                None => None,
            };
            let params = UpdateIntegrationParams {
                name,
                config,
                events: (!events.is_empty()).then_some(events),
                is_active: active,
            };
            print_json(&integrations.update(&id, &params).await?)
        }
        IntegrationCommand::Test { id } => print_json(&integrations.test(&id).await?),
        IntegrationCommand::Delete { id } => print_deleted(&id, integrations.delete(&id).await?),
        IntegrationCommand::Types => print_json(&integrations.get_types().await?),
    }
}

async fn run_campaigns(client: &Go2Client, command: CampaignCommand) -> Result<()> {
    let campaigns = client.campaigns();
    match command {
        CampaignCommand::List {
            limit,
            offset,
            status,
            search,
        } => {
            let query = CampaignQuery {
                limit,
                offset,
                status,
                search,
            };
            print_json(&campaigns.list(&query).await?)
        }
        CampaignCommand::Get { id } => print_json(&campaigns.get(&id).await?),
        CampaignCommand::Create {
            name,
            destination_url,
            description,
            pass_recipient_id,
            recipient_param_name,
            expires_at,
        } => {
            let params = CreateCampaignParams {
                name,
                description,
                destination_url,
                pass_recipient_id: Some(pass_recipient_id),
                recipient_param_name,
                expires_at,
            };
            print_json(&campaigns.create(&params).await?)
        }
        CampaignCommand::Update {
            id,
            name,
            description,
            destination_url,
            pass_recipient_id,
            recipient_param_name,
            status,
            expires_at,
        } => {
            let params = UpdateCampaignParams {
                name,
                description,
                destination_url,
                pass_recipient_id,
                recipient_param_name,
                status,
                expires_at,
            };
            print_json(&campaigns.update(&id, &params).await?)
        }
        CampaignCommand::Delete { id } => print_deleted(&id, campaigns.delete(&id).await?),
        CampaignCommand::GenerateLinks {
            campaign_id,
            recipients,
        } => {
            let recipients: Vec<Recipient> = recipients
                .into_iter()
                .map(|id| Recipient {
                    id,
                    name: None,
                    metadata: HashMap::new(),
                })
                .collect();
            print_json(&campaigns.generate_links(&campaign_id, &recipients).await?)
        }
        CampaignCommand::Links {
            campaign_id,
            limit,
            offset,
            clicked_only,
            search,
        } => {
            let query = CampaignLinkQuery {
                limit,
                offset,
                clicked_only,
                search,
            };
            print_json(&campaigns.list_links(&campaign_id, &query).await?)
        }
        CampaignCommand::Stats { campaign_id } => {
            print_json(&campaigns.get_stats(&campaign_id).await?)
        }
        CampaignCommand::Export { campaign_id } => {
            print_json(&campaigns.export_links(&campaign_id).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_deleted(id: &str, deleted: bool) -> Result<()> {
    if deleted {
        println!("✓ Deleted '{}'", id);
    } else {
        println!("⚠ '{}' was not deleted", id);
    }
    Ok(())
}
