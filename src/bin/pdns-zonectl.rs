use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdns_zones::{ClientConfig, ZoneManager};
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// PowerDNS API URL (e.g. http://127.0.0.1:8081/api/v1)
    #[arg(long, value_name = "URL", env = "PDNS_API_URL")]
    api_url: String,
    /// PowerDNS API key
    #[arg(long, value_name = "KEY", env = "PDNS_API_KEY", hide_env_values = true)]
    api_key: String,
    /// PowerDNS server ID
    #[arg(long, value_name = "ID", env = "PDNS_SERVER_ID", default_value = "localhost")]
    server_id: String,
    /// Nameserver for newly created zones (repeat for multiple values)
    #[arg(long = "nameserver", value_name = "FQDN", env = "PDNS_NAMESERVERS", value_delimiter = ',')]
    nameservers: Vec<String>,
    /// SOA rname for newly created zones
    #[arg(long, value_name = "FQDN", env = "PDNS_SOA_CONTACT", default_value = "hostmaster.")]
    soa_contact: String,
    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", env = "PDNS_TIMEOUT")]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// List servers behind the API
    Servers,
    /// List zones on the server
    Zones,
    /// Print the zone owning a name
    FindZone { name: String },
    /// Create a zone unless it already exists
    EnsureZone { domain: String },
    /// Switch a zone to INCEPTION-INCREMENT serials
    Normalize { zone: String },
    /// Replace the records of <label>.<domain> with a single record
    Upsert {
        domain: String,
        rrtype: String,
        label: String,
        content: String,
        #[arg(long, default_value_t = 300)]
        ttl: u32,
    },
    /// Delete the records of <label>.<domain>
    Delete {
        domain: String,
        rrtype: String,
        label: String,
    },
    /// Replace the records of a fully-qualified name
    UpsertFqdn {
        name: String,
        rrtype: String,
        content: String,
        #[arg(long, default_value_t = 300)]
        ttl: u32,
    },
    /// Delete the records of a fully-qualified name
    DeleteFqdn { name: String, rrtype: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = build_client_config(&cli)?;
    let manager = ZoneManager::from_config(&config).context("failed to build PowerDNS client")?;

    tokio::select! {
        res = run(&manager, &cli.command) => res,
        _ = shutdown_signal() => bail!("interrupted"),
    }
}

async fn run(manager: &ZoneManager, command: &Command) -> Result<()> {
    match command {
        Command::Servers => {
            for server in manager.client().list_servers().await? {
                println!(
                    "{}\t{}\t{}",
                    server.id,
                    server.daemon_type.unwrap_or_default(),
                    server.version.unwrap_or_default()
                );
            }
        }
        Command::Zones => {
            for zone in manager.client().list_zones().await? {
                println!(
                    "{}\t{:?}\t{}\t{}",
                    zone.name, zone.kind, zone.serial, zone.soa_edit_api
                );
            }
        }
        Command::FindZone { name } => match manager.find_owning_zone(name).await? {
            Some(located) => println!("{}", located.name),
            None => bail!("no managed zone governs {name}"),
        },
        Command::EnsureZone { domain } => {
            let provisioned = manager.ensure_zone(domain, manager.nameservers()).await?;
            if let Err(err) = &provisioned.soa_seed {
                warn!(zone = %provisioned.name, error = %err, "zone created without seeded SOA");
            }
            println!("{}", provisioned.name);
        }
        Command::Normalize { zone } => {
            let updated = manager.ensure_api_editable(zone).await?;
            info!(%zone, updated, "SOA-EDIT-API normalized");
        }
        Command::Upsert {
            domain,
            rrtype,
            label,
            content,
            ttl,
        } => {
            let zone = manager
                .upsert_record(domain, rrtype, label, content, *ttl)
                .await
                .with_context(|| format!("failed to upsert {rrtype} {label} in {domain}"))?;
            println!("{zone}");
        }
        Command::Delete {
            domain,
            rrtype,
            label,
        } => {
            match manager
                .delete_record(domain, rrtype, label)
                .await
                .with_context(|| format!("failed to delete {rrtype} {label} in {domain}"))?
            {
                Some(zone) => println!("{zone}"),
                None => info!(%domain, "no managed zone governs domain; nothing deleted"),
            }
        }
        Command::UpsertFqdn {
            name,
            rrtype,
            content,
            ttl,
        } => {
            let zone = manager
                .upsert_fqdn(name, rrtype, content, *ttl)
                .await
                .with_context(|| format!("failed to upsert {rrtype} {name}"))?;
            println!("{zone}");
        }
        Command::DeleteFqdn { name, rrtype } => {
            let zone = manager
                .delete_fqdn(name, rrtype)
                .await
                .with_context(|| format!("failed to delete {rrtype} {name}"))?;
            println!("{zone}");
        }
    }

    Ok(())
}

fn build_client_config(cli: &Cli) -> Result<ClientConfig> {
    let nameservers = cli
        .nameservers
        .iter()
        .map(|ns| normalize_fqdn(ns).with_context(|| format!("invalid nameserver value '{ns}'")))
        .collect::<Result<Vec<_>>>()?;
    let soa_contact = normalize_fqdn(&cli.soa_contact)
        .with_context(|| format!("invalid soa-contact '{}'", cli.soa_contact))?;

    let mut config = ClientConfig::new(&cli.api_url, &cli.api_key)
        .with_server_id(&cli.server_id)
        .with_nameservers(nameservers)
        .with_soa_contact(soa_contact);
    if let Some(secs) = cli.timeout {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

fn normalize_fqdn(input: &str) -> Result<String> {
    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        bail!("FQDN cannot be empty");
    }
    Ok(format!("{}.", trimmed))
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install CTRL+C handler: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
