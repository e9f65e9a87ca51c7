//! sslkit demo: run the person service over TLS, or call an HTTPS endpoint
//! with one-way, mutual PEM, mutual keystore or trust-everything credentials.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sslkit::{
    FsResourceLoader, HostnameVerification, HttpConfig, HttpsClient, InMemoryPersonRepository,
    KeystoreCredentials, PemCredentials, RequestBody, ResourceLoader, RunningServer, ServiceConfig,
    TlsTrustConfiguration, build_url,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sslkit-demo", version, about = "One-way and mutual TLS demo")]
struct Cli {
    /// Directory relative file names are resolved against
    #[arg(long, env = "SSLKIT_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the person CRUD service over TLS
    Serve(ServeArgs),
    /// Send one HTTPS request and print the response
    Call(CallArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "SSLKIT_BIND", default_value = "127.0.0.1:8443")]
    bind: SocketAddr,

    #[arg(long, env = "SSLKIT_BASE_PATH", default_value = sslkit::service::DEFAULT_BASE_PATH)]
    base_path: String,

    #[arg(long, env = "SSLKIT_SERVER_CERT", default_value = "server.pem")]
    server_cert: String,

    #[arg(long, env = "SSLKIT_SERVER_KEY", default_value = "server.key")]
    server_key: String,

    /// Require client certificates issued by this CA
    #[arg(long, env = "SSLKIT_CLIENT_CA")]
    client_ca: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Args, Debug)]
struct CallArgs {
    #[arg(long)]
    url: String,

    #[arg(long, value_enum, default_value_t = Method::Get)]
    method: Method,

    /// CA certificate the server must chain to
    #[arg(long, env = "SSLKIT_CA", required_unless_present = "trust_everything")]
    ca: Option<String>,

    #[arg(long, requires = "client_key", conflicts_with = "keystore")]
    client_cert: Option<String>,

    #[arg(long, requires = "client_cert", conflicts_with = "keystore")]
    client_key: Option<String>,

    /// PKCS#12 client keystore
    #[arg(long)]
    keystore: Option<String>,

    #[arg(long, env = "SSLKIT_KEYSTORE_PASS", requires = "keystore", hide_env_values = true)]
    keystore_pass: Option<String>,

    /// Ignore hostname mismatches; the chain is still verified
    #[arg(long)]
    insecure_hostname: bool,

    /// Trust any server certificate
    #[arg(long, conflicts_with_all = ["ca", "client_cert", "keystore"])]
    trust_everything: bool,

    /// Request header as `name:value`
    #[arg(long = "header", value_parser = parse_pair::<':'>)]
    headers: Vec<(String, String)>,

    /// Query parameter for GET/DELETE, form field otherwise, as `key=value`
    #[arg(long = "param", value_parser = parse_pair::<'='>)]
    params: Vec<(String, String)>,

    /// `none`, `application/json`, `form-data` or `application/x-www-form-urlencoded`
    #[arg(long, default_value = "none")]
    media_type: String,

    /// JSON request body
    #[arg(long)]
    body: Option<String>,
}

fn parse_pair<const SEP: char>(raw: &str) -> Result<(String, String), String> {
    raw.split_once(SEP)
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected `key{}value`, got `{}`", SEP, raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "sslkit=debug,sslkit_client=debug,sslkit_demo=debug"
    } else {
        "sslkit=info,sslkit_client=info,sslkit_demo=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let loader = FsResourceLoader::new(cli.root);
    match cli.command {
        Command::Serve(args) => serve(args, &loader).await,
        Command::Call(args) => call(args, &loader).await,
    }
}

async fn serve(args: ServeArgs, loader: &FsResourceLoader) -> anyhow::Result<()> {
    let mut config = ServiceConfig::default()
        .with_bind_addr(args.bind)
        .with_base_path(args.base_path)
        .with_server_identity(args.server_cert, args.server_key);
    if let Some(ca) = args.client_ca {
        config = config.with_client_auth(ca);
    }

    let server = RunningServer::start(&config, loader, Arc::new(InMemoryPersonRepository::new()))
        .await
        .context("failed to start person service")?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.shutdown().await?;
    Ok(())
}

async fn call(args: CallArgs, loader: &FsResourceLoader) -> anyhow::Result<()> {
    let client = build_client(&args, loader)?;
    let headers: Vec<(&str, &str)> = args
        .headers
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let response = match args.method {
        Method::Get | Method::Delete => {
            if args.media_type != "none" || args.body.is_some() {
                bail!("{:?} requests carry no body", args.method);
            }
            let url = build_url(&args.url, &args.params)?;
            if args.method == Method::Get {
                client.get(&url, &headers).await?
            } else {
                client.delete(&url, &headers).await?
            }
        }
        Method::Post | Method::Put => {
            let body =
                RequestBody::from_media_type(&args.media_type, &args.params, args.body.as_deref())?;
            if args.method == Method::Post {
                client.post(&args.url, &headers, body).await?
            } else {
                client.put(&args.url, &headers, body).await?
            }
        }
    };

    tracing::info!("{} {}", response.status(), response.url());
    println!("{}", response.text()?);
    Ok(())
}

fn build_client(args: &CallArgs, loader: &FsResourceLoader) -> anyhow::Result<HttpsClient> {
    let config = HttpConfig::default();
    if args.trust_everything {
        return Ok(HttpsClient::insecure_trust_everything(config)?);
    }

    let ca_name = args
        .ca
        .as_deref()
        .context("--ca is required unless --trust-everything is given")?;
    let ca = loader.load_text(ca_name)?;

    let trust: TlsTrustConfiguration = match &args.keystore {
        Some(keystore) => {
            let bytes = loader.load_bytes(keystore)?;
            let passphrase = args.keystore_pass.clone().unwrap_or_default();
            KeystoreCredentials::new(ca, bytes, passphrase).build()?
        }
        None => {
            let key = args.client_key.as_deref().map(|n| loader.load_text(n)).transpose()?;
            let cert = args.client_cert.as_deref().map(|n| loader.load_text(n)).transpose()?;
            PemCredentials::from_parts(ca, key, cert).build()?
        }
    };

    let hostname = if args.insecure_hostname {
        HostnameVerification::AcceptAll
    } else {
        HostnameVerification::Strict
    };
    Ok(HttpsClient::new(config, &trust, hostname)?)
}
