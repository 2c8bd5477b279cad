use super::app::Cli;
use super::filter_expr::parse_filters;
use crate::api::config::{ClientConfig, ClientConfigBuilder, ResponseFormat};
use crate::api::constants::endpoints;
use crate::api::transport::FetchResult;
use crate::api::OpenF1Client;
use crate::config::FileConfig;
use anyhow::{Context, Result, bail};
use log::{debug, info};

/// Layer file config, environment and flags, in increasing precedence
pub fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let file = FileConfig::load(cli.config.as_deref())?;
    let builder = file.apply(ClientConfig::builder())?;
    let mut builder = builder.with_env().context("Invalid OPENF1_* environment")?;

    builder = apply_flags(builder, cli)?;
    Ok(builder.build()?)
}

fn apply_flags(mut builder: ClientConfigBuilder, cli: &Cli) -> Result<ClientConfigBuilder> {
    if let Some(url) = &cli.base_url {
        builder = builder.base_url(url);
    }
    if let Some(token) = &cli.token {
        builder = builder.access_token(token);
    }
    if let Some(username) = &cli.username {
        let password = match &cli.password {
            Some(p) => p.clone(),
            None => rpassword::prompt_password(format!("Password for {}: ", username))
                .context("Failed to read password")?,
        };
        builder = builder.credentials(username, password);
    } else if cli.password.is_some() {
        bail!("--password requires --username");
    }
    if cli.csv {
        builder = builder.default_format(ResponseFormat::Csv);
    }
    Ok(builder)
}

fn check_endpoint(name: &str) -> Result<()> {
    if !endpoints::ALL.contains(&name) {
        bail!("Unknown endpoint '{}'. Available: {}", name, endpoints::ALL.join(", "));
    }
    Ok(())
}

/// Execute one query and return what should be printed
pub async fn run(cli: &Cli) -> Result<String> {
    check_endpoint(&cli.endpoint)?;
    let filters = parse_filters(cli.filters.as_slice())?;
    let config = resolve_config(cli)?;

    let client = OpenF1Client::new(config).await?;
    info!("Querying {} as {}", cli.endpoint, client);

    let transport = client.transport();
    let output = if cli.count {
        let records = transport.fetch_json(&cli.endpoint, &filters).await?;
        records.len().to_string()
    } else {
        match transport.fetch(&cli.endpoint, &filters, None).await? {
            FetchResult::Csv(text) => text,
            FetchResult::Json(records) => {
                debug!("Received {} records", records.len());
                serde_json::to_string_pretty(&records).context("Failed to serialize response")?
            }
        }
    };

    client.close();
    Ok(output)
}
