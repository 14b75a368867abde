use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use docuport::api::DocuportApi;
use docuport::config::DocuportConfig;
use docuport::connector::http::HttpConnector;
use docuport::error::{DocuportError, Result};
use docuport::model::{
    BatchUpdateResultItem, Container, ContainerKind, Document, IndexField, QueryExpression,
    QueryResultPage,
};
use std::path::PathBuf;
use std::time::Duration;

mod args;
use args::{Cli, Commands};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Config management needs no connection.
    if let Commands::Config { key, value } = &cli.command {
        return handle_config(key.clone(), value.clone());
    }

    let api = init_api(&cli)?;
    let outcome = dispatch(&api, cli.command);
    // Best-effort release; the command's own outcome wins.
    let _ = api.close();
    outcome
}

fn dispatch(api: &DocuportApi<HttpConnector>, command: Commands) -> Result<()> {
    match command {
        Commands::Containers { cabinets, trays } => handle_containers(api, cabinets, trays),
        Commands::Count { cabinet } => handle_count(api, &cabinet),
        Commands::Search {
            cabinet,
            conditions,
            start,
            limit,
        } => handle_search(api, &cabinet, &conditions, start, limit),
        Commands::Move {
            document,
            from,
            to,
            drop_fields,
        } => handle_move(api, &document, &from, &to, drop_fields),
        Commands::Store {
            document,
            from,
            to,
            values,
            auto,
            keep,
        } => handle_store(api, &document, &from, &to, &values, auto, keep),
        Commands::Staple {
            container,
            documents,
        } => handle_merge(api, &container, documents, true),
        Commands::Clip {
            container,
            documents,
        } => handle_merge(api, &container, documents, false),
        Commands::Split {
            container,
            document,
            at,
            name,
        } => handle_split(api, &container, &document, at, name),
        Commands::Update {
            cabinet,
            conditions,
            values,
        } => handle_update(api, &cabinet, &conditions, &values),
        Commands::Token { hours } => handle_token(api, hours),
        Commands::Config { .. } => unreachable!("handled before connecting"),
    }
}

fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "docuport", "docuport").map(|d| d.config_dir().to_path_buf())
}

fn init_api(cli: &Cli) -> Result<DocuportApi<HttpConnector>> {
    let config = match config_dir() {
        Some(dir) => DocuportConfig::load(dir).unwrap_or_default(),
        None => DocuportConfig::default(),
    };

    let server = pick(cli.server.clone(), config.server_url, "server URL (--server)")?;
    let connector = HttpConnector::new(server)?;

    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("DOCUPORT_TOKEN").ok());
    let session = match token {
        Some(token) => connector.connect_with_token(&token)?,
        None => {
            let org = pick(cli.org.clone(), config.organization, "organization (--org)")?;
            let user = pick(cli.user.clone(), config.user_name, "user name (--user)")?;
            let password = std::env::var("DOCUPORT_PASSWORD").map_err(|_| {
                DocuportError::Usage("set DOCUPORT_PASSWORD or pass --token".to_string())
            })?;
            connector.connect(&org, &user, &password)?
        }
    };
    Ok(DocuportApi::new(connector, session))
}

fn pick(flag: Option<String>, from_config: String, what: &str) -> Result<String> {
    flag.or_else(|| (!from_config.is_empty()).then_some(from_config))
        .ok_or_else(|| DocuportError::Usage(format!("{} is not set", what)))
}

/// Resolve a container name against cabinets first, then trays.
fn resolve_any(api: &DocuportApi<HttpConnector>, name: &str) -> Result<Container> {
    match api.resolve_cabinet(name) {
        Err(DocuportError::NotFound(_)) => api.resolve_tray(name),
        other => other,
    }
}

fn parse_assignments(pairs: &[String]) -> Result<Vec<IndexField>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, value)| IndexField::new(name.trim(), value.trim()))
                .ok_or_else(|| {
                    DocuportError::Usage(format!("'{}' is not of the form FIELD=VALUE", pair))
                })
        })
        .collect()
}

fn parse_expression(conditions: &[String]) -> Result<Option<QueryExpression>> {
    if conditions.is_empty() {
        return Ok(None);
    }
    let mut expr = QueryExpression::new();
    for field in parse_assignments(conditions)? {
        expr = expr.field(field.name, field.value);
    }
    Ok(Some(expr))
}

fn handle_containers(
    api: &DocuportApi<HttpConnector>,
    cabinets: bool,
    trays: bool,
) -> Result<()> {
    let kind = if cabinets {
        Some(ContainerKind::Cabinet)
    } else if trays {
        Some(ContainerKind::Tray)
    } else {
        None
    };
    let containers = api.list_containers(kind)?;
    if containers.is_empty() {
        println!("{}", "No accessible containers.".dimmed());
        return Ok(());
    }
    for c in containers {
        let tag = match c.kind {
            ContainerKind::Cabinet => "cabinet".blue(),
            ContainerKind::Tray => "tray".yellow(),
        };
        println!("{}  {} [{}]", c.id.dimmed(), c.name.bold(), tag);
    }
    Ok(())
}

fn handle_count(api: &DocuportApi<HttpConnector>, cabinet: &str) -> Result<()> {
    let container = api.resolve_cabinet(cabinet)?;
    let n = api.count(&container)?;
    println!("{} document(s) in {}", n.to_string().bold(), container.name);
    Ok(())
}

fn handle_search(
    api: &DocuportApi<HttpConnector>,
    cabinet: &str,
    conditions: &[String],
    start: u64,
    limit: Option<u64>,
) -> Result<()> {
    let container = resolve_any(api, cabinet)?;
    let expression = parse_expression(conditions)?;

    match limit {
        Some(page_size) => {
            let page = api.page(&container, expression.as_ref(), start, page_size)?;
            print_page(&page);
        }
        None => {
            let documents = api.all(&container, expression.as_ref())?;
            let total = documents.len();
            for doc in &documents {
                print_document(doc);
            }
            println!("{}", format!("{} document(s)", total).dimmed());
        }
    }
    Ok(())
}

fn handle_move(
    api: &DocuportApi<HttpConnector>,
    document_id: &str,
    from: &str,
    to: &str,
    drop_fields: bool,
) -> Result<()> {
    let source = resolve_any(api, from)?;
    let destination = api.resolve_tray(to)?;
    let document = Document::new(document_id, "");

    let result = if drop_fields {
        api.move_dropping_fields(&document, &source, &destination)?
    } else {
        api.move_full(&document, &source, &destination)?
    };
    println!(
        "{} moved into {}",
        "✓".green(),
        destination.name.bold()
    );
    print_page(&result);
    Ok(())
}

fn handle_store(
    api: &DocuportApi<HttpConnector>,
    document_id: &str,
    from: &str,
    to: &str,
    values: &[String],
    auto: bool,
    keep: bool,
) -> Result<()> {
    let source = api.resolve_tray(from)?;
    let destination = api.resolve_cabinet(to)?;
    let document = Document::new(document_id, "");

    let result = if auto {
        api.store_with_auto_hints(&document, &source, &destination)?
    } else {
        let index_values = parse_assignments(values)?;
        api.store_with_values(&document, &source, &destination, index_values, keep)?
    };
    println!(
        "{} stored into {}{}",
        "✓".green(),
        destination.name.bold(),
        if keep { " (copy kept in tray)" } else { "" }
    );
    print_page(&result);
    Ok(())
}

fn handle_merge(
    api: &DocuportApi<HttpConnector>,
    container: &str,
    documents: Vec<String>,
    staple: bool,
) -> Result<()> {
    let container = resolve_any(api, container)?;
    let merged = if staple {
        api.staple(&documents, &container)?
    } else {
        api.clip(&documents, &container)?
    };
    println!(
        "{} {} document(s) combined into:",
        "✓".green(),
        documents.len()
    );
    print_document(&merged);
    Ok(())
}

fn handle_split(
    api: &DocuportApi<HttpConnector>,
    container: &str,
    document_id: &str,
    at: u32,
    name: Option<String>,
) -> Result<()> {
    let container = resolve_any(api, container)?;
    let document = Document::new(document_id, "");
    let names: Vec<String> = name.into_iter().collect();
    let result = api.split(&document, &[at], &names, &container)?;
    println!("{} split at page {}:", "✓".green(), at);
    print_page(&result);
    Ok(())
}

fn handle_update(
    api: &DocuportApi<HttpConnector>,
    cabinet: &str,
    conditions: &[String],
    values: &[String],
) -> Result<()> {
    let container = api.resolve_cabinet(cabinet)?;
    let expression = parse_expression(conditions)?;
    let index_values = parse_assignments(values)?;

    let items = api.update_fields(&container, expression.as_ref(), &index_values)?;
    let failures = items.iter().filter(|i| !i.succeeded()).count();
    for item in &items {
        print_update_item(item);
    }
    if failures > 0 {
        println!(
            "{}",
            format!("{} of {} document(s) rejected", failures, items.len()).yellow()
        );
    } else {
        println!("{}", format!("{} document(s) updated", items.len()).green());
    }
    Ok(())
}

fn handle_token(api: &DocuportApi<HttpConnector>, hours: u64) -> Result<()> {
    let token = api.request_multi_use_token(Duration::from_secs(hours * 3600))?;
    println!("{}", token);
    Ok(())
}

fn handle_config(key: Option<String>, value: Option<String>) -> Result<()> {
    let dir = config_dir()
        .ok_or_else(|| DocuportError::Usage("cannot determine config directory".to_string()))?;
    let mut config = DocuportConfig::load(&dir)?;

    match (key.as_deref(), value) {
        (None, _) => {
            println!("server-url   {}", config.server_url);
            println!("organization {}", config.organization);
            println!("user-name    {}", config.user_name);
        }
        (Some(key), None) => {
            let value = match key {
                "server-url" => &config.server_url,
                "organization" => &config.organization,
                "user-name" => &config.user_name,
                _ => return Err(DocuportError::Usage(format!("unknown config key '{}'", key))),
            };
            println!("{}", value);
        }
        (Some(key), Some(value)) => {
            match key {
                "server-url" => config.server_url = value,
                "organization" => config.organization = value,
                "user-name" => config.user_name = value,
                _ => return Err(DocuportError::Usage(format!("unknown config key '{}'", key))),
            }
            config.save(&dir)?;
            println!("{}", "Saved.".green());
        }
    }
    Ok(())
}

fn print_page(page: &QueryResultPage) {
    for doc in &page.items {
        print_document(doc);
    }
    println!(
        "{}",
        format!(
            "showing {} item(s) from offset {} of {} total",
            page.items.len(),
            page.start_offset,
            page.total_count
        )
        .dimmed()
    );
}

fn print_document(doc: &Document) {
    let fields = doc
        .fields
        .iter()
        .map(|f| format!("{}={}", f.name, f.value))
        .collect::<Vec<_>>()
        .join(", ");
    if fields.is_empty() {
        println!("{}  {}", doc.id.dimmed(), doc.title.bold());
    } else {
        println!("{}  {}  {}", doc.id.dimmed(), doc.title.bold(), fields.dimmed());
    }
}

fn print_update_item(item: &BatchUpdateResultItem) {
    match &item.error_message {
        None => println!("{} {}", "✓".green(), item.document.id),
        Some(message) => println!("{} {}: {}", "✗".red(), item.document.id, message),
    }
}
