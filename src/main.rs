use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docs_catalog::{Config, DocStore, FilePayloadSource, TypeKind};

#[derive(Parser)]
#[command(name = "docs-catalog")]
#[command(about = "In-memory documentation index and search over extracted game source catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Load the catalog and print index statistics")]
    Stats {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
    #[command(about = "Show one type: members, inheritance, overrides, references")]
    Show {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
        #[arg(help = "Type name, e.g. 'Pawn'")]
        name: String,
    },
    #[command(about = "Search the catalog")]
    Search {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
        query: String,
        #[arg(long, help = "Maximum results to print", default_value_t = 20)]
        limit: usize,
    },
    #[command(about = "List types in one category")]
    Category {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
        #[arg(help = "class, interface, struct or enum")]
        kind: String,
    },
    #[command(about = "Print the comment key for a type or member")]
    Key {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
        type_name: String,
        #[arg(help = "Optional member name")]
        member: Option<String>,
    },
    #[command(about = "Show XML usages for a tag group or translation usages for a key")]
    Refs {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
        #[arg(long, help = "XML tag group, e.g. 'thingClass'")]
        tag_group: Option<String>,
        #[arg(long, help = "Translation key")]
        translation: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { config } => stats(config).await,
        Commands::Show { config, name } => show_type(config, name).await,
        Commands::Search { config, query, limit } => search(config, query, limit).await,
        Commands::Category { config, kind } => category(config, kind).await,
        Commands::Key { config, type_name, member } => print_key(config, type_name, member).await,
        Commands::Refs { config, tag_group, translation } => refs(config, tag_group, translation).await,
    }
}

fn load_config(path: &PathBuf) -> Result<Config> {
    if path.exists() {
        Config::from_file(path.to_str().unwrap_or("config.toml"))
    } else {
        eprintln!("⚠️ No config at {:?}, using defaults", path);
        Ok(Config::default())
    }
}

fn open_store(config: Config) -> DocStore<FilePayloadSource> {
    let source = FilePayloadSource::new(config.data.root.clone());
    DocStore::new(config, source)
}

async fn stats(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)?;
    let store = open_store(config);

    eprintln!("📦 Loading catalog...");
    let loaded = store.ensure_loaded().await?;

    println!("Generated at: {}", loaded.payload.generated_at);
    println!(
        "Declared: {} types, {} members",
        loaded.payload.total_types, loaded.payload.total_members
    );
    println!("{}", loaded.index.stats());
    Ok(())
}

async fn show_type(config_path: PathBuf, name: String) -> Result<()> {
    let config = load_config(&config_path)?;
    let store = open_store(config);
    let loaded = store.ensure_loaded().await?;

    let Some(record) = loaded.index.get_type(&name) else {
        println!("❌ Type '{}' not found in the catalog", name);
        return Ok(());
    };

    println!("{} {} ({}:{})", record.kind, record.name, record.file, record.line);
    println!("  access: {}", record.access_modifier);
    if !record.modifiers.is_empty() {
        println!("  modifiers: {}", record.modifiers.join(" "));
    }
    if let Some(comment) = store.comment_for_type(record).await {
        println!("  💬 {}", comment);
    }

    let bases = loaded.index.get_inheritance(&name);
    if !bases.is_empty() {
        println!("  bases: {}", bases.join(", "));
    }
    let derived = loaded.index.get_derived_types(&name);
    if !derived.is_empty() {
        println!("  derived: {}", derived.join(", "));
    }

    let mut referencing = loaded.index.get_referencing_types(&name);
    if !referencing.is_empty() {
        referencing.sort();
        println!("  referenced by: {}", referencing.join(", "));
    }

    println!("  members ({}):", record.members.len());
    for member in &record.members {
        let mut line = format!("    {:?} {}", member.kind, member.name);
        if let Some(info) = loaded.index.get_override_info(&record.name, &member.name) {
            if let Some(base) = &info.overrides {
                line.push_str(&format!("  [overrides {}]", base));
            }
            if !info.overridden_by.is_empty() {
                let keys: Vec<String> =
                    info.overridden_by.iter().map(|k| k.to_string()).collect();
                line.push_str(&format!("  [overridden by {}]", keys.join(", ")));
            }
        }
        println!("{}", line);
    }
    Ok(())
}

async fn search(config_path: PathBuf, query: String, limit: usize) -> Result<()> {
    let config = load_config(&config_path)?;
    let store = open_store(config);
    store.ensure_loaded().await?;

    eprintln!("🔎 Searching for '{}'...", query);
    let results = store.search(&query).await;

    if results.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    println!("{} matches:", results.len());
    for result in results.iter().take(limit) {
        println!(
            "  {:>4}  {:<30} {:?} ({})",
            result.relevance, result.record.name, result.match_kind, result.record.file
        );
    }
    if results.len() > limit {
        println!("  ... and {} more", results.len() - limit);
    }
    Ok(())
}

async fn category(config_path: PathBuf, kind: String) -> Result<()> {
    let config = load_config(&config_path)?;
    let store = open_store(config);
    let loaded = store.ensure_loaded().await?;

    let kind: TypeKind = kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let records = loaded.index.get_types_by_category(kind);

    println!("{} ({}):", kind.plural_key(), records.len());
    for record in records {
        println!("  {} ({} members)", record.name, record.members.len());
    }
    Ok(())
}

async fn print_key(config_path: PathBuf, type_name: String, member: Option<String>) -> Result<()> {
    let config = load_config(&config_path)?;
    let store = open_store(config);
    let loaded = store.ensure_loaded().await?;

    let Some(record) = loaded.index.get_type(&type_name) else {
        println!("❌ Type '{}' not found in the catalog", type_name);
        return Ok(());
    };

    match member {
        None => println!("{}", store.key_scheme().comment_key(record)),
        Some(member_name) => {
            let Some(member) = record.members.iter().find(|m| m.name == member_name) else {
                println!("❌ Member '{}.{}' not found", type_name, member_name);
                return Ok(());
            };
            println!("{}", store.key_scheme().member_comment_key(record, member));
        }
    }
    Ok(())
}

async fn refs(
    config_path: PathBuf,
    tag_group: Option<String>,
    translation: Option<String>,
) -> Result<()> {
    let config = load_config(&config_path)?;
    let store = open_store(config);

    if let Some(group) = tag_group {
        let usages = store.xml_usages(&group).await;
        println!("XML usages for '{}' ({}):", group, usages.len());
        for usage in usages {
            println!("  {} <- {}:{}", usage.csharp_class, usage.xml_file, usage.xml_line);
        }
    } else if let Some(key) = translation {
        let usages = store.translation_usages(&key).await;
        println!("Translation usages for '{}' ({}):", key, usages.len());
        for usage in usages {
            println!("  {}:{} ({} xml files)", usage.csharp_file, usage.csharp_line, usage.xml_files.len());
        }
    } else {
        let groups = store.xml_tag_groups().await;
        println!("Known XML tag groups ({}):", groups.len());
        for group in groups {
            println!("  {}", group);
        }
    }
    Ok(())
}
