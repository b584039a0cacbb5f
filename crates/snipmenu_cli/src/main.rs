//! Command-line management client for the snipmenu store.
//!
//! This is the interactive settings surface: it is the one path where remote
//! source failures and persistence failures are surfaced to the user instead
//! of degrading silently.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use snipmenu_core::index::TemplateIndex;
use snipmenu_core::models::template::{CreateTemplateRequest, UpdateTemplateRequest};
use snipmenu_core::{AppError, Config, RemoteFetcher, Store};
use snipmenu_host::backend::TemplateSummary;
use snipmenu_host::menu::{self, MenuHost};
use std::io::{self, Read};

#[derive(Parser)]
#[command(name = "snipmenu", about = "Manage snipmenu templates", version)]
struct Cli {
    /// Store directory (defaults to SNIPMENU_STORE_PATH or the user cache dir)
    #[arg(short, long)]
    store: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List the merged template index (user templates + remote defaults)
    List {
        /// Skip the remote fetch and list only stored templates
        #[arg(long)]
        local: bool,
    },
    /// Create a template; content comes from --content, --file, or stdin
    New {
        name: String,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Update a template's name and/or content
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a template
    Delete { id: String },
    /// Print a template's content
    Show { id: String },
    /// Set the remote template source URL (an empty string clears it)
    SetSource { url: String },
    /// Print the configured remote template source URL
    Source,
    /// Validate the remote source with a fetch and report the record count
    Refresh {
        /// Validate a candidate URL instead of the stored one
        url: Option<String>,
    },
    /// Preview the context-menu entries a rebuild would produce
    Menu {
        /// Skip the remote fetch and preview only stored templates
        #[arg(long)]
        local: bool,
    },
}

fn summaries(index: &TemplateIndex) -> Vec<TemplateSummary> {
    index
        .entries()
        .iter()
        .enumerate()
        .map(|(position, entry)| TemplateSummary::from_entry(position, entry))
        .collect()
}

fn format_list_output(items: &[TemplateSummary], json: bool) -> Result<String, AppError> {
    if json {
        return Ok(serde_json::to_string_pretty(items)?);
    }

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let marker = if item.locked { " (default)" } else { "" };
        rows.push(format!(
            "{:<36} {:<24} {:>6} chars{}",
            item.id, item.name, item.content_len, marker
        ));
    }
    Ok(rows.join("\n"))
}

/// Menu host that renders the subtree as indented text instead of mutating a
/// native menu.
#[derive(Default)]
struct PreviewMenuHost {
    lines: Vec<String>,
}

impl MenuHost for PreviewMenuHost {
    fn remove_all(&mut self) -> Result<(), AppError> {
        self.lines.clear();
        Ok(())
    }

    fn add_root(&mut self, _id: &str, title: &str) -> Result<(), AppError> {
        self.lines.push(title.to_string());
        Ok(())
    }

    fn add_entry(&mut self, id: &str, _parent_id: &str, title: &str) -> Result<(), AppError> {
        self.lines.push(format!("  [{}] {}", id, title));
        Ok(())
    }
}

/// Build the merged index from the store, optionally including the remote
/// defaults the background coordinator would fetch.
fn merged_index(
    store: &Store,
    fetcher: &RemoteFetcher,
    local: bool,
) -> Result<TemplateIndex, AppError> {
    let user = store.load_templates()?;
    let remote = if local {
        Vec::new()
    } else {
        fetcher.fetch_or_default(&store.remote_source_url()?)
    };
    Ok(TemplateIndex::build(&user, &remote))
}

/// Refuse edits/deletes of records the merged index marks read-only.
fn ensure_editable(store: &Store, fetcher: &RemoteFetcher, id: &str) -> Result<(), AppError> {
    let index = merged_index(store, fetcher, false)?;
    if index.is_locked(id) {
        return Err(AppError::Locked(format!(
            "template '{}' is a remote default and cannot be edited",
            id
        )));
    }
    Ok(())
}

fn resolve_content(
    content: Option<String>,
    file: Option<String>,
) -> Result<String, AppError> {
    if let Some(content) = content {
        return Ok(content);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .map_err(|err| AppError::BadRequest(format!("cannot read '{}': {}", path, err)));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| AppError::BadRequest(format!("cannot read stdin: {}", err)))?;
    Ok(buffer)
}

fn run_command(store: &Store, command: Commands, json: bool) -> Result<(), AppError> {
    let fetcher = RemoteFetcher::new();
    match command {
        Commands::Completions { .. } => unreachable!("completions handled before store setup"),
        Commands::List { local } => {
            let index = merged_index(store, &fetcher, local)?;
            let output = format_list_output(&summaries(&index), json)?;
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Commands::New {
            name,
            content,
            file,
        } => {
            let content = resolve_content(content, file)?;
            let template = store.create_template(CreateTemplateRequest { name, content })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&template)?);
            } else {
                println!("Created template: {}", template.id);
            }
        }
        Commands::Edit { id, name, content } => {
            ensure_editable(store, &fetcher, &id)?;
            let update = UpdateTemplateRequest { name, content };
            let template = store.update_template(&id, update)?.ok_or(AppError::NotFound)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&template)?);
            } else {
                println!("Updated template: {}", template.id);
            }
        }
        Commands::Delete { id } => {
            ensure_editable(store, &fetcher, &id)?;
            if !store.delete_template(&id)? {
                return Err(AppError::NotFound);
            }
            println!("Deleted template: {}", id);
        }
        Commands::Show { id } => {
            let index = merged_index(store, &fetcher, false)?;
            let entry = index
                .entries()
                .iter()
                .find(|entry| entry.template.id == id)
                .ok_or(AppError::NotFound)?;
            print!("{}", entry.template.content);
        }
        Commands::SetSource { url } => {
            let url = url.trim();
            store.set_remote_source_url(url)?;
            if url.is_empty() {
                println!("Cleared remote template source");
            } else {
                println!("Remote template source: {}", url);
            }
        }
        Commands::Source => {
            println!("{}", store.remote_source_url()?);
        }
        Commands::Refresh { url } => {
            let url = match url {
                Some(url) => url,
                None => {
                    let stored = store.remote_source_url()?;
                    if stored.is_empty() {
                        return Err(AppError::BadRequest(
                            "no remote template source configured".to_string(),
                        ));
                    }
                    stored
                }
            };
            // The validation path surfaces fetch errors instead of degrading.
            let templates = fetcher.fetch(&url)?;
            println!("{}: {} templates", url, templates.len());
        }
        Commands::Menu { local } => {
            let index = merged_index(store, &fetcher, local)?;
            let mut preview = PreviewMenuHost::default();
            menu::rebuild(&mut preview, &index)?;
            println!("{}", preview.lines.join("\n"));
        }
    }
    Ok(())
}

fn main() {
    let Cli {
        store,
        json,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return;
    }

    let store_dir = store.unwrap_or_else(|| Config::from_env().store_path);
    let store = match Store::open(&store_dir) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("cannot open store at '{}': {}", store_dir, err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(&store, command, json) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snipmenu_core::models::template::Template;

    fn record(id: &str, name: &str, content: &str) -> Template {
        Template {
            id: id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn list_output_marks_remote_defaults() {
        let index = TemplateIndex::build(
            &[record("u1", "mine", "body")],
            &[record("r1", "default", "body")],
        );
        let output = format_list_output(&summaries(&index), false).expect("format");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("default"));
        assert!(lines[0].ends_with("(default)"));
        assert!(!lines[1].contains("(default)"));
    }

    #[test]
    fn list_output_in_json_is_the_summary_array() {
        let index = TemplateIndex::build(&[record("u1", "mine", "body")], &[]);
        let output = format_list_output(&summaries(&index), true).expect("format");

        let decoded: Vec<TemplateSummary> = serde_json::from_str(&output).expect("decode");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, "u1");
        assert!(!decoded[0].locked);
    }

    #[test]
    fn menu_preview_renders_root_and_identified_entries() {
        let index = TemplateIndex::build(
            &[record("u1", "mine", "body"), record("u2", "broken", "")],
            &[],
        );
        let mut preview = PreviewMenuHost::default();
        menu::rebuild(&mut preview, &index).expect("rebuild");

        assert_eq!(preview.lines.len(), 2);
        assert_eq!(preview.lines[0], "Insert template");
        assert!(preview.lines[1].contains("[snipmenu-entry-0]"));
        assert!(preview.lines[1].contains("mine"));
    }

    #[test]
    fn resolve_content_prefers_the_inline_argument() {
        let content =
            resolve_content(Some("inline".to_string()), Some("ignored.txt".to_string()))
                .expect("resolve");
        assert_eq!(content, "inline");
    }

    #[test]
    fn editable_check_rejects_locked_ids_only() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = Store::open(dir.path().to_str().expect("path")).expect("open");
        store
            .save_templates(&[record("u1", "mine", "body")])
            .expect("seed");

        let fetcher = RemoteFetcher::new();
        // No remote source configured: nothing is locked.
        assert!(ensure_editable(&store, &fetcher, "u1").is_ok());
        assert!(ensure_editable(&store, &fetcher, "unknown").is_ok());
    }
}
