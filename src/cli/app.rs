//! CLI command handling for the ideaforge application.
//!
//! This module connects the clap command set to the generation pipeline and
//! the favorites store, and renders idea records for the terminal.

use std::{path::PathBuf, sync::Arc};

use log::{debug, info};
use tokio::sync::Mutex;

use crate::{
    extract_candidates, normalize_candidates, parse_complexity_filter, Commands, Config,
    Favorite, FavoriteStore, GenClient, GenerationBatch, Idea, IdeaError, IdeaFilter,
    ResultCache, Result,
};

/// CLI application handler - processes commands and interfaces with the
/// favorites store and the generation backend.
pub struct App {
    /// The favorites store backend
    store: Arc<Mutex<FavoriteStore>>,

    /// Cache of the most recent generation
    results: ResultCache,

    /// Application configuration
    config: Config,

    /// Where the configuration file lives (for `config --set/--reset`)
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application with the given store and config
    pub fn new(
        store: Arc<Mutex<FavoriteStore>>,
        results: ResultCache,
        config: Config,
        config_path: PathBuf,
        verbose: bool,
    ) -> Self {
        Self {
            store,
            results,
            config,
            config_path,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Generate {
                topic,
                count,
                json,
                raw,
            } => self.handle_generate(topic, count, json, raw).await?,

            Commands::List {
                category,
                complexity,
                monetizable,
                tag,
                limit,
                json,
                detailed,
            } => {
                let filter = build_filter(category, complexity, monetizable, tag);
                self.handle_list(filter, limit, json, detailed)?;
            }

            Commands::Fav {
                add,
                remove,
                list,
                search,
                json,
            } => self.handle_fav(add, remove, list, search, json).await?,

            Commands::Copy { id } => self.handle_copy(&id).await?,

            Commands::Config { show, set, reset } => self.handle_config(show, set, reset)?,
        }

        Ok(())
    }

    /// Generate ideas: relay -> extraction -> normalization -> render.
    async fn handle_generate(
        &self,
        topic: String,
        count: Option<usize>,
        json: bool,
        raw: bool,
    ) -> Result<()> {
        let count = count.unwrap_or(self.config.default_count);
        let client = GenClient::from_config(&self.config)?;

        let raw_text = client.generate_ideas(&topic, count).await?;

        if raw {
            println!("{}", raw_text);
            return Ok(());
        }

        let candidates = extract_candidates(&raw_text);
        let ideas = normalize_candidates(&candidates);
        info!(
            "Pipeline produced {} ideas from {} candidates",
            ideas.len(),
            candidates.len()
        );

        if ideas.is_empty() {
            // The pipeline itself is silent on failure; turning the empty
            // sequence into a user-visible error happens here.
            return Err(IdeaError::ApplicationError {
                message: "Could not parse any ideas from the backend response. Please retry."
                    .to_string(),
            });
        }

        let batch = GenerationBatch::new(topic, ideas);
        self.results.save(&batch)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&batch.ideas)?);
        } else {
            display_ideas_text(&batch.ideas, true);
            println!(
                "\nGenerated {} idea{} for \"{}\". Favorite one with `ideaforge fav --add <id>`.",
                batch.ideas.len(),
                if batch.ideas.len() == 1 { "" } else { "s" },
                batch.topic
            );
        }

        Ok(())
    }

    /// List ideas from the cached last generation, filtered.
    fn handle_list(
        &self,
        filter: IdeaFilter,
        limit: usize,
        json: bool,
        detailed: bool,
    ) -> Result<()> {
        let batch = self.results.load()?;
        debug!(
            "Listing from batch '{}' with {} ideas",
            batch.topic,
            batch.ideas.len()
        );

        let mut ideas: Vec<Idea> = batch
            .ideas
            .into_iter()
            .filter(|idea| filter.matches(idea))
            .collect();

        if limit > 0 && ideas.len() > limit {
            ideas.truncate(limit);
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&ideas)?);
            return Ok(());
        }

        if ideas.is_empty() {
            println!("No ideas found matching the criteria.");
            return Ok(());
        }

        println!(
            "Topic: {} (generated {})\n",
            batch.topic,
            batch.generated_at.format("%Y-%m-%d %H:%M")
        );
        display_ideas_text(&ideas, detailed);
        println!(
            "\nFound {} idea{}",
            ideas.len(),
            if ideas.len() == 1 { "" } else { "s" }
        );

        Ok(())
    }

    /// Favorite operations: add, remove, list, search.
    async fn handle_fav(
        &self,
        add: Option<String>,
        remove: Option<String>,
        list: bool,
        search: Option<String>,
        json: bool,
    ) -> Result<()> {
        if add.is_some() && remove.is_some() {
            return Err(IdeaError::ApplicationError {
                message: "Cannot specify both --add and --remove options".to_string(),
            });
        }

        if let Some(id) = add {
            let batch = self.results.load()?;
            let idea = batch
                .find(&id)
                .cloned()
                .ok_or_else(|| IdeaError::IdeaNotFound { id: id.clone() })?;

            let added = self.store.lock().await.add(&idea)?;
            if added {
                println!("Favorited \"{}\" ({})", idea.title, idea.id);
            } else {
                println!("\"{}\" ({}) is already a favorite", idea.title, idea.id);
            }
            return Ok(());
        }

        if let Some(id) = remove {
            self.store.lock().await.remove(&id)?;
            println!("Removed favorite {}", id);
            return Ok(());
        }

        let favorites = if let Some(query) = search {
            let results = self.store.lock().await.search(&query);
            if results.is_empty() {
                println!("No favorites found matching query: \"{}\"", query);
                return Ok(());
            }
            results
        } else {
            // Bare `fav` behaves like `fav --list`.
            let _ = list;
            self.store.lock().await.all()?
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&favorites)?);
            return Ok(());
        }

        if favorites.is_empty() {
            println!("No favorites saved yet.");
            return Ok(());
        }

        display_favorites_text(&favorites, self.verbose);
        println!(
            "\n{} favorite{}",
            favorites.len(),
            if favorites.len() == 1 { "" } else { "s" }
        );

        Ok(())
    }

    /// Print a clipboard-ready block for one idea, looked up in the result
    /// cache first and the favorites second.
    async fn handle_copy(&self, id: &str) -> Result<()> {
        let from_results = self
            .results
            .load()
            .ok()
            .and_then(|batch| batch.find(id).cloned());

        let idea = match from_results {
            Some(idea) => idea,
            None => self
                .store
                .lock()
                .await
                .get(id)
                .map(|favorite| favorite.idea)
                .ok_or_else(|| IdeaError::IdeaNotFound { id: id.to_string() })?,
        };

        print!("{}", format_clipboard(&idea));
        Ok(())
    }

    /// Configuration management: show, set, reset.
    fn handle_config(&self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        if let Some(assignment) = set {
            let mut config = self.config.clone();
            config.set(&assignment)?;
            config.save(&self.config_path)?;
            println!("Configuration updated: {}", assignment);
            return Ok(());
        }

        if reset {
            Config::default().save(&self.config_path)?;
            println!("Configuration reset to defaults");
            return Ok(());
        }

        // Bare `config` behaves like `config --show`.
        let _ = show;
        let mut display = self.config.clone();
        if display.api_key.is_some() {
            display.api_key = Some("********".to_string());
        }
        println!("{}", serde_json::to_string_pretty(&display)?);
        Ok(())
    }
}

/// Builds an [`IdeaFilter`] from the CLI flags.
fn build_filter(
    category: Option<String>,
    complexity: Option<String>,
    monetizable: bool,
    tag: Option<String>,
) -> IdeaFilter {
    IdeaFilter {
        category,
        complexity: complexity.as_deref().and_then(parse_complexity_filter),
        monetizable: if monetizable { Some(true) } else { None },
        tag,
    }
}

/// Display ideas in text format
fn display_ideas_text(ideas: &[Idea], detailed: bool) {
    let term_width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);

    for (i, idea) in ideas.iter().enumerate() {
        if i > 0 {
            println!("{}", "-".repeat(term_width.min(50)));
        }

        println!(
            "ID: {} | {} | {}{}",
            idea.id,
            styled_complexity(idea),
            idea.category,
            if idea.monetizable { " | $" } else { "" }
        );
        println!("Title: {}", console::style(&idea.title).bold());

        if let Some(tags) = &idea.tags {
            if !tags.is_empty() {
                let tags = tags
                    .iter()
                    .map(|tag| format!("#{}", tag))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("Tags: {}", console::style(tags).cyan());
            }
        }

        if detailed {
            println!("\n{}", idea.description);
        } else {
            let preview = get_preview(&idea.description, 100);
            if !preview.is_empty() {
                println!("\n{}", preview);
            }
        }
    }
}

/// Display favorites in text format
fn display_favorites_text(favorites: &[Favorite], detailed: bool) {
    let term_width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);

    for (i, favorite) in favorites.iter().enumerate() {
        if i > 0 {
            println!("{}", "-".repeat(term_width.min(50)));
        }

        println!(
            "ID: {} | Saved: {} | {}",
            favorite.idea.id,
            favorite.saved_at.format("%Y-%m-%d %H:%M"),
            favorite.idea.category
        );
        println!("Title: {}", console::style(&favorite.idea.title).bold());

        if detailed {
            println!("\n{}", favorite.idea.description);
        } else {
            let preview = get_preview(&favorite.idea.description, 100);
            if !preview.is_empty() {
                println!("{}", preview);
            }
        }
    }
}

fn styled_complexity(idea: &Idea) -> console::StyledObject<String> {
    use crate::Complexity;

    let label = idea.complexity.to_string();
    match idea.complexity {
        Complexity::Simple => console::style(label).green(),
        Complexity::Medium => console::style(label).yellow(),
        Complexity::Hard => console::style(label).red(),
    }
}

/// Plain-text block for pasting an idea elsewhere.
fn format_clipboard(idea: &Idea) -> String {
    let mut block = format!("{}\n\n{}\n", idea.title, idea.description);

    block.push_str(&format!(
        "\nComplexity: {} | Monetizable: {} | Category: {}\n",
        idea.complexity,
        if idea.monetizable { "yes" } else { "no" },
        idea.category
    ));

    if let Some(tags) = &idea.tags {
        if !tags.is_empty() {
            let tags = tags
                .iter()
                .map(|tag| format!("#{}", tag))
                .collect::<Vec<_>>()
                .join(" ");
            block.push_str(&format!("Tags: {}\n", tags));
        }
    }

    block
}

/// First non-empty line of `text`, truncated to `max_chars` characters.
fn get_preview(text: &str, max_chars: usize) -> String {
    let first_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complexity;

    fn sample_idea() -> Idea {
        Idea::new(
            "Recipe planner".to_string(),
            "Plans weekly meals.\nSecond line.".to_string(),
            Complexity::Hard,
            true,
            "앱".to_string(),
            Some(vec!["cooking".to_string(), "ai".to_string()]),
        )
    }

    #[test]
    fn test_format_clipboard_contains_all_fields() {
        let block = format_clipboard(&sample_idea());
        assert!(block.starts_with("Recipe planner\n\n"));
        assert!(block.contains("Plans weekly meals."));
        assert!(block.contains("Complexity: Hard"));
        assert!(block.contains("Monetizable: yes"));
        assert!(block.contains("Category: 앱"));
        assert!(block.contains("Tags: #cooking #ai"));
    }

    #[test]
    fn test_format_clipboard_omits_absent_tags() {
        let mut idea = sample_idea();
        idea.tags = None;
        assert!(!format_clipboard(&idea).contains("Tags:"));
    }

    #[test]
    fn test_get_preview_uses_first_non_empty_line() {
        assert_eq!(get_preview("\n\nhello\nworld", 100), "hello");
        assert_eq!(get_preview("", 100), "");
    }

    #[test]
    fn test_get_preview_truncates_multibyte_safely() {
        let text = "아이디어 ".repeat(40);
        let preview = get_preview(&text, 10);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 13);
    }

    #[test]
    fn test_build_filter_maps_flags() {
        let filter = build_filter(
            Some("앱".to_string()),
            Some("hard".to_string()),
            true,
            Some("ai".to_string()),
        );
        assert_eq!(filter.category.as_deref(), Some("앱"));
        assert_eq!(filter.complexity, Some(Complexity::Hard));
        assert_eq!(filter.monetizable, Some(true));
        assert_eq!(filter.tag.as_deref(), Some("ai"));

        let filter = build_filter(None, None, false, None);
        assert!(filter.monetizable.is_none());
        assert!(filter.complexity.is_none());
    }
}
