//! Shared types for the ideaforge application: the crate-wide Result alias,
//! the CLI command set, and the idea filter used for browsing.

use clap::Subcommand;

use crate::{Complexity, Idea, IdeaError};

/// A specialized Result type for ideaforge operations.
pub type Result<T> = std::result::Result<T, IdeaError>;

/// Available subcommands for the ideaforge application
#[derive(Subcommand)]
pub enum Commands {
    /// Generate ideas for a topic
    Generate {
        /// Topic to generate ideas for
        #[clap(short, long)]
        topic: String,

        /// How many ideas to request (defaults to the configured count)
        #[clap(short = 'n', long)]
        count: Option<usize>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Print the raw backend text instead of parsed records
        #[clap(long)]
        raw: bool,
    },

    /// List ideas from the most recent generation, with optional filtering
    List {
        /// Filter by category (case-insensitive)
        #[clap(short, long)]
        category: Option<String>,

        /// Filter by complexity
        #[clap(short = 'x', long, value_parser = ["simple", "medium", "hard"])]
        complexity: Option<String>,

        /// Only show monetizable ideas
        #[clap(short, long)]
        monetizable: bool,

        /// Filter by tag (case-insensitive)
        #[clap(short, long)]
        tag: Option<String>,

        /// Limit the number of ideas shown (0 means no limit)
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Show full descriptions instead of previews
        #[clap(short, long)]
        detailed: bool,
    },

    /// Favorite operations (add, remove, list, search)
    Fav {
        /// Favorite an idea from the last generation by id
        #[clap(short, long)]
        add: Option<String>,

        /// Remove a favorited idea by id
        #[clap(short, long)]
        remove: Option<String>,

        /// List all favorites
        #[clap(short, long)]
        list: bool,

        /// Fuzzy-search favorites by title and description
        #[clap(short, long)]
        search: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Print a clipboard-ready text block for one idea
    Copy {
        /// Id of the idea to format
        id: String,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Update a configuration setting (key=value)
        #[clap(short, long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}

/// Filter over canonical idea records, used by `list` and `fav --list`.
/// Empty filter matches everything.
#[derive(Debug, Default, Clone)]
pub struct IdeaFilter {
    pub category: Option<String>,
    pub complexity: Option<Complexity>,
    pub monetizable: Option<bool>,
    pub tag: Option<String>,
}

impl IdeaFilter {
    pub fn matches(&self, idea: &Idea) -> bool {
        if let Some(category) = &self.category {
            if !idea.category.trim().eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }

        if let Some(complexity) = self.complexity {
            if idea.complexity != complexity {
                return false;
            }
        }

        if let Some(monetizable) = self.monetizable {
            if idea.monetizable != monetizable {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            let wanted = tag.trim().to_lowercase();
            let found = idea
                .tags
                .as_ref()
                .is_some_and(|tags| tags.iter().any(|t| t.trim().to_lowercase() == wanted));
            if !found {
                return false;
            }
        }

        true
    }
}

/// Parses the CLI complexity filter value.
pub fn parse_complexity_filter(value: &str) -> Option<Complexity> {
    match value.trim().to_lowercase().as_str() {
        "simple" => Some(Complexity::Simple),
        "medium" => Some(Complexity::Medium),
        "hard" => Some(Complexity::Hard),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea_with_tags(tags: Option<Vec<String>>) -> Idea {
        Idea::new(
            "t".to_string(),
            "d".to_string(),
            Complexity::Simple,
            true,
            "앱".to_string(),
            tags,
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = IdeaFilter::default();
        assert!(filter.matches(&idea_with_tags(None)));
    }

    #[test]
    fn test_category_filter_is_case_insensitive() {
        let mut idea = idea_with_tags(None);
        idea.category = "Apps".to_string();

        let filter = IdeaFilter {
            category: Some("apps".to_string()),
            ..IdeaFilter::default()
        };
        assert!(filter.matches(&idea));

        let filter = IdeaFilter {
            category: Some("games".to_string()),
            ..IdeaFilter::default()
        };
        assert!(!filter.matches(&idea));
    }

    #[test]
    fn test_tag_filter_requires_tags_present() {
        let filter = IdeaFilter {
            tag: Some("ai".to_string()),
            ..IdeaFilter::default()
        };

        assert!(!filter.matches(&idea_with_tags(None)));
        assert!(filter.matches(&idea_with_tags(Some(vec!["AI".to_string()]))));
        assert!(!filter.matches(&idea_with_tags(Some(vec!["ml".to_string()]))));
    }

    #[test]
    fn test_monetizable_and_complexity_filters() {
        let idea = idea_with_tags(None);

        let filter = IdeaFilter {
            monetizable: Some(true),
            complexity: Some(Complexity::Simple),
            ..IdeaFilter::default()
        };
        assert!(filter.matches(&idea));

        let filter = IdeaFilter {
            monetizable: Some(false),
            ..IdeaFilter::default()
        };
        assert!(!filter.matches(&idea));
    }

    #[test]
    fn test_parse_complexity_filter() {
        assert_eq!(parse_complexity_filter("simple"), Some(Complexity::Simple));
        assert_eq!(parse_complexity_filter("MEDIUM"), Some(Complexity::Medium));
        assert_eq!(parse_complexity_filter(" hard "), Some(Complexity::Hard));
        assert_eq!(parse_complexity_filter("extreme"), None);
    }
}
