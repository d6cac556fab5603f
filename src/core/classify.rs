//! Keyword classifier for task titles.

use serde::{Deserialize, Serialize};

/// Coarse category of a task, used to infer dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Test,
    Documentation,
    Deployment,
    Refactor,
    Implementation,
    Feature,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Test => "test",
            Category::Documentation => "documentation",
            Category::Deployment => "deployment",
            Category::Refactor => "refactor",
            Category::Implementation => "implementation",
            Category::Feature => "feature",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked top to bottom; the first category with a matching keyword wins.
const KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Test, &["test", "spec", "verify", "validate"]),
    (Category::Documentation, &["document", "docs", "readme"]),
    (Category::Deployment, &["deploy", "release", "publish"]),
    (Category::Refactor, &["refactor", "restructure", "clean up", "cleanup"]),
    (
        Category::Implementation,
        &["implement", "create", "build", "add", "write"],
    ),
    (Category::Feature, &["feature"]),
];

pub const DEFAULT_CATEGORY: Category = Category::Feature;

/// Classify free text by substring keyword membership.
pub fn classify(text: &str) -> Category {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}
