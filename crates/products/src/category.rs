//! Remote categories and the name <-> id mapping used by product forms.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use storefront_core::CategoryId;

/// Id used when a category name cannot be matched.
pub const DEFAULT_CATEGORY_ID: CategoryId = CategoryId::new(1);

/// A category as listed by the remote catalog. Extra remote fields (slug,
/// image, timestamps) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }
}

/// Ordered set of categories.
///
/// # Invariants
/// - ids are unique (later duplicates are dropped on construction);
/// - names may repeat, lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryMap {
    categories: Vec<Category>,
}

impl CategoryMap {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut seen = HashSet::new();
        let categories = categories
            .into_iter()
            .filter(|c| seen.insert(c.id))
            .collect();
        Self { categories }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty map means categories are currently unavailable.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// `(id, name)` pairs for populating a selection widget.
    pub fn choices(&self) -> impl Iterator<Item = (CategoryId, &str)> {
        self.categories.iter().map(|c| (c.id, c.name.as_str()))
    }

    pub fn contains_id(&self, id: CategoryId) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    /// Exact (case-sensitive) name match.
    pub fn lookup(&self, name: &str) -> Option<CategoryId> {
        self.categories.iter().find(|c| c.name == name).map(|c| c.id)
    }

    /// Id for a category name, falling back to [`DEFAULT_CATEGORY_ID`].
    pub fn id_for(&self, name: &str) -> CategoryId {
        self.lookup(name).unwrap_or(DEFAULT_CATEGORY_ID)
    }

    /// Find a category from a form value: a known numeric id, else a name.
    pub fn find_ref(&self, reference: &str) -> Option<&Category> {
        let reference = reference.trim();
        if let Ok(id) = reference.parse::<CategoryId>() {
            if let Some(found) = self.categories.iter().find(|c| c.id == id) {
                return Some(found);
            }
        }
        self.categories.iter().find(|c| c.name == reference)
    }

    /// Like [`CategoryMap::find_ref`], with the default-id fallback.
    pub fn resolve_ref(&self, reference: &str) -> CategoryId {
        self.find_ref(reference)
            .map(|c| c.id)
            .unwrap_or(DEFAULT_CATEGORY_ID)
    }
}

impl FromIterator<Category> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// What to do with a category reference that matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFallback {
    /// Submit with this id instead.
    Default(CategoryId),
    /// Refuse the submission.
    Reject,
}

impl Default for CategoryFallback {
    fn default() -> Self {
        CategoryFallback::Default(DEFAULT_CATEGORY_ID)
    }
}

/// Outcome of resolving a form's category reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Matched(CategoryId),
    FellBack(CategoryId),
    Unresolved,
}

impl Resolution {
    pub fn id(self) -> Option<CategoryId> {
        match self {
            Resolution::Matched(id) | Resolution::FellBack(id) => Some(id),
            Resolution::Unresolved => None,
        }
    }
}

impl CategoryFallback {
    /// Resolve a form's category reference. With no categories known, a
    /// numeric reference is taken at face value.
    pub fn resolve(self, categories: &CategoryMap, reference: &str) -> Resolution {
        if categories.is_empty() {
            if let Ok(id) = reference.parse::<CategoryId>() {
                return Resolution::Matched(id);
            }
        }
        match categories.find_ref(reference) {
            Some(category) => Resolution::Matched(category.id),
            None => match self {
                CategoryFallback::Default(id) => Resolution::FellBack(id),
                CategoryFallback::Reject => Resolution::Unresolved,
            },
        }
    }
}
