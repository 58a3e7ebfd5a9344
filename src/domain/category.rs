use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Name of the catch-all category returned when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "Other";

/// A category and the keywords that trigger it, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered mapping of category name to keywords.
///
/// Iteration follows insertion order, which is also the classifier's match
/// priority. Names are unique and case-sensitive. Keywords are stored as
/// entered; case folding only happens when matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStore {
    categories: Vec<Category>,
}

impl CategoryStore {
    /// A store with no categories at all.
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// The minimal store substituted when persisted categories can't be read.
    pub fn fallback() -> Self {
        let mut store = Self::empty();
        store.push(FALLBACK_CATEGORY, &[]);
        store
    }

    fn push(&mut self, name: &str, keywords: &[&str]) {
        self.categories.push(Category {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        });
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keywords(&self, name: &str) -> Option<&[String]> {
        self.get(name).map(|c| c.keywords.as_slice())
    }

    /// Category names in insertion order.
    pub fn list_categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Insert a new category with no keywords.
    pub fn add_category(&mut self, name: &str) -> Result<(), CategoryError> {
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }
        if self.contains(name) {
            return Err(CategoryError::AlreadyExists(name.to_string()));
        }
        self.push(name, &[]);
        Ok(())
    }

    /// Append a keyword to an existing category. Duplicates are allowed.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<(), CategoryError> {
        let entry = self
            .categories
            .iter_mut()
            .find(|c| c.name == category)
            .ok_or_else(|| CategoryError::NotFound(category.to_string()))?;
        entry.keywords.push(keyword.to_string());
        Ok(())
    }
}

impl Default for CategoryStore {
    /// The seed categories written on first run.
    fn default() -> Self {
        let mut store = Self::empty();
        store.push("Food", &["grocery", "restaurant", "lunch"]);
        store.push("Transport", &["uber", "taxi", "gas"]);
        store.push("Entertainment", &["movie", "game", "concert"]);
        store.push("Bills", &["electric", "water", "internet"]);
        store.push(FALLBACK_CATEGORY, &[]);
        store
    }
}

// Persisted as a plain JSON object. Entry order is the match priority and
// must survive both directions.
impl Serialize for CategoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = CategoryStore;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to keyword lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut store = CategoryStore::empty();
                while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
                    match store.categories.iter_mut().find(|c| c.name == name) {
                        // Later duplicate keys win, as with any JSON object reader.
                        Some(existing) => existing.keywords = keywords,
                        None => store.categories.push(Category { name, keywords }),
                    }
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    EmptyName,
    AlreadyExists(String),
    NotFound(String),
}

impl fmt::Display for CategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryError::EmptyName => write!(f, "Category name cannot be empty"),
            CategoryError::AlreadyExists(name) => write!(f, "Category already exists: {}", name),
            CategoryError::NotFound(name) => write!(f, "Category not found: {}", name),
        }
    }
}

impl std::error::Error for CategoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_order() {
        let store = CategoryStore::default();
        assert_eq!(
            store.list_categories(),
            vec!["Food", "Transport", "Entertainment", "Bills", "Other"]
        );
        assert_eq!(
            store.keywords("Transport").unwrap(),
            &["uber".to_string(), "taxi".to_string(), "gas".to_string()]
        );
        assert_eq!(store.keywords("Other").unwrap().len(), 0);
    }

    #[test]
    fn test_fallback_store() {
        let store = CategoryStore::fallback();
        assert_eq!(store.list_categories(), vec!["Other"]);
    }

    #[test]
    fn test_add_category_appends_at_end() {
        let mut store = CategoryStore::default();
        store.add_category("Health").unwrap();

        assert_eq!(store.list_categories().last(), Some(&"Health"));
        assert_eq!(store.keywords("Health").unwrap().len(), 0);
    }

    #[test]
    fn test_add_category_rejects_duplicate_and_empty() {
        let mut store = CategoryStore::default();

        assert_eq!(
            store.add_category("Food"),
            Err(CategoryError::AlreadyExists("Food".to_string()))
        );
        assert_eq!(store.add_category(""), Err(CategoryError::EmptyName));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_category_names_are_case_sensitive() {
        let mut store = CategoryStore::default();
        assert!(store.add_category("food").is_ok());
        assert!(store.contains("food"));
        assert!(store.contains("Food"));
    }

    #[test]
    fn test_add_keyword_keeps_text_and_duplicates() {
        let mut store = CategoryStore::default();
        store.add_keyword("Food", "Bakery").unwrap();
        store.add_keyword("Food", "Bakery").unwrap();

        let keywords = store.keywords("Food").unwrap();
        assert_eq!(keywords.len(), 5);
        assert_eq!(keywords[3], "Bakery");
        assert_eq!(keywords[4], "Bakery");
    }

    #[test]
    fn test_add_keyword_unknown_category() {
        let mut store = CategoryStore::default();
        assert_eq!(
            store.add_keyword("Travel", "hotel"),
            Err(CategoryError::NotFound("Travel".to_string()))
        );
    }

    #[test]
    fn test_json_preserves_order() {
        let mut store = CategoryStore::empty();
        store.add_category("Zoo").unwrap();
        store.add_category("Alpha").unwrap();
        store.add_keyword("Zoo", "tickets").unwrap();
        store.add_keyword("Zoo", "animals").unwrap();

        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"Zoo":["tickets","animals"],"Alpha":[]}"#);

        let parsed: CategoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store);
    }

    #[test]
    fn test_json_rejects_non_list_keywords() {
        let result: Result<CategoryStore, _> = serde_json::from_str(r#"{"Food": "grocery"}"#);
        assert!(result.is_err());
    }
}
