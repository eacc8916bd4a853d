//! Category persistence access.
//!
//! Repositories hand out immutable `CategoryNode` snapshots translated for
//! the requested locale, so concurrent resolutions for different locales
//! never share mutable node state.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::models::{CategoryId, CategoryNode, CategoryRecord};

/// Read access to the category taxonomy.
///
/// Implementations must return an acyclic forest. The menu walk has no
/// cycle guard and would not terminate on a cyclic tree.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Look up one category (without children).
    async fn find(&self, id: CategoryId, locale: &str) -> Result<Option<CategoryNode>>;

    /// Root categories with their full subtrees, used for menu trees.
    async fn eager_root(&self, locale: &str) -> Result<Vec<CategoryNode>>;

    /// Root categories with their full subtrees, used for option lists.
    async fn nested(&self, locale: &str) -> Result<Vec<CategoryNode>>;
}

/// Category repository over an in-memory adjacency list.
#[derive(Debug, Default)]
pub struct InMemoryCategoryRepository {
    records: RwLock<Vec<CategoryRecord>>,
}

impl InMemoryCategoryRepository {
    pub fn new(records: Vec<CategoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Parse records from a JSON array.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<CategoryRecord> =
            serde_json::from_str(json).context("failed to parse category JSON")?;
        Ok(Self::new(records))
    }

    /// Parse records from a YAML sequence.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let records: Vec<CategoryRecord> =
            serde_yml::from_str(yaml).context("failed to parse category YAML")?;
        Ok(Self::new(records))
    }

    /// Load records from a `.json` file, or YAML for any other extension.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let repo = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        debug!(path = %path.display(), categories = repo.len(), "loaded categories");
        Ok(repo)
    }

    /// Replace every record. Callers purge cached menus afterwards.
    pub fn replace(&self, records: Vec<CategoryRecord>) {
        *self.records.write() = records;
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<CategoryRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn forest(&self, locale: &str) -> Vec<CategoryNode> {
        build_forest(&self.records.read(), locale)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find(&self, id: CategoryId, locale: &str) -> Result<Option<CategoryNode>> {
        Ok(find_record(&self.records.read(), id, locale))
    }

    async fn eager_root(&self, locale: &str) -> Result<Vec<CategoryNode>> {
        Ok(self.forest(locale))
    }

    async fn nested(&self, locale: &str) -> Result<Vec<CategoryNode>> {
        Ok(self.forest(locale))
    }
}

/// Resolve one category by walking its ancestor chain.
///
/// Returns None when the category, or any ancestor, is missing or when the
/// chain loops, matching what the forest would contain.
fn find_record(records: &[CategoryRecord], id: CategoryId, locale: &str) -> Option<CategoryNode> {
    let mut by_id: HashMap<CategoryId, &CategoryRecord> = HashMap::with_capacity(records.len());
    for record in records {
        by_id.entry(record.id).or_insert(record);
    }

    let record = *by_id.get(&id)?;
    let mut slugs = vec![record.slug_in(locale)];
    let mut seen = HashSet::from([id]);
    let mut parent = record.parent_id;
    while let Some(parent_id) = parent {
        if !seen.insert(parent_id) {
            debug!(id = id, "category ancestor chain loops");
            return None;
        }
        let ancestor = *by_id.get(&parent_id)?;
        slugs.push(ancestor.slug_in(locale));
        parent = ancestor.parent_id;
    }
    slugs.reverse();

    Some(category_node(record, locale, slugs.join("/"), Vec::new()))
}

/// Build the translated category forest from adjacency records.
///
/// Siblings are ordered by `sort_order`, then by record order. Records whose
/// parent does not exist are skipped. Only records reachable from a root are
/// returned, so the result is always acyclic; the rest are logged.
fn build_forest(records: &[CategoryRecord], locale: &str) -> Vec<CategoryNode> {
    let ids: HashSet<CategoryId> = records.iter().map(|r| r.id).collect();

    let mut children: HashMap<Option<CategoryId>, Vec<&CategoryRecord>> = HashMap::new();
    for record in records {
        if let Some(parent) = record.parent_id
            && !ids.contains(&parent)
        {
            warn!(id = record.id, parent = parent, "skipping category with missing parent");
            continue;
        }
        children.entry(record.parent_id).or_default().push(record);
    }
    for siblings in children.values_mut() {
        siblings.sort_by_key(|r| r.sort_order);
    }

    for id in unreachable_ids(&children) {
        warn!(id = id, "skipping category unreachable from any root (parent cycle)");
    }

    build_level(&children, None, None, locale)
}

/// Ids of linked records that no root reaches, sorted by id.
///
/// These sit on or below a parent cycle. Descendants of records skipped for a
/// missing parent are not linked under any key and are not reported again.
fn unreachable_ids(
    children: &HashMap<Option<CategoryId>, Vec<&CategoryRecord>>,
) -> Vec<CategoryId> {
    let mut reached: HashSet<CategoryId> = HashSet::new();
    let mut pending: Vec<CategoryId> = children
        .get(&None)
        .map(|roots| roots.iter().map(|r| r.id).collect())
        .unwrap_or_default();
    while let Some(id) = pending.pop() {
        if reached.insert(id)
            && let Some(kids) = children.get(&Some(id))
        {
            pending.extend(kids.iter().map(|r| r.id));
        }
    }

    let mut unreachable: Vec<&CategoryRecord> = children
        .iter()
        .filter(|(parent, _)| parent.is_some())
        .flat_map(|(_, kids)| kids.iter().copied())
        .filter(|r| !reached.contains(&r.id))
        .collect();
    unreachable.sort_by_key(|r| r.id);
    unreachable.into_iter().map(|r| r.id).collect()
}

fn build_level(
    children: &HashMap<Option<CategoryId>, Vec<&CategoryRecord>>,
    parent: Option<CategoryId>,
    parent_slug: Option<&str>,
    locale: &str,
) -> Vec<CategoryNode> {
    let Some(records) = children.get(&parent) else {
        return Vec::new();
    };

    records
        .iter()
        .map(|record| {
            let slug = record.slug_in(locale);
            let nested_slug = match parent_slug {
                Some(base) => format!("{base}/{slug}"),
                None => slug.to_string(),
            };
            let subtree = build_level(children, Some(record.id), Some(&nested_slug), locale);
            category_node(record, locale, nested_slug, subtree)
        })
        .collect()
}

fn category_node(
    record: &CategoryRecord,
    locale: &str,
    nested_slug: String,
    children: Vec<CategoryNode>,
) -> CategoryNode {
    CategoryNode {
        id: record.id,
        parent_id: record.parent_id,
        name: record.name_in(locale).to_string(),
        code: record.code.clone(),
        slug: record.slug_in(locale).to_string(),
        nested_slug,
        updated_at: record.updated_at,
        children,
    }
}
