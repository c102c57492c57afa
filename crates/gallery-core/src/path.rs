//! Folder path resolution
//!
//! Media files are stored under a key made of their ancestor folder ids, root first,
//! followed by the file name (`1/2/3/img.jpg`). Root-level files are stored under their
//! bare file name. The folder hierarchy is held in a `FolderTree` arena keyed by folder id,
//! loaded per request, so walking it never touches the database.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;

/// Upper bound on ancestor chain length before the hierarchy is treated as cyclic.
pub const MAX_FOLDER_DEPTH: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub id: i32,
    pub parent_id: Option<i32>,
    pub title: String,
}

/// Link to one ancestor folder, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Breadcrumb {
    pub id: i32,
    pub title: String,
}

/// Per-request view state returned alongside an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageContext {
    pub page_title: String,
    pub current_item_id: Option<i32>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl PageContext {
    /// Context for the gallery front page.
    pub fn front_page() -> Self {
        Self {
            page_title: "Gallery".to_string(),
            current_item_id: None,
            breadcrumbs: Vec::new(),
        }
    }
}

/// Arena of folders addressed by id.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    nodes: HashMap<i32, FolderNode>,
}

impl FolderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i32, parent_id: Option<i32>, title: impl Into<String>) {
        self.nodes.insert(
            id,
            FolderNode {
                id,
                parent_id,
                title: title.into(),
            },
        );
    }

    /// Chain of folders from the root down to `folder_id`, inclusive.
    pub fn ancestor_nodes(&self, folder_id: i32) -> Result<Vec<&FolderNode>, AppError> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(folder_id);

        while let Some(id) = current {
            if !visited.insert(id) || chain.len() >= MAX_FOLDER_DEPTH {
                tracing::error!(
                    folder_id = folder_id,
                    revisited = id,
                    depth = chain.len(),
                    "Folder hierarchy does not terminate at a root"
                );
                return Err(AppError::CycleDetected {
                    folder_id: id,
                    depth: chain.len(),
                });
            }

            let node = self
                .nodes
                .get(&id)
                .ok_or_else(|| AppError::NotFound(format!("Folder {} not found", id)))?;
            chain.push(node);
            current = node.parent_id;
        }

        chain.reverse();
        Ok(chain)
    }

    /// Folder ids from the root down to `folder_id`, inclusive.
    pub fn ancestors(&self, folder_id: i32) -> Result<Vec<i32>, AppError> {
        Ok(self
            .ancestor_nodes(folder_id)?
            .into_iter()
            .map(|node| node.id)
            .collect())
    }

    /// Storage key for `file_name` placed in `folder_id`.
    pub fn resolve_path(&self, folder_id: Option<i32>, file_name: &str) -> Result<String, AppError> {
        let Some(folder_id) = folder_id else {
            return Ok(file_name.to_string());
        };

        let mut path = self
            .ancestors(folder_id)?
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("/");
        path.push('/');
        path.push_str(file_name);
        Ok(path)
    }

    pub fn breadcrumbs(&self, folder_id: Option<i32>) -> Result<Vec<Breadcrumb>, AppError> {
        let Some(folder_id) = folder_id else {
            return Ok(Vec::new());
        };

        Ok(self
            .ancestor_nodes(folder_id)?
            .into_iter()
            .map(|node| Breadcrumb {
                id: node.id,
                title: node.title.clone(),
            })
            .collect())
    }

    /// View state for an item titled `title` that lives in `parent_id`.
    pub fn page_context(
        &self,
        item_id: i32,
        title: &str,
        parent_id: Option<i32>,
    ) -> Result<PageContext, AppError> {
        Ok(PageContext {
            page_title: title.to_string(),
            current_item_id: Some(item_id),
            breadcrumbs: self.breadcrumbs(parent_id)?,
        })
    }
}

impl FromIterator<FolderNode> for FolderTree {
    fn from_iter<I: IntoIterator<Item = FolderNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().map(|node| (node.id, node)).collect(),
        }
    }
}
