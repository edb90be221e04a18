//! Categories form a self-referential hierarchy (parent/child).

use chrono::{DateTime, Utc};
use gearshop_core::CategoryId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A category with its children attached, as served by
/// `GET /api/categories`. Only one level of nesting is materialized;
/// grandchildren appear inside their parents recursively.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub children: Vec<CategoryNode>,
}

/// Assemble a tree from a flat list ordered by `sort_order`.
///
/// Orphans (rows whose parent is missing or inactive) are attached at the
/// root rather than dropped.
#[must_use]
pub fn build_tree(mut flat: Vec<Category>) -> Vec<CategoryNode> {
    flat.sort_by_key(|c| (c.sort_order, c.id.as_i32()));

    let known: std::collections::HashSet<CategoryId> = flat.iter().map(|c| c.id).collect();

    fn children_of(
        parent: Option<CategoryId>,
        flat: &[Category],
        known: &std::collections::HashSet<CategoryId>,
    ) -> Vec<CategoryNode> {
        flat.iter()
            .filter(|c| {
                match (c.parent_id, parent) {
                    (Some(p), Some(target)) => p == target,
                    (None, None) => true,
                    // Orphaned rows surface at the root.
                    (Some(p), None) => !known.contains(&p),
                    (None, Some(_)) => false,
                }
            })
            .map(|c| CategoryNode {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                sort_order: c.sort_order,
                children: children_of(Some(c.id), flat, known),
            })
            .collect()
    }

    children_of(None, &flat, &known)
}

/// `GET /api/categories/{id}`: the category, its direct children, and
/// the breadcrumb from the root down to the category itself.
#[derive(Debug, Serialize)]
pub struct CategoryWithContext {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<Category>,
    pub breadcrumb: Vec<Category>,
}

/// Admin create payload.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    pub sort_order: Option<i32>,
}

/// Admin update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<Option<CategoryId>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cat(id: i32, parent: Option<i32>, sort: i32) -> Category {
        Category {
            id: CategoryId::new(id),
            name: format!("Danh mục {id}"),
            slug: format!("danh-muc-{id}"),
            parent_id: parent.map(CategoryId::new),
            sort_order: sort,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn builds_nested_tree_in_sort_order() {
        let tree = build_tree(vec![
            cat(1, None, 2),
            cat(2, None, 1),
            cat(3, Some(1), 0),
            cat(4, Some(3), 0),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, CategoryId::new(2));
        assert_eq!(tree[1].id, CategoryId::new(1));
        assert_eq!(tree[1].children.len(), 1);
        assert_eq!(tree[1].children[0].children[0].id, CategoryId::new(4));
    }

    #[test]
    fn orphans_surface_at_root() {
        let tree = build_tree(vec![cat(5, Some(99), 0)]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, CategoryId::new(5));
    }
}
