use serde::Serialize;

/// A practice category offered to the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "javascript",
        name: "JavaScript",
        description: "Language fundamentals, closures, the event loop and async patterns",
    },
    Category {
        id: "react",
        name: "React",
        description: "Components, hooks, state management and rendering performance",
    },
    Category {
        id: "system-design",
        name: "System Design",
        description: "Scalability, storage choices, caching and distributed trade-offs",
    },
    Category {
        id: "data-structures",
        name: "Data Structures & Algorithms",
        description: "Complexity analysis, common structures and problem solving",
    },
    Category {
        id: "databases",
        name: "Databases",
        description: "SQL, indexing, transactions and data modeling",
    },
    Category {
        id: "behavioral",
        name: "Behavioral",
        description: "Teamwork, conflict, ownership and past-project stories",
    },
];

pub fn find_category(id: &str) -> Option<&'static Category> {
    let id = id.trim();
    CATEGORIES
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(id) || c.name.eq_ignore_ascii_case(id))
}

/// Display name used in prompts. Unknown categories are passed through as
/// free text.
pub fn display_name(category: &str) -> &str {
    find_category(category).map_or(category.trim(), |c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = CATEGORIES.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATEGORIES.len());
    }

    #[test]
    fn test_find_by_id_or_name() {
        assert_eq!(find_category("system-design").unwrap().name, "System Design");
        assert_eq!(find_category("react").unwrap().id, "react");
        assert_eq!(find_category("Behavioral").unwrap().id, "behavioral");
        assert!(find_category("cooking").is_none());
    }

    #[test]
    fn test_display_name_passes_unknown_through() {
        assert_eq!(display_name("databases"), "Databases");
        assert_eq!(display_name("  Rust "), "Rust");
    }
}
