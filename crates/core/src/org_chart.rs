//! Organization chart forest assembly.
//!
//! The directory resolver produces a flat working set of employees (every
//! top-level employee of the requested page plus every subordinate found at
//! any depth). The forest is derived from that set at render time: roots are
//! the employees without a manager and a node's children are the employees
//! whose `reportsToId` equals the node id.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::employee::Employee;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// OrgNode
// ---------------------------------------------------------------------------

/// A render-ready node of the organization chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgNode {
    pub employee: Employee,
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(OrgNode::count).sum::<usize>()
    }

    /// Find the node for `id` within this subtree.
    pub fn find(&self, id: DbId) -> Option<&OrgNode> {
        if self.employee.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Page metadata of the top-level fetch that seeded a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootPage {
    pub page_number: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// The immutable product of one chart resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    /// Flat working set: top-level employees followed by every subordinate.
    pub employees: Vec<Employee>,
    pub root_page: RootPage,
    /// Sequence number of the pass that produced this snapshot.
    pub sequence: u64,
}

impl ChartSnapshot {
    /// Build the forest for this snapshot.
    pub fn forest(&self) -> Vec<OrgNode> {
        build_forest(&self.employees)
    }
}

// ---------------------------------------------------------------------------
// Forest assembly
// ---------------------------------------------------------------------------

/// Build the manager -> subordinate forest from a flat employee set.
///
/// Employees whose manager is not part of `flat` are dropped (their subtree
/// terminates silently). Ordering follows the order of `flat`. A node already
/// present on its own lineage path is emitted as a leaf, so cyclic
/// `reportsToId` data cannot recurse forever.
pub fn build_forest(flat: &[Employee]) -> Vec<OrgNode> {
    let mut by_manager: HashMap<DbId, Vec<&Employee>> = HashMap::new();
    for employee in flat {
        if let Some(manager_id) = employee.reports_to_id {
            by_manager.entry(manager_id).or_default().push(employee);
        }
    }

    fn assemble(
        employee: &Employee,
        by_manager: &HashMap<DbId, Vec<&Employee>>,
        lineage: &mut HashSet<DbId>,
    ) -> OrgNode {
        if !lineage.insert(employee.id) {
            return OrgNode {
                employee: employee.clone(),
                children: Vec::new(),
            };
        }

        let children = by_manager
            .get(&employee.id)
            .map(|subordinates| {
                subordinates
                    .iter()
                    .map(|sub| assemble(sub, by_manager, lineage))
                    .collect()
            })
            .unwrap_or_default();

        lineage.remove(&employee.id);

        OrgNode {
            employee: employee.clone(),
            children,
        }
    }

    let mut lineage = HashSet::new();
    flat.iter()
        .filter(|e| e.is_top_level())
        .map(|root| assemble(root, &by_manager, &mut lineage))
        .collect()
}

/// Total number of nodes in a forest.
pub fn forest_size(forest: &[OrgNode]) -> usize {
    forest.iter().map(OrgNode::count).sum()
}

/// Locate a node anywhere in the forest.
pub fn find_in_forest(forest: &[OrgNode], id: DbId) -> Option<&OrgNode> {
    forest.iter().find_map(|root| root.find(id))
}

/// Whether `id` lies strictly beneath `ancestor` in the forest.
pub fn forest_contains_under(forest: &[OrgNode], ancestor: DbId, id: DbId) -> bool {
    find_in_forest(forest, ancestor)
        .map(|node| node.children.iter().any(|child| child.find(id).is_some()))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: DbId, reports_to_id: Option<DbId>, name: &str) -> Employee {
        Employee {
            id,
            reports_to_id,
            assigned_branch_id: None,
            assigned_department_id: None,
            first_name: name.to_string(),
            last_name: String::new(),
            full_name: name.to_string(),
            job_title: None,
            is_draft: false,
        }
    }

    #[test]
    fn two_single_node_roots() {
        let flat = vec![
            employee(333333333333, None, "Gabriel"),
            employee(333333333334, None, "Aziraphale"),
        ];
        let forest = build_forest(&flat);

        assert_eq!(forest.len(), 2);
        assert!(forest.iter().all(|n| n.children.is_empty()));
        assert!(forest.iter().all(|n| n.employee.reports_to_id.is_none()));
        assert_eq!(forest_size(&forest), 2);
    }

    #[test]
    fn roots_are_exactly_the_top_level_employees() {
        let flat = vec![
            employee(1, None, "a"),
            employee(2, Some(1), "b"),
            employee(3, Some(2), "c"),
            employee(4, None, "d"),
            employee(5, Some(4), "e"),
            employee(6, Some(1), "f"),
        ];
        let forest = build_forest(&flat);

        let root_ids: Vec<DbId> = forest.iter().map(|n| n.employee.id).collect();
        assert_eq!(root_ids, vec![1, 4]);
        assert_eq!(forest_size(&forest), flat.len());

        // Every non-root is a direct child of the node matching its reportsToId.
        for e in flat.iter().filter(|e| !e.is_top_level()) {
            let parent = find_in_forest(&forest, e.reports_to_id.unwrap()).unwrap();
            assert!(parent.children.iter().any(|c| c.employee.id == e.id));
        }
    }

    #[test]
    fn children_keep_working_set_order() {
        let flat = vec![
            employee(1, None, "root"),
            employee(3, Some(1), "second"),
            employee(2, Some(1), "first"),
        ];
        let forest = build_forest(&flat);
        let child_ids: Vec<DbId> = forest[0].children.iter().map(|c| c.employee.id).collect();
        assert_eq!(child_ids, vec![3, 2]);
    }

    #[test]
    fn orphans_are_dropped() {
        let flat = vec![employee(1, None, "root"), employee(2, Some(99), "orphan")];
        let forest = build_forest(&flat);
        assert_eq!(forest_size(&forest), 1);
        assert!(find_in_forest(&forest, 2).is_none());
    }

    #[test]
    fn reassignment_moves_subtree_under_new_manager() {
        let before = vec![
            employee(333333333333, None, "Gabriel"),
            employee(333333333334, None, "Aziraphale"),
            employee(333333333335, Some(333333333333), "Crowley"),
        ];
        assert_eq!(build_forest(&before).len(), 2);

        let after = vec![
            employee(333333333333, None, "Gabriel"),
            employee(333333333335, Some(333333333333), "Crowley"),
            employee(333333333334, Some(333333333335), "Aziraphale"),
        ];
        let forest = build_forest(&after);
        assert_eq!(forest.len(), 1);
        assert!(forest_contains_under(&forest, 333333333335, 333333333334));
        assert!(forest_contains_under(&forest, 333333333333, 333333333334));
        assert!(!forest_contains_under(&forest, 333333333334, 333333333335));
    }

    #[test]
    fn cycles_do_not_recurse() {
        // 2 and 3 report to each other; 2 is also reachable from root 1 via a
        // duplicated record. The forest must still terminate.
        let flat = vec![
            employee(1, None, "root"),
            employee(2, Some(1), "b"),
            employee(3, Some(2), "c"),
            employee(2, Some(3), "b-again"),
        ];
        let forest = build_forest(&flat);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest_size(&forest), 4);

        let root = &forest[0];
        assert_eq!(root.employee.id, 1);
        assert_eq!(root.children.len(), 1);

        let b = &root.children[0];
        assert_eq!(b.employee.full_name, "b");
        assert_eq!(b.children.len(), 1);

        let c = &b.children[0];
        assert_eq!(c.employee.id, 3);
        assert_eq!(c.children.len(), 1);

        // The repeated id closes the loop as a leaf.
        let repeat = &c.children[0];
        assert_eq!(repeat.employee.id, 2);
        assert_eq!(repeat.employee.full_name, "b-again");
        assert!(repeat.children.is_empty());
    }

    #[test]
    fn rebuilding_is_structurally_identical() {
        let flat = vec![
            employee(1, None, "a"),
            employee(2, Some(1), "b"),
            employee(3, Some(1), "c"),
        ];
        assert_eq!(build_forest(&flat), build_forest(&flat));
    }
}
