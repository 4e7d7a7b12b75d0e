//! Reference enrichment for employee listings.
//!
//! An employee row carries bare ids for its branch, department and manager.
//! [`ReferenceResolver`] turns a page of rows into [`EmployeeDetails`] by
//! fetching each distinct referenced entity once. Department ancestry is
//! walked level by level so a shared parent is fetched only once too.
//!
//! A failed or missing lookup leaves the corresponding field empty.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use orgdesk_core::employee::{Department, Employee, EmployeeDetails};
use orgdesk_core::types::DbId;

use crate::source::DirectorySource;

pub struct ReferenceResolver {
    source: Arc<dyn DirectorySource>,
}

impl ReferenceResolver {
    pub fn new(source: Arc<dyn DirectorySource>) -> Self {
        Self { source }
    }

    pub async fn resolve(&self, employees: &[Employee]) -> Vec<EmployeeDetails> {
        let branch_ids = distinct(employees.iter().filter_map(|e| e.assigned_branch_id));
        let department_ids = distinct(employees.iter().filter_map(|e| e.assigned_department_id));

        // Managers already on the page need no lookup.
        let local_names: HashMap<DbId, String> =
            employees.iter().map(|e| (e.id, e.display_name())).collect();
        let remote_manager_ids = distinct(
            employees
                .iter()
                .filter_map(|e| e.reports_to_id)
                .filter(|id| !local_names.contains_key(id)),
        );

        let (branches, departments, remote_managers) = tokio::join!(
            self.branch_names(&branch_ids),
            self.department_tree(department_ids),
            self.manager_names(&remote_manager_ids),
        );

        employees
            .iter()
            .map(|employee| EmployeeDetails {
                branch_name: employee
                    .assigned_branch_id
                    .and_then(|id| branches.get(&id).cloned()),
                department_path: employee
                    .assigned_department_id
                    .map(|id| department_path(id, &departments))
                    .unwrap_or_default(),
                manager_name: employee.reports_to_id.and_then(|id| {
                    local_names
                        .get(&id)
                        .or_else(|| remote_managers.get(&id))
                        .cloned()
                }),
                employee: employee.clone(),
            })
            .collect()
    }

    async fn branch_names(&self, ids: &[DbId]) -> HashMap<DbId, String> {
        let results = join_all(ids.iter().map(|&id| async move {
            (id, self.source.get_branch(id).await)
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(branch) => Some((id, branch.name)),
                Err(e) => {
                    tracing::warn!(branch_id = id, error = %e, "Branch lookup failed");
                    None
                }
            })
            .collect()
    }

    async fn manager_names(&self, ids: &[DbId]) -> HashMap<DbId, String> {
        let results = join_all(ids.iter().map(|&id| async move {
            (id, self.source.get_employee(id).await)
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(manager) => Some((id, manager.display_name())),
                Err(e) => {
                    tracing::warn!(manager_id = id, error = %e, "Manager lookup failed");
                    None
                }
            })
            .collect()
    }

    /// Fetch `ids` and all their ancestors, one concurrent batch per level.
    async fn department_tree(&self, ids: Vec<DbId>) -> HashMap<DbId, Department> {
        let mut known: HashMap<DbId, Department> = HashMap::new();
        let mut attempted: HashSet<DbId> = HashSet::new();
        let mut frontier = ids;

        while !frontier.is_empty() {
            attempted.extend(frontier.iter().copied());

            let results = join_all(frontier.iter().map(|&id| async move {
                (id, self.source.get_department(id).await)
            }))
            .await;

            let mut parents = Vec::new();
            for (id, result) in results {
                match result {
                    Ok(department) => {
                        if let Some(parent) = department.parent_department_id {
                            if !attempted.contains(&parent) && !parents.contains(&parent) {
                                parents.push(parent);
                            }
                        }
                        known.insert(id, department);
                    }
                    Err(e) => {
                        tracing::warn!(department_id = id, error = %e, "Department lookup failed");
                    }
                }
            }
            frontier = parents;
        }

        known
    }
}

/// Department names from the root down to `id`.
///
/// Stops at the first unknown ancestor or on a parent cycle.
fn department_path(id: DbId, departments: &HashMap<DbId, Department>) -> Vec<String> {
    let mut path = Vec::new();
    let mut visited = HashSet::new();
    let mut cursor = Some(id);

    while let Some(current) = cursor {
        if !visited.insert(current) {
            break;
        }
        let Some(department) = departments.get(&current) else {
            break;
        };
        path.push(department.name.clone());
        cursor = department.parent_department_id;
    }

    path.reverse();
    path
}

fn distinct(ids: impl Iterator<Item = DbId>) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Call, FailurePoint, MemoryDirectory};
    use orgdesk_core::employee::Branch;

    fn employee(id: DbId, reports_to_id: Option<DbId>, branch: Option<DbId>, department: Option<DbId>) -> Employee {
        Employee {
            id,
            reports_to_id,
            assigned_branch_id: branch,
            assigned_department_id: department,
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            full_name: String::new(),
            job_title: None,
            is_draft: false,
        }
    }

    fn department(id: DbId, name: &str, parent: Option<DbId>) -> Department {
        Department {
            id,
            name: name.to_string(),
            parent_department_id: parent,
        }
    }

    fn directory() -> MemoryDirectory {
        let directory = MemoryDirectory::new().with_employees(vec![employee(
            90,
            None,
            None,
            None,
        )]);
        directory.add_branch(Branch { id: 1, name: "Lisbon".into() });
        directory.add_branch(Branch { id: 2, name: "Porto".into() });
        directory.add_department(department(10, "Engineering", None));
        directory.add_department(department(11, "Platform", Some(10)));
        directory.add_department(department(12, "Product", Some(10)));
        directory
    }

    fn count(calls: &[Call], wanted: impl Fn(&Call) -> bool) -> usize {
        calls.iter().filter(|c| wanted(c)).count()
    }

    #[tokio::test]
    async fn fetches_each_reference_once() {
        let directory = directory();
        let resolver = ReferenceResolver::new(Arc::new(directory.clone()));
        let rows = vec![
            employee(1, Some(90), Some(1), Some(11)),
            employee(2, Some(90), Some(1), Some(12)),
            employee(3, Some(1), Some(2), Some(11)),
        ];

        let details = resolver.resolve(&rows).await;
        let calls = directory.calls();

        assert_eq!(count(&calls, |c| matches!(c, Call::Branch(_))), 2);
        assert_eq!(count(&calls, |c| matches!(c, Call::Department(10))), 1);
        assert_eq!(count(&calls, |c| matches!(c, Call::Department(11))), 1);
        assert_eq!(count(&calls, |c| matches!(c, Call::GetEmployee(90))), 1);
        // Employee 1 is on the page, so no lookup for it.
        assert_eq!(count(&calls, |c| matches!(c, Call::GetEmployee(1))), 0);

        assert_eq!(details[0].branch_name.as_deref(), Some("Lisbon"));
        assert_eq!(details[0].department_path, vec!["Engineering", "Platform"]);
        assert_eq!(details[0].manager_name.as_deref(), Some("First90 Last90"));
        assert_eq!(details[2].branch_name.as_deref(), Some("Porto"));
        assert_eq!(details[2].manager_name.as_deref(), Some("First1 Last1"));
    }

    #[tokio::test]
    async fn failed_lookups_leave_fields_empty() {
        let directory = directory();
        directory.fail(FailurePoint::Department(10));
        let resolver = ReferenceResolver::new(Arc::new(directory));

        let details = resolver
            .resolve(&[employee(5, Some(404), Some(99), Some(11))])
            .await;

        assert_eq!(details.len(), 1);
        assert!(details[0].branch_name.is_none());
        assert!(details[0].manager_name.is_none());
        // The parent failed, so the path stops at the known child.
        assert_eq!(details[0].department_path, vec!["Platform"]);
    }

    #[test]
    fn department_path_survives_cycles() {
        let departments: HashMap<DbId, Department> = [
            (1, department(1, "A", Some(2))),
            (2, department(2, "B", Some(1))),
        ]
        .into_iter()
        .collect();
        assert_eq!(department_path(1, &departments), vec!["B", "A"]);
    }
}
